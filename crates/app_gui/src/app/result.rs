use super::UiApp;
use arecanut_core::{ResultPanel, View};
use eframe::egui::{self, RichText};

impl UiApp {
    /// Uploads the preview as a texture once per selection.
    fn preview_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        let generation = self.workflow.generation();
        if let Some((tag, tex)) = &self.preview_tex
            && *tag == generation
        {
            return Some(tex.clone());
        }

        let preview = self.workflow.preview()?;
        let size = [preview.width as usize, preview.height as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, &preview.rgba);
        let tex = ctx.load_texture(
            format!("preview:{generation}"),
            color,
            egui::TextureOptions::LINEAR,
        );
        self.preview_tex = Some((generation, tex.clone()));
        Some(tex)
    }

    /// Preview plus whichever of loading/error/result applies, then the Clear button.
    pub(super) fn render_card(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let tex = self.preview_texture(ui.ctx());
        let file_name = self
            .workflow
            .selected()
            .map(|f| f.name.clone())
            .unwrap_or_default();
        let View {
            panel, can_reset, ..
        } = self.workflow.view();

        egui::Frame::group(ui.style())
            .corner_radius(egui::CornerRadius::same(theme.card_radius))
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.set_width(theme.card_width);
                match &tex {
                    Some(tex) => {
                        ui.add(egui::Image::new(tex).max_size(theme.preview_max));
                    }
                    None => {
                        ui.label(RichText::new(&file_name).italics());
                    }
                }
                ui.add_space(12.0);

                match &panel {
                    ResultPanel::Loading => {
                        ui.add(egui::Spinner::new().size(32.0).color(theme.loader));
                        ui.label(RichText::new("Processing...").size(18.0));
                    }
                    ResultPanel::Error(message) => {
                        ui.colored_label(ui.visuals().error_fg_color, message);
                    }
                    ResultPanel::Result { label, confidence } => {
                        egui::Grid::new("prediction")
                            .num_columns(2)
                            .spacing([32.0, 6.0])
                            .striped(true)
                            .show(ui, |ui| {
                                ui.strong("Result");
                                ui.strong("Confidence");
                                ui.end_row();
                                ui.label(RichText::new(label).size(theme.result_text_size).strong());
                                ui.label(
                                    RichText::new(confidence)
                                        .size(theme.result_text_size)
                                        .strong(),
                                );
                                ui.end_row();
                            });
                    }
                    ResultPanel::Empty => {}
                }
            });

        if can_reset {
            ui.add_space(16.0);
            let clear = egui::Button::new(RichText::new("✖ Clear").size(20.0).strong())
                .corner_radius(egui::CornerRadius::same(theme.card_radius))
                .min_size(egui::vec2(theme.card_width, 48.0));
            if ui.add(clear).clicked() {
                self.clear();
            }
        }
    }
}
