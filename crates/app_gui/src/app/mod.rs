//! Main window: top bar, then either the drop zone or the result card.

mod picker;
mod result;
mod theme;

use anyhow::Result;
use arecanut_core::{AppConfig, Dispatcher, HttpClassifier, SelectedFile, Workflow};
use eframe::{App, Frame, egui};
use std::sync::Arc;
use theme::Theme;

pub struct UiApp {
    workflow: Workflow,
    dispatcher: Dispatcher,
    theme: Theme,
    status: String,
    // Texture of the current preview, tagged with the workflow generation it belongs to.
    preview_tex: Option<(u64, egui::TextureHandle)>,
    app_version: &'static str,
}

impl UiApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self> {
        let classifier = HttpClassifier::new(&config.upload_field)?;
        let repaint_ctx = cc.egui_ctx.clone();
        let dispatcher = Dispatcher::new(Arc::new(classifier))
            .with_waker(Arc::new(move || repaint_ctx.request_repaint()));

        let theme = Theme::default();
        theme.apply(&cc.egui_ctx);

        Ok(Self {
            workflow: Workflow::new(&config),
            dispatcher,
            theme,
            status: String::new(),
            preview_tex: None,
            app_version: env!("ARECASCAN_VERSION"),
        })
    }

    /// Single entry point for picker changes; starts the upload when one is due.
    fn on_select(&mut self, file: Option<SelectedFile>) {
        self.preview_tex = None;
        if let Some(submission) = self.workflow.select(file) {
            self.dispatcher.submit(submission);
        }
        if let Some(file) = self.workflow.selected() {
            self.dispatcher.decode_preview(self.workflow.generation(), file);
        }
    }

    fn clear(&mut self) {
        if self.workflow.reset() {
            self.preview_tex = None;
            self.status.clear();
        }
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Arecanut Disease Detection");
            ui.separator();
            if ui.button("Choose image…").clicked() {
                self.browse();
            }
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(format!("v{}", self.app_version));
            });
        });
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        for event in self.dispatcher.drain() {
            self.workflow.apply(event);
        }
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(32.0);
            ui.vertical_centered(|ui| {
                if self.workflow.view().show_picker {
                    self.render_drop_zone(ui);
                } else {
                    self.render_card(ui);
                }
            });
        });
    }
}
