//! File dialog and drag-and-drop selection.

use super::UiApp;
use arecanut_core::{IMAGE_EXTENSIONS, SelectedFile, is_supported_image};
use eframe::egui;
use rfd::FileDialog;
use std::path::Path;

const DROP_HINT: &str = "Drag and drop an arecanut plant image to process\nor click to browse";

impl UiApp {
    /// Opens the image dialog. Cancelling counts as selecting nothing.
    pub(super) fn browse(&mut self) {
        let picked = FileDialog::new()
            .set_title("Choose an arecanut plant image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file();
        match picked {
            Some(path) => self.select_path(&path),
            None => self.on_select(None),
        }
    }

    fn select_path(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => {
                self.status.clear();
                self.on_select(Some(file));
            }
            Err(e) => self.reject(e),
        }
    }

    fn reject(&mut self, err: anyhow::Error) {
        tracing::warn!("Selection rejected: {err:#}");
        self.status = format!("{err:#}");
    }

    /// Files dropped anywhere on the window replace the current selection.
    pub(super) fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let count = dropped.len();
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        // Same media-type filter as the dialog; nothing is read for other files.
        let name = match &file.path {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            None => file.name.clone(),
        };
        if !is_supported_image(&name) {
            tracing::warn!("Ignoring dropped non-image {name}");
            self.status = format!("Not an image file: {name}");
            return;
        }

        if let Some(path) = &file.path {
            self.select_path(path);
        } else if let Some(bytes) = &file.bytes {
            match SelectedFile::from_bytes(file.name.clone(), bytes.to_vec()) {
                Ok(selected) => {
                    self.status.clear();
                    self.on_select(Some(selected));
                }
                Err(e) => self.reject(e),
            }
        } else {
            tracing::warn!("Dropped item {} carried no content", file.name);
        }

        if count > 1 {
            self.status = "Only the first dropped image is processed.".to_string();
        }
    }

    pub(super) fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        let hovering_files = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let size = egui::vec2(theme.card_width, theme.drop_zone_height);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        let visuals = ui.visuals();
        let stroke_color = if hovering_files || response.hovered() {
            theme.accent
        } else {
            visuals.widgets.noninteractive.bg_stroke.color
        };
        let radius = theme.card_radius as f32;
        let painter = ui.painter();
        painter.rect_filled(rect, radius, visuals.extreme_bg_color);
        painter.rect_stroke(
            rect,
            radius,
            egui::Stroke::new(2.0, stroke_color),
            egui::StrokeKind::Inside,
        );
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            DROP_HINT,
            egui::FontId::proportional(16.0),
            visuals.text_color(),
        );

        if response
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .clicked()
        {
            self.browse();
        }
    }
}
