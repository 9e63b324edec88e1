//! Style table shared by every renderer.

use eframe::egui::{self, Color32};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Theme {
    pub accent: Color32,
    pub loader: Color32,
    pub card_radius: u8,
    pub card_width: f32,
    pub preview_max: egui::Vec2,
    pub drop_zone_height: f32,
    pub result_text_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color32::from_rgb(0x2e, 0x7d, 0x32),
            loader: Color32::from_rgb(0xbe, 0x6a, 0x77),
            card_radius: 15,
            card_width: 400.0,
            preview_max: egui::vec2(400.0, 400.0),
            drop_zone_height: 260.0,
            result_text_size: 22.0,
        }
    }
}

impl Theme {
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.visuals.selection.bg_fill = self.accent;
            style.visuals.hyperlink_color = self.accent;
        });
    }
}
