use serde::{Deserialize, Serialize};
use egui::Color32;
use std::collections::HashMap;

pub const COLOR_KEYS: [&str; 5] = ["Fog", "Grid", "Marker", "Passed", "Failed"];
pub const MIN_UI_SCALE: f32 = 0.75;
pub const MAX_UI_SCALE: f32 = 2.0;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    /// Mirror the session to disk. Read once at startup.
    pub persist_session: bool,

    // Canvas element → color mapping
    pub canvas_colors: HashMap<String, [u8; 4]>,
}

impl Default for UiSettings {
    fn default() -> Self {
        let mut canvas_colors = HashMap::new();

        canvas_colors.insert("Fog".into(), [30, 30, 38, 235]);
        canvas_colors.insert("Grid".into(), [255, 255, 255, 90]);
        canvas_colors.insert("Marker".into(), [250, 173, 20, 255]);
        canvas_colors.insert("Passed".into(), [82, 196, 26, 255]);
        canvas_colors.insert("Failed".into(), [255, 77, 79, 255]);

        Self {
            ui_scale: 1.0,
            persist_session: true,
            canvas_colors,
        }
    }
}

impl UiSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.canvas_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }

    /// Pulls hand-edited values back into the ranges the UI offers.
    pub fn sanitized(mut self) -> Self {
        self.ui_scale = if self.ui_scale.is_finite() {
            self.ui_scale.clamp(MIN_UI_SCALE, MAX_UI_SCALE)
        } else {
            1.0
        };
        self
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        self.canvas_colors.insert(key.to_string(), [r, g, b, a]);
    }
}
