use egui::{Color32, Rect, Stroke, TextureId};

/// What a [`ToolButton`] shows inside its frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonFace {
    Texture(TextureId),
    /// A cyan square on dark gray, for the solid-color background action
    ColorSwatch,
    /// Fallback when an icon failed to load
    Text(&'static str),
}

pub struct ToolButton {
    pub face: ButtonFace,
    pub tooltip: String,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(face: ButtonFace, tooltip: impl Into<String>, selected: bool) -> Self {
        Self {
            face,
            tooltip: tooltip.into(),
            selected,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(32.0, 32.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                Color32::from_rgb(100, 181, 246) // Light blue when selected
            } else if response.hovered() {
                Color32::from_gray(70)
            } else {
                Color32::from_gray(50)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let inner = rect.shrink(3.0);
            match self.face {
                ButtonFace::Texture(id) => {
                    ui.painter().image(
                        id,
                        inner,
                        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
                ButtonFace::ColorSwatch => {
                    ui.painter().rect_filled(inner, 0.0, Color32::DARK_GRAY);
                    ui.painter().rect_filled(inner.shrink(5.0), 0.0, Color32::from_rgb(0, 255, 255));
                }
                ButtonFace::Text(text) => {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        text,
                        egui::FontId::proportional(12.0),
                        Color32::WHITE,
                    );
                }
            }

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    Stroke::new(2.0, Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(&self.tooltip)
    }
}
