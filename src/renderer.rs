use egui::{Color32, ColorImage, Context, Painter, Pos2, Rect, Stroke, TextureHandle, TextureOptions};
use image::RgbaImage;

use crate::compositor::Canvas;
use crate::geometry::HitTarget;
use crate::interaction::InteractionController;

const HANDLE_COLOR: Color32 = Color32::from_rgb(30, 120, 255);
const HANDLE_DRAW_RADIUS: f32 = 5.0;

/// Shows a [`Canvas`] inside an egui view.
///
/// The frame is uploaded as a texture only when the canvas repainted since the
/// last upload, so an idle canvas costs one textured quad per egui frame.
#[derive(Default)]
pub struct CanvasView {
    texture: Option<TextureHandle>,
    uploaded_revision: Option<u64>,
}

impl std::fmt::Debug for CanvasView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasView")
            .field("has_texture", &self.texture.is_some())
            .field("uploaded_revision", &self.uploaded_revision)
            .finish()
    }
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint the canvas with its top-left at `rect.min`, one canvas pixel per
    /// point, and mark the resize handle of the stamp under `hover`.
    pub fn render(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        rect: Rect,
        canvas: &mut Canvas,
        controller: &InteractionController,
        hover: Option<Pos2>,
    ) {
        canvas.render();
        let revision = canvas.revision();
        if self.uploaded_revision != Some(revision) {
            let image = to_color_image(canvas.render());
            if let Some(texture) = self.texture.as_mut() {
                texture.set(image, TextureOptions::NEAREST);
            } else {
                self.texture = Some(ctx.load_texture("canvas_frame", image, TextureOptions::NEAREST));
            }
            self.uploaded_revision = Some(revision);
            log::debug!("Uploaded canvas frame {}", revision);
        }

        let (width, height) = canvas.size();
        let image_rect = Rect::from_min_size(rect.min, egui::vec2(width as f32, height as f32));
        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                image_rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        if let Some(pos) = hover {
            let local = (pos - rect.min).to_pos2();
            if let Some((id, target)) = canvas.stamp_target_at(local, controller.handle_radius()) {
                if let Some(stamp) = canvas.stamp(id) {
                    let stamp_rect = stamp.rect().translate(rect.min.to_vec2());
                    painter.rect_stroke(stamp_rect, 0.0, Stroke::new(1.0, HANDLE_COLOR));
                    let radius = if target == HitTarget::ResizeHandle {
                        HANDLE_DRAW_RADIUS * 1.5
                    } else {
                        HANDLE_DRAW_RADIUS
                    };
                    draw_handle(painter, stamp_rect.right_bottom(), radius);
                }
            }
        }
    }
}

fn draw_handle(painter: &Painter, position: Pos2, radius: f32) {
    painter.circle_filled(position, radius, HANDLE_COLOR);
    painter.circle_stroke(position, radius, Stroke::new(1.0, Color32::WHITE));
}

/// Rendered frames are opaque, so straight and premultiplied alpha agree.
pub fn to_color_image(frame: &RgbaImage) -> ColorImage {
    let size = [frame.width() as usize, frame.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, frame.as_raw())
}
