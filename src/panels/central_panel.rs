use egui::{Color32, CursorIcon};
use log::warn;

use crate::app::SayingsApp;
use crate::geometry::HitTarget;
use crate::interaction::InteractionState;

pub fn central_panel(app: &mut SayingsApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::LIGHT_GRAY))
        .show(ctx, |ui| {
            let available = ui.available_size();
            let (response, painter) = ui.allocate_painter(available, egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            let (canvas, controller, input, view) = app.view_parts();

            // The canvas always fills the view
            let width = canvas_rect.width().floor() as u32;
            let height = canvas_rect.height().floor() as u32;
            if width > 0 && height > 0 && (width, height) != canvas.size() {
                if let Err(err) = canvas.resize(width, height) {
                    warn!("Canvas resize failed: {}", err);
                }
            }

            // Handle input
            for event in input.process_input(ctx, canvas_rect) {
                if let Err(err) = controller.handle_event(canvas, &event) {
                    warn!("Pointer event {:?} failed: {}", event, err);
                }
            }

            let hover = response.hover_pos();
            if let Some(pos) = hover {
                let local = (pos - canvas_rect.min).to_pos2();
                let cursor = match (controller.state(), controller.hover_target(canvas, local)) {
                    (InteractionState::Resizing { .. }, _) | (_, HitTarget::ResizeHandle) => {
                        Some(CursorIcon::ResizeNwSe)
                    }
                    (InteractionState::Dragging { .. }, _) => Some(CursorIcon::Grabbing),
                    (_, HitTarget::Body) => Some(CursorIcon::Grab),
                    (_, HitTarget::None) => None,
                };
                if let Some(cursor) = cursor {
                    ctx.set_cursor_icon(cursor);
                }
            }

            // Render the canvas
            view.render(ctx, &painter, canvas_rect, canvas, controller, hover);
        });
}
