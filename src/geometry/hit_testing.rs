use egui::{Pos2, Rect};

/// Default distance from a stamp's bottom-right corner that grabs the resize handle
pub const RESIZE_HANDLE_RADIUS: f32 = 15.0;

/// What lies under a canvas point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Nothing, the bare canvas
    None,
    /// Inside a stamp, away from its handle
    Body,
    /// On the stamp's resize handle
    ResizeHandle,
}

/// The resize handle sits on the bottom-right corner; it reaches slightly
/// outside the stamp so small stamps can still be grabbed.
pub fn is_point_near_handle(pos: Pos2, rect: Rect, radius: f32) -> bool {
    pos.distance(rect.right_bottom()) <= radius
}

/// Handle reach for a given stamp: never more than a third of its shorter
/// side, so even a minimum-size stamp keeps a grabbable body.
pub fn effective_handle_radius(rect: Rect, handle_radius: f32) -> f32 {
    handle_radius.min(rect.size().min_elem() / 3.0)
}

/// Classify `pos` against a single stamp rectangle.
pub fn classify(pos: Pos2, rect: Rect, handle_radius: f32) -> HitTarget {
    if is_point_near_handle(pos, rect, effective_handle_radius(rect, handle_radius)) {
        HitTarget::ResizeHandle
    } else if rect.contains(pos) {
        HitTarget::Body
    } else {
        HitTarget::None
    }
}
