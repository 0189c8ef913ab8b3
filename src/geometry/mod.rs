pub mod hit_testing;

pub use hit_testing::{HitTarget, is_point_near_handle, RESIZE_HANDLE_RADIUS};

/// Placement of a source image scaled to cover a target area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectFill {
    /// Size the source is scaled to (never smaller than the target)
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Top-left of the target window inside the scaled image
    pub crop_x: u32,
    pub crop_y: u32,
}

/// Scale `src` uniformly so it covers `dst` completely, cropping the excess
/// evenly from both sides.
pub fn aspect_fill(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> AspectFill {
    let scale = f64::max(
        dst_w as f64 / src_w.max(1) as f64,
        dst_h as f64 / src_h.max(1) as f64,
    );

    let scaled_width = ((src_w as f64 * scale).round() as u32).max(dst_w);
    let scaled_height = ((src_h as f64 * scale).round() as u32).max(dst_h);

    AspectFill {
        scaled_width,
        scaled_height,
        crop_x: (scaled_width - dst_w) / 2,
        crop_y: (scaled_height - dst_h) / 2,
    }
}
