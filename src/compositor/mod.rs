//! The layered canvas: background, optional gradient overlay, icon stamps and
//! text, painted in that fixed order into an owned RGBA frame.
//!
//! Every mutating call marks the frame stale. [`Canvas::render`] repaints only
//! when something changed since the last paint, so any number of edits between
//! two reads cost a single render pass.

pub mod background;
pub(crate) mod blend;

use std::path::Path;
use std::sync::Arc;

use egui::{Color32, Pos2, Vec2};
use image::RgbaImage;
use log::{debug, info, warn};

pub use background::{Background, GradientKind, GradientSpec, DEFAULT_BACKGROUND_COLOR};

use crate::config::Settings;
use crate::error::{CanvasError, CanvasResult};
use crate::export::{self, ExportFormat};
use crate::geometry::HitTarget;
use crate::resources::{ResourceId, ResourceLoader};
use crate::stamp::{IconLayer, IconStamp, StampId};
use crate::text::{Justify, TextLayer};
use blend::blend_over;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// The complete visual state and its last rendered frame.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Background,
    /// Color used when an image background is dropped
    fallback_color: Color32,
    gradient: Option<GradientSpec>,
    /// What the gradient toggle and `clear` install
    default_gradient: GradientSpec,
    text: TextLayer,
    icons: IconLayer,
    jpeg_quality: u8,

    frame: RgbaImage,
    dirty: bool,
    revision: u64,
    /// Aspect-filled background, valid until the background or size changes
    background_cache: Option<RgbaImage>,
}

impl Canvas {
    /// A canvas in its default state: solid default color, gradient overlay
    /// on, no text, no stamps.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        validate_size(width, height)?;
        let default_gradient = GradientSpec::default();
        Ok(Self {
            width,
            height,
            background: Background::default(),
            fallback_color: DEFAULT_BACKGROUND_COLOR,
            gradient: Some(default_gradient),
            default_gradient,
            text: TextLayer::new(),
            icons: IconLayer::new(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            frame: RgbaImage::new(width, height),
            dirty: true,
            revision: 0,
            background_cache: None,
        })
    }

    /// A canvas sized and styled from `settings`, with its initial text set.
    pub fn from_settings(settings: &Settings) -> CanvasResult<Self> {
        let mut canvas = Self::new(settings.canvas_width, settings.canvas_height)?;
        canvas.default_gradient.opacity = settings.gradient_opacity.clamp(0.0, 1.0);
        canvas.gradient = Some(canvas.default_gradient);
        canvas.jpeg_quality = settings.jpeg_quality.clamp(1, 100);
        canvas.text.set_text(settings.initial_text.clone());
        canvas.text.set_font_size(settings.font_size)?;
        canvas.text.set_justify(settings.justify);
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Change the canvas size. Stamps and text keep their canvas coordinates.
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        validate_size(width, height)?;
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        debug!("Canvas resized {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        self.background_cache = None;
        self.request_render();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Background & overlay

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Replace the background wholesale.
    pub fn set_background(&mut self, background: Background) {
        if let Background::SolidColor(color) = background {
            self.fallback_color = color;
        }
        self.background = background;
        self.background_cache = None;
        self.request_render();
    }

    pub fn set_background_color(&mut self, color: Color32) {
        info!("Background set to color {:?}", color);
        self.set_background(Background::SolidColor(color));
    }

    /// Use `image` as the background, or drop to a solid color with `None`.
    /// An image without pixels is rejected and the background is unchanged.
    pub fn set_background_image(&mut self, image: Option<Arc<RgbaImage>>) -> CanvasResult<()> {
        match image {
            Some(img) => {
                if img.width() == 0 || img.height() == 0 {
                    return Err(CanvasError::decode("background", "image has no pixels"));
                }
                info!("Background set to {}x{} image", img.width(), img.height());
                self.set_background(Background::Image(img));
            }
            None => {
                let color = self.fallback_color;
                self.set_background(Background::SolidColor(color));
            }
        }
        Ok(())
    }

    /// Load a resource and make it the background. The previous background
    /// stays in place if loading fails.
    pub fn load_background(&mut self, loader: &ResourceLoader, id: &ResourceId) -> CanvasResult<()> {
        match loader.load(id) {
            Ok(img) => self.set_background_image(Some(Arc::new(img))),
            Err(err) => {
                warn!("Keeping previous background: {}", err);
                Err(err)
            }
        }
    }

    pub fn gradient(&self) -> Option<&GradientSpec> {
        self.gradient.as_ref()
    }

    /// Install or remove the overlay.
    pub fn set_gradient(&mut self, gradient: Option<GradientSpec>) {
        self.gradient = gradient;
        self.request_render();
    }

    /// Toggle the default overlay on or off.
    pub fn set_gradient_enabled(&mut self, enabled: bool) {
        let gradient = enabled.then_some(self.default_gradient);
        self.set_gradient(gradient);
    }

    pub fn gradient_enabled(&self) -> bool {
        self.gradient.is_some()
    }

    // ---------------------------------------------------------------------
    // Text

    pub fn text(&self) -> &TextLayer {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.set_text(text);
        self.request_render();
    }

    pub fn set_font_size(&mut self, size: u32) -> CanvasResult<()> {
        self.text.set_font_size(size)?;
        self.request_render();
        Ok(())
    }

    pub fn set_justify(&mut self, justify: Justify) {
        self.text.set_justify(justify);
        self.request_render();
    }

    pub fn set_text_color(&mut self, color: Color32) {
        self.text.set_color(color);
        self.request_render();
    }

    pub fn set_line_spacing(&mut self, spacing: f32) -> CanvasResult<()> {
        self.text.set_line_spacing(spacing)?;
        self.request_render();
        Ok(())
    }

    pub fn set_font_data(&mut self, data: Vec<u8>) -> CanvasResult<()> {
        self.text.set_font_data(data)?;
        self.request_render();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Stamps

    pub fn icons(&self) -> &IconLayer {
        &self.icons
    }

    pub fn stamp(&self, id: StampId) -> Option<&IconStamp> {
        self.icons.get(id)
    }

    pub fn add_stamp(&mut self, source: Arc<RgbaImage>, position: Pos2, size: Vec2) -> CanvasResult<StampId> {
        let id = self.icons.add(source, position, size)?;
        self.request_render();
        Ok(id)
    }

    pub fn move_stamp(&mut self, id: StampId, position: Pos2) -> CanvasResult<()> {
        self.icons.move_to(id, position)?;
        self.request_render();
        Ok(())
    }

    pub fn resize_stamp(&mut self, id: StampId, size: Vec2) -> CanvasResult<()> {
        self.icons.resize(id, size)?;
        self.request_render();
        Ok(())
    }

    /// Returns false if the stamp was already gone.
    pub fn remove_stamp(&mut self, id: StampId) -> bool {
        let removed = self.icons.remove(id);
        if removed {
            self.request_render();
        }
        removed
    }

    pub fn stamp_at(&self, point: Pos2) -> Option<&IconStamp> {
        self.icons.hit_test(point)
    }

    /// The top-most stamp under `point` and whether its body or resize handle was hit.
    pub fn stamp_target_at(&self, point: Pos2, handle_radius: f32) -> Option<(StampId, HitTarget)> {
        self.icons
            .hit_test_with_handle(point, handle_radius)
            .map(|(stamp, target)| (stamp.id(), target))
    }

    pub fn clear_stamps(&mut self) {
        self.icons.clear();
        self.request_render();
    }

    // ---------------------------------------------------------------------
    // Whole canvas

    /// Back to the default state: default background, overlay enabled, empty
    /// text, no stamps. The canvas size is kept.
    pub fn clear(&mut self) {
        info!("Clearing canvas");
        self.background = Background::default();
        self.fallback_color = DEFAULT_BACKGROUND_COLOR;
        self.background_cache = None;
        self.gradient = Some(self.default_gradient);
        self.icons.clear();
        self.text.set_defaults();
        self.request_render();
    }

    /// Mark the frame stale. Cheap; the repaint happens on the next read.
    pub fn request_render(&mut self) {
        self.dirty = true;
    }

    /// True when state changed since the frame was last painted
    pub fn needs_render(&self) -> bool {
        self.dirty
    }

    /// Bumped every time the frame is repainted
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The up-to-date frame, repainting first if anything changed.
    pub fn render(&mut self) -> &RgbaImage {
        if self.dirty {
            self.frame = self.compose();
            self.dirty = false;
            self.revision += 1;
            debug!("Rendered frame {} ({}x{})", self.revision, self.width, self.height);
        }
        &self.frame
    }

    /// An independent copy of the up-to-date frame for export.
    pub fn copy_image(&mut self) -> RgbaImage {
        self.render().clone()
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Write the current frame to `path`; the extension picks the encoder.
    /// Unsupported extensions are rejected before anything is rendered or written.
    pub fn export(&mut self, path: &Path) -> CanvasResult<()> {
        let format = ExportFormat::from_path(path)?;
        let quality = self.jpeg_quality;
        let frame = self.render();
        export::write_image(frame, path, format, quality)?;
        info!("Exported {:?} to {}", format, path.display());
        Ok(())
    }

    fn compose(&mut self) -> RgbaImage {
        let (width, height) = (self.width, self.height);

        let cached = self
            .background_cache
            .as_ref()
            .filter(|cached| cached.dimensions() == (width, height))
            .cloned();

        let mut frame = match cached {
            Some(cached) => cached,
            None => {
                let rendered = self.background.render(width, height);
                if matches!(self.background, Background::Image(_)) {
                    self.background_cache = Some(rendered.clone());
                }
                rendered
            }
        };

        if let Some(gradient) = &self.gradient {
            gradient.paint(&mut frame);
        }

        for stamp in self.icons.iter() {
            paint_stamp(&mut frame, stamp);
        }

        self.text.paint(&mut frame);
        frame
    }
}

fn validate_size(width: u32, height: u32) -> CanvasResult<()> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidGeometry(format!(
            "canvas size must be positive, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// Nearest-neighbour scale of the stamp's source into its rectangle, clipped
/// to the frame. Only the visible part is sampled. Any finite position is
/// valid; clipping happens in `f64` before the integer casts.
fn paint_stamp(frame: &mut RgbaImage, stamp: &IconStamp) {
    let rect = stamp.rect();
    let source = stamp.source();
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 {
        return;
    }
    let (frame_w, frame_h) = (frame.width() as f64, frame.height() as f64);

    let left = (rect.min.x as f64).round();
    let top = (rect.min.y as f64).round();
    let right = (rect.max.x as f64).round().max(left + 1.0);
    let bottom = (rect.max.y as f64).round().max(top + 1.0);
    if !(right > 0.0 && bottom > 0.0 && left < frame_w && top < frame_h) {
        return;
    }
    let (dst_w, dst_h) = (right - left, bottom - top);

    // Bounds are inside the frame now, so the casts are exact
    let x0 = left.max(0.0) as u32;
    let y0 = top.max(0.0) as u32;
    let x1 = right.min(frame_w) as u32;
    let y1 = bottom.min(frame_h) as u32;

    for y in y0..y1 {
        let v = ((y as f64 - top + 0.5) / dst_h * src_h as f64) as u32;
        let v = v.min(src_h - 1);
        for x in x0..x1 {
            let u = ((x as f64 - left + 0.5) / dst_w * src_w as f64) as u32;
            let u = u.min(src_w - 1);
            let s = source.get_pixel(u, v);
            blend_over(
                frame.get_pixel_mut(x, y),
                [s[0], s[1], s[2]],
                s[3] as f32 / 255.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};
    use image::Rgba;

    fn solid(color: [u8; 4], w: u32, h: u32) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(w, h, Rgba(color)))
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Canvas::new(0, 10), Err(CanvasError::InvalidGeometry(_))));
        let mut canvas = Canvas::new(10, 10).unwrap();
        assert!(canvas.resize(10, 0).is_err());
        assert_eq!(canvas.size(), (10, 10));
    }

    #[test]
    fn test_renders_coalesce() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.render();
        let rev = canvas.revision();

        canvas.set_background_color(Color32::RED);
        canvas.set_gradient_enabled(false);
        canvas.set_text("hi");
        assert!(canvas.needs_render());

        canvas.render();
        canvas.render();
        assert_eq!(canvas.revision(), rev + 1);
        assert!(!canvas.needs_render());
    }

    #[test]
    fn test_stamp_is_scaled_into_its_rect() {
        let mut canvas = Canvas::new(50, 50).unwrap();
        canvas.set_gradient_enabled(false);
        canvas.set_background_color(Color32::BLACK);
        canvas
            .add_stamp(solid([0, 255, 0, 255], 2, 2), pos2(10.0, 10.0), vec2(20.0, 20.0))
            .unwrap();

        let frame = canvas.render();
        assert_eq!(*frame.get_pixel(10, 10), Rgba([0, 255, 0, 255]));
        assert_eq!(*frame.get_pixel(29, 29), Rgba([0, 255, 0, 255]));
        assert_eq!(*frame.get_pixel(30, 30), Rgba([0, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(9, 9), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_offcanvas_stamp_is_clipped() {
        let mut canvas = Canvas::new(30, 30).unwrap();
        canvas.set_gradient_enabled(false);
        canvas.set_background_color(Color32::BLACK);
        let id = canvas
            .add_stamp(solid([255, 0, 0, 255], 4, 4), pos2(-10.0, -10.0), vec2(15.0, 15.0))
            .unwrap();
        let frame = canvas.render();
        assert_eq!(*frame.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(5, 5), Rgba([0, 0, 0, 255]));

        canvas.move_stamp(id, pos2(1000.0, 1000.0)).unwrap();
        let frame = canvas.render();
        assert!(frame.pixels().all(|px| *px == Rgba([0, 0, 0, 255])));
        assert_eq!(canvas.icons().len(), 1);
    }

    #[test]
    fn test_far_away_stamps_render() {
        let mut canvas = Canvas::new(30, 30).unwrap();
        canvas.set_gradient_enabled(false);
        canvas.set_background_color(Color32::BLACK);
        let id = canvas
            .add_stamp(solid([255, 0, 0, 255], 4, 4), pos2(0.0, 0.0), vec2(10.0, 10.0))
            .unwrap();

        for position in [
            pos2(1.0e20, 0.0),
            pos2(0.0, 1.0e20),
            pos2(-1.0e20, -1.0e20),
            pos2(f32::MAX, f32::MAX),
        ] {
            canvas.move_stamp(id, position).unwrap();
            let frame = canvas.render();
            assert!(frame.pixels().all(|px| *px == Rgba([0, 0, 0, 255])));
        }

        // Still there, and drawn again once it is back on the canvas
        canvas.move_stamp(id, pos2(0.0, 0.0)).unwrap();
        assert_eq!(*canvas.render().get_pixel(5, 5), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_empty_stamp_source_rejected() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        let result = canvas.add_stamp(Arc::new(RgbaImage::new(0, 0)), pos2(5.0, 5.0), vec2(10.0, 10.0));
        assert!(matches!(result, Err(CanvasError::DecodeError { .. })));
        assert!(canvas.icons().is_empty());
        assert_eq!(canvas.render().dimensions(), (20, 20));
    }

    #[test]
    fn test_null_image_falls_back_to_last_color() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.set_background_color(Color32::from_rgb(1, 2, 3));
        canvas.set_background_image(Some(solid([9, 9, 9, 255], 4, 4))).unwrap();
        canvas.set_background_image(None).unwrap();
        assert_eq!(
            canvas.background(),
            &Background::SolidColor(Color32::from_rgb(1, 2, 3))
        );
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let result = canvas.set_background_image(Some(Arc::new(RgbaImage::new(0, 0))));
        assert!(matches!(result, Err(CanvasError::DecodeError { .. })));
        assert_eq!(canvas.background(), &Background::default());
    }

    #[test]
    fn test_background_cache_follows_resize() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_background_image(Some(solid([0, 0, 200, 255], 5, 5))).unwrap();
        canvas.render();
        canvas.resize(16, 12).unwrap();
        assert_eq!(canvas.render().dimensions(), (16, 12));
    }
}
