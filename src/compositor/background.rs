use std::fmt;
use std::sync::Arc;

use egui::Color32;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::blend::blend_over;
use crate::geometry::aspect_fill;

pub const DEFAULT_BACKGROUND_COLOR: Color32 = Color32::LIGHT_GRAY;
pub const DEFAULT_GRADIENT_OPACITY: f32 = 0.75;

/// What fills the canvas before anything else is drawn.
#[derive(Clone, PartialEq)]
pub enum Background {
    /// Aspect-filled over the canvas
    Image(Arc<RgbaImage>),
    SolidColor(Color32),
}

impl Default for Background {
    fn default() -> Self {
        Background::SolidColor(DEFAULT_BACKGROUND_COLOR)
    }
}

impl fmt::Debug for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Image(img) => f
                .debug_tuple("Image")
                .field(&(img.width(), img.height()))
                .finish(),
            Background::SolidColor(color) => f.debug_tuple("SolidColor").field(color).finish(),
        }
    }
}

impl Background {
    /// Size of the source image, if this is an image background
    pub fn original_size(&self) -> Option<(u32, u32)> {
        match self {
            Background::Image(img) => Some(img.dimensions()),
            Background::SolidColor(_) => None,
        }
    }

    /// Produce a canvas-sized, fully opaque frame for this background.
    pub fn render(&self, width: u32, height: u32) -> RgbaImage {
        match self {
            Background::SolidColor(color) => {
                let [r, g, b, _] = color.to_srgba_unmultiplied();
                RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]))
            }
            Background::Image(img) => {
                let fill = aspect_fill(img.width(), img.height(), width, height);
                let scaled = if (fill.scaled_width, fill.scaled_height) == img.dimensions() {
                    (**img).clone()
                } else {
                    imageops::resize(&**img, fill.scaled_width, fill.scaled_height, FilterType::Triangle)
                };
                let mut frame =
                    imageops::crop_imm(&scaled, fill.crop_x, fill.crop_y, width, height).to_image();
                // Transparent regions of the source show as black rather than
                // leaking alpha into the exported frame.
                for px in frame.pixels_mut() {
                    if px[3] != 255 {
                        let a = px[3] as f32 / 255.0;
                        let mut opaque = Rgba([0, 0, 0, 255]);
                        blend_over(&mut opaque, [px[0], px[1], px[2]], a);
                        *px = opaque;
                    }
                }
                frame
            }
        }
    }
}

/// Direction the overlay fades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientKind {
    /// Full strength at the top edge, transparent at the bottom
    #[default]
    TopToBottom,
    /// Full strength at the top and bottom edges, transparent at the middle
    EdgeToCenter,
}

/// A semi-transparent color wash between the background and the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientSpec {
    pub color: Color32,
    pub kind: GradientKind,
    /// Alpha at full strength, 0-1
    pub opacity: f32,
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            color: Color32::WHITE,
            kind: GradientKind::TopToBottom,
            opacity: DEFAULT_GRADIENT_OPACITY,
        }
    }
}

impl GradientSpec {
    /// Overlay alpha for row `y` of a canvas `height` rows tall.
    pub fn alpha_at(&self, y: u32, height: u32) -> f32 {
        if height <= 1 {
            return self.opacity;
        }
        let t = y as f32 / (height - 1) as f32;
        let strength = match self.kind {
            GradientKind::TopToBottom => 1.0 - t,
            GradientKind::EdgeToCenter => (2.0 * t - 1.0).abs(),
        };
        self.opacity * strength
    }

    pub fn paint(&self, frame: &mut RgbaImage) {
        let [r, g, b, _] = self.color.to_srgba_unmultiplied();
        let height = frame.height();
        for (y, row) in frame.enumerate_rows_mut() {
            let alpha = self.alpha_at(y, height);
            if alpha <= 0.0 {
                continue;
            }
            for (_, _, px) in row {
                blend_over(px, [r, g, b], alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_fills() {
        let frame = Background::SolidColor(Color32::from_rgb(10, 20, 30)).render(5, 3);
        assert_eq!(frame.dimensions(), (5, 3));
        assert!(frame.pixels().all(|px| *px == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn test_image_covers_without_distortion() {
        // Left half red, right half blue; a square target crops to the middle
        let mut src = RgbaImage::from_pixel(40, 10, Rgba([255, 0, 0, 255]));
        for x in 20..40 {
            for y in 0..10 {
                src.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        let frame = Background::Image(Arc::new(src)).render(10, 10);

        assert_eq!(frame.dimensions(), (10, 10));
        assert_eq!(*frame.get_pixel(0, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(9, 5), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_gradient_fades_to_transparent() {
        let spec = GradientSpec::default();
        assert_eq!(spec.alpha_at(0, 100), DEFAULT_GRADIENT_OPACITY);
        assert_eq!(spec.alpha_at(99, 100), 0.0);

        let edge = GradientSpec {
            kind: GradientKind::EdgeToCenter,
            ..spec
        };
        assert_eq!(edge.alpha_at(99, 100), DEFAULT_GRADIENT_OPACITY);
        assert!(edge.alpha_at(50, 100) < 0.05);
    }
}
