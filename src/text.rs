use std::fmt;
use std::sync::OnceLock;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use egui::Color32;
use image::RgbaImage;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::compositor::blend::blend_over;
use crate::error::{CanvasError, CanvasResult};

pub const LEFT_MARGIN: f32 = 20.0;
pub const RIGHT_MARGIN: f32 = 20.0;
pub const TOP_MARGIN: f32 = 20.0;

pub const DEFAULT_FONT_SIZE: u32 = 36;

/// Horizontal alignment applied to each line independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

impl Justify {
    pub const ALL: [Justify; 3] = [Justify::Left, Justify::Center, Justify::Right];

    pub fn label(&self) -> &'static str {
        match self {
            Justify::Left => "Left",
            Justify::Center => "Center",
            Justify::Right => "Right",
        }
    }

    /// X of a line's left edge for the given canvas and line widths.
    pub fn line_offset(&self, canvas_width: f32, line_width: f32) -> f32 {
        match self {
            Justify::Left => LEFT_MARGIN,
            Justify::Center => (canvas_width - line_width) / 2.0,
            Justify::Right => canvas_width - line_width - RIGHT_MARGIN,
        }
    }
}

/// A glyph placed relative to the start of its line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    pub id: GlyphId,
    pub x: f32,
}

/// One laid-out line of text in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRun {
    pub text: String,
    /// Left edge of the line
    pub x: f32,
    /// Top of the line box
    pub top: f32,
    pub baseline: f32,
    pub width: f32,
    pub glyphs: Vec<PositionedGlyph>,
}

/// The font bundled with egui, used until a custom font is set.
fn default_font() -> Option<FontArc> {
    static DEFAULT_FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    DEFAULT_FONT
        .get_or_init(|| {
            let fonts = egui::FontDefinitions::default();
            let name = fonts
                .families
                .get(&egui::FontFamily::Proportional)
                .and_then(|family| family.first())?;
            let data = fonts.font_data.get(name)?;
            match FontArc::try_from_vec(data.font.to_vec()) {
                Ok(font) => Some(font),
                Err(err) => {
                    warn!("Bundled font '{}' is unusable: {}", name, err);
                    None
                }
            }
        })
        .clone()
}

/// Styled multi-line text drawn on top of everything else.
#[derive(Clone)]
pub struct TextLayer {
    text: String,
    font_size: u32,
    justify: Justify,
    color: Color32,
    /// Multiplier on the font's natural line height
    line_spacing: f32,
    font: Option<FontArc>,
}

impl fmt::Debug for TextLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLayer")
            .field("text", &self.text)
            .field("font_size", &self.font_size)
            .field("justify", &self.justify)
            .field("color", &self.color)
            .field("line_spacing", &self.line_spacing)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            justify: Justify::Left,
            color: Color32::BLACK,
            line_spacing: 1.0,
            font: default_font(),
        }
    }

    /// Back to empty text with default styling. A custom font is kept.
    pub fn set_defaults(&mut self) {
        self.text.clear();
        self.font_size = DEFAULT_FONT_SIZE;
        self.justify = Justify::Left;
        self.color = Color32::BLACK;
        self.line_spacing = 1.0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: u32) -> CanvasResult<()> {
        if size == 0 {
            return Err(CanvasError::InvalidGeometry("font size must be positive".to_owned()));
        }
        self.font_size = size;
        Ok(())
    }

    pub fn justify(&self) -> Justify {
        self.justify
    }

    pub fn set_justify(&mut self, justify: Justify) {
        self.justify = justify;
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    pub fn set_line_spacing(&mut self, spacing: f32) -> CanvasResult<()> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(CanvasError::InvalidGeometry(format!(
                "line spacing must be positive, got {}",
                spacing
            )));
        }
        self.line_spacing = spacing;
        Ok(())
    }

    /// Replace the font with TrueType/OpenType data. Invalid data leaves the
    /// current font in place.
    pub fn set_font_data(&mut self, data: Vec<u8>) -> CanvasResult<()> {
        let font = FontArc::try_from_vec(data).map_err(|err| CanvasError::decode("font", err))?;
        self.font = Some(font);
        Ok(())
    }

    /// Source lines, split on explicit line breaks only.
    pub fn lines(&self) -> Vec<&str> {
        if self.text.is_empty() {
            return Vec::new();
        }
        self.text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }

    /// Width of `line` at the current font size.
    pub fn line_width(&self, line: &str) -> f32 {
        self.shape_line(line).1
    }

    fn shape_line(&self, line: &str) -> (Vec<PositionedGlyph>, f32) {
        let Some(font) = &self.font else {
            return (Vec::new(), 0.0);
        };
        let scaled = font.as_scaled(PxScale::from(self.font_size as f32));

        let mut glyphs = Vec::with_capacity(line.len());
        let mut cursor_x = 0.0f32;
        let mut last_glyph: Option<GlyphId> = None;

        for ch in line.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = last_glyph {
                cursor_x += scaled.kern(prev, id);
            }
            glyphs.push(PositionedGlyph { id, x: cursor_x });
            cursor_x += scaled.h_advance(id);
            last_glyph = Some(id);
        }

        (glyphs, cursor_x)
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self) -> f32 {
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(self.font_size as f32));
                (scaled.height() + scaled.line_gap()) * self.line_spacing
            }
            None => self.font_size as f32 * self.line_spacing,
        }
    }

    fn ascent(&self) -> f32 {
        match &self.font {
            Some(font) => font.as_scaled(PxScale::from(self.font_size as f32)).ascent(),
            None => self.font_size as f32,
        }
    }

    /// Position every line for a canvas of the given size. Always computed
    /// from the current state; lines starting below the canvas are dropped.
    pub fn layout(&self, canvas_width: u32, canvas_height: u32) -> Vec<LineRun> {
        let line_height = self.line_height();
        let ascent = self.ascent();

        self.lines()
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let (glyphs, width) = self.shape_line(line);
                let top = TOP_MARGIN + i as f32 * line_height;
                LineRun {
                    text: line.to_owned(),
                    x: self.justify.line_offset(canvas_width as f32, width),
                    top,
                    baseline: top + ascent,
                    width,
                    glyphs,
                }
            })
            .take_while(|run| run.top < canvas_height as f32)
            .collect()
    }

    /// Rasterize the laid-out text onto `target`, clipping at its edges.
    pub fn paint(&self, target: &mut RgbaImage) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(self.font_size as f32);
        let [r, g, b, a] = self.color.to_srgba_unmultiplied();
        let color_alpha = a as f32 / 255.0;
        let (width, height) = target.dimensions();

        for run in self.layout(width, height) {
            for glyph in &run.glyphs {
                let positioned = glyph
                    .id
                    .with_scale_and_position(scale, point(run.x + glyph.x, run.baseline));
                let Some(outlined) = font.outline_glyph(positioned) else {
                    continue; // whitespace
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + gx as i64;
                    let py = bounds.min.y as i64 + gy as i64;
                    if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                        return;
                    }
                    blend_over(
                        target.get_pixel_mut(px as u32, py as u32),
                        [r, g, b],
                        coverage * color_alpha,
                    );
                });
            }
        }
    }
}
