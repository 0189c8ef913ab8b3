use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};

use crate::error::{CanvasError, CanvasResult};

/// Raster formats a frame can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Pick the encoder from the file extension (case-insensitive). There is
    /// no fallback: anything else is [`CanvasError::UnsupportedExportFormat`].
    pub fn from_path(path: &Path) -> CanvasResult<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            _ => Err(CanvasError::UnsupportedExportFormat(path.to_path_buf())),
        }
    }
}

/// Encode `frame` to `path`, choosing the format from the extension.
pub fn export_image(frame: &RgbaImage, path: &Path, jpeg_quality: u8) -> CanvasResult<()> {
    let format = ExportFormat::from_path(path)?;
    write_image(frame, path, format, jpeg_quality)
}

pub(crate) fn write_image(
    frame: &RgbaImage,
    path: &Path,
    format: ExportFormat,
    jpeg_quality: u8,
) -> CanvasResult<()> {
    let failed = |reason: String| CanvasError::ExportFailed {
        path: path.to_path_buf(),
        reason,
    };

    // A failed encode leaves no file behind
    let mut bytes = Cursor::new(Vec::new());
    let result = match format {
        ExportFormat::Png => frame.write_with_encoder(PngEncoder::new(&mut bytes)),
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(frame.clone()).into_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(
                &mut bytes,
                jpeg_quality.clamp(1, 100),
            ))
        }
    };
    result.map_err(|err| failed(err.to_string()))?;

    std::fs::write(path, bytes.into_inner()).map_err(|err| failed(err.to_string()))
}
