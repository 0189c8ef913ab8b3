use std::path::PathBuf;

use thiserror::Error;

use crate::stamp::StampId;

/// Errors surfaced by canvas operations.
///
/// None of these leave the canvas partially updated: the call that fails has
/// not applied any of its changes.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A resource could not be found where its descriptor says it lives
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The resource exists but is not a readable image (or font)
    #[error("Could not decode {source_name}: {reason}")]
    DecodeError { source_name: String, reason: String },

    /// A size or position that would break the stamp/canvas invariants
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Export path extension is not one we have an encoder for
    #[error("The output file name must end with .png, .jpg or .jpeg (got {})", .0.display())]
    UnsupportedExportFormat(PathBuf),

    /// The addressed stamp is no longer part of the icon layer
    #[error("Stamp {0} is not on the canvas")]
    StampNotFound(StampId),

    /// The format was accepted but encoding or writing failed
    #[error("Failed to export image to {}: {reason}", .path.display())]
    ExportFailed { path: PathBuf, reason: String },
}

impl CanvasError {
    pub(crate) fn decode(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::DecodeError {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
