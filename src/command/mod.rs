mod commands;
mod context;

pub use commands::{Command, CommandId, CommandOutcome, IconSource, MENU_BACKGROUND, TOOLBAR};
pub use context::CommandContext;

use crate::error::CanvasError;

/// Result type for command operations
pub type CommandResult = Result<CommandOutcome, CanvasError>;
