#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod panels;
pub mod renderer;
pub mod resources;
pub mod stamp;
pub mod text;

pub use app::SayingsApp;
pub use command::{Command, CommandContext, CommandId, CommandOutcome, CommandResult};
pub use compositor::{Background, Canvas, GradientKind, GradientSpec};
pub use config::{ConfigError, Settings};
pub use error::{CanvasError, CanvasResult};
pub use export::{export_image, ExportFormat};
pub use input::{InputEvent, InputHandler};
pub use interaction::{InteractionController, InteractionState, PaletteStamp};
pub use renderer::CanvasView;
pub use resources::{ActionIcon, BuiltinBackground, ResourceId, ResourceLoader};
pub use stamp::{IconLayer, IconStamp, StampId};
pub use text::{Justify, TextLayer};
