//! The window furniture around the canvas. Each function draws one panel
//! for the current egui frame and routes clicks into [`SayingsApp`].
//!
//! [`SayingsApp`]: crate::app::SayingsApp

mod central_panel;
mod dialogs;
mod menu_bar;
mod text_panel;
mod toolbar;

pub use central_panel::central_panel;
pub use dialogs::{error_window, prompt_window};
pub use menu_bar::menu_bar;
pub use text_panel::text_panel;
pub use toolbar::{background_toolbar, palette_strip};
