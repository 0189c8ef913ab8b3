use std::path::PathBuf;

use egui::Color32;
use log::info;

use super::{CommandContext, CommandResult};
use crate::resources::{ActionIcon, BuiltinBackground, ResourceId};
use crate::text::Justify;

/// Names every toolbar and menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    New,
    SaveImage,
    Quit,
    Background(BuiltinBackground),
    CustomBackground,
    ColorBackground,
    GradientOverlay,
}

/// Where a command's glyph comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource {
    Action(ActionIcon),
    Thumbnail(BuiltinBackground),
    /// Drawn by the shell: a cyan square on dark gray
    ColorSwatch,
}

impl IconSource {
    /// The catalog entry holding this icon, if it is an image resource
    pub fn resource(&self) -> Option<ResourceId> {
        match *self {
            IconSource::Action(icon) => Some(ResourceId::ActionIcon(icon)),
            IconSource::Thumbnail(bg) => Some(ResourceId::Thumbnail(bg)),
            IconSource::ColorSwatch => None,
        }
    }
}

/// Background toolbar layout; `None` is a separator.
pub const TOOLBAR: [Option<CommandId>; 11] = [
    Some(CommandId::New),
    Some(CommandId::SaveImage),
    None,
    Some(CommandId::Background(BuiltinBackground::Mandelbrot)),
    Some(CommandId::Background(BuiltinBackground::Earthrise)),
    Some(CommandId::Background(BuiltinBackground::Sunset)),
    Some(CommandId::Background(BuiltinBackground::Cloud)),
    Some(CommandId::Background(BuiltinBackground::EagleNebula)),
    None,
    Some(CommandId::CustomBackground),
    Some(CommandId::ColorBackground),
];

/// "Background" menu layout; `None` is a separator.
pub const MENU_BACKGROUND: [Option<CommandId>; 12] = [
    Some(CommandId::Background(BuiltinBackground::Mandelbrot)),
    Some(CommandId::Background(BuiltinBackground::Earthrise)),
    Some(CommandId::Background(BuiltinBackground::Sunset)),
    Some(CommandId::Background(BuiltinBackground::Cloud)),
    Some(CommandId::Background(BuiltinBackground::EagleNebula)),
    None,
    Some(CommandId::CustomBackground),
    None,
    Some(CommandId::ColorBackground),
    None,
    Some(CommandId::GradientOverlay),
    None,
];

impl CommandId {
    pub fn label(&self) -> &'static str {
        match self {
            CommandId::New => "New",
            CommandId::SaveImage => "Save Image...",
            CommandId::Quit => "Quit",
            CommandId::Background(bg) => bg.name(),
            CommandId::CustomBackground => "Custom...",
            CommandId::ColorBackground => "Color...",
            CommandId::GradientOverlay => "Gradient Overlay",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            CommandId::New => "Start a new picture.",
            CommandId::SaveImage => "Save the picture as a PNG or JPEG file.",
            CommandId::Quit => "Quit the program.",
            CommandId::Background(_) => "Use this image as the background.",
            CommandId::CustomBackground => "Select an image file to use as the background.",
            CommandId::ColorBackground => "Use a solid color for background.",
            CommandId::GradientOverlay => "Wash the background with a fading white overlay.",
        }
    }

    pub fn icon(&self) -> Option<IconSource> {
        match self {
            CommandId::New => Some(IconSource::Action(ActionIcon::FileOpen)),
            CommandId::SaveImage => Some(IconSource::Action(ActionIcon::FileSave)),
            CommandId::Quit => Some(IconSource::Action(ActionIcon::Exit)),
            CommandId::Background(bg) => Some(IconSource::Thumbnail(*bg)),
            CommandId::CustomBackground => Some(IconSource::Action(ActionIcon::FileOpen)),
            CommandId::ColorBackground => Some(IconSource::ColorSwatch),
            CommandId::GradientOverlay => None,
        }
    }

    /// True when the shell has to collect a path or color before the
    /// command can be built.
    pub fn needs_input(&self) -> bool {
        matches!(
            self,
            CommandId::SaveImage | CommandId::CustomBackground | CommandId::ColorBackground
        )
    }
}

/// How a successfully dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// The file or color picker was dismissed; nothing changed
    Cancelled,
    /// The shell should close
    QuitRequested,
}

/// An action with its inputs resolved. Paths and colors come from external
/// pickers; `None` means the picker was cancelled.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NewPicture,
    SaveImage { path: Option<PathBuf> },
    Quit,
    ChooseBackground(BuiltinBackground),
    CustomBackground { path: Option<PathBuf> },
    ColorBackground { color: Option<Color32> },
    SetGradientOverlay(bool),
    SetText(String),
    SetFontSize(u32),
    SetJustify(Justify),
    SetTextColor(Color32),
}

impl Command {
    /// Execute the command against the canvas. Failures leave the canvas as
    /// it was.
    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::NewPicture => {
                ctx.canvas.clear();
                Ok(CommandOutcome::Done)
            }

            Command::SaveImage { path: None }
            | Command::CustomBackground { path: None }
            | Command::ColorBackground { color: None } => Ok(CommandOutcome::Cancelled),

            Command::SaveImage { path: Some(path) } => {
                ctx.canvas.export(path)?;
                Ok(CommandOutcome::Done)
            }

            Command::Quit => {
                info!("Quit requested");
                Ok(CommandOutcome::QuitRequested)
            }

            Command::ChooseBackground(bg) => {
                ctx.canvas
                    .load_background(ctx.loader, &ResourceId::Background(*bg))?;
                Ok(CommandOutcome::Done)
            }

            Command::CustomBackground { path: Some(path) } => {
                ctx.canvas
                    .load_background(ctx.loader, &ResourceId::File(path.clone()))?;
                Ok(CommandOutcome::Done)
            }

            Command::ColorBackground { color: Some(color) } => {
                ctx.canvas.set_background_color(*color);
                Ok(CommandOutcome::Done)
            }

            Command::SetGradientOverlay(enabled) => {
                ctx.canvas.set_gradient_enabled(*enabled);
                Ok(CommandOutcome::Done)
            }

            Command::SetText(text) => {
                ctx.canvas.set_text(text.clone());
                Ok(CommandOutcome::Done)
            }

            Command::SetFontSize(size) => {
                ctx.canvas.set_font_size(*size)?;
                Ok(CommandOutcome::Done)
            }

            Command::SetJustify(justify) => {
                ctx.canvas.set_justify(*justify);
                Ok(CommandOutcome::Done)
            }

            Command::SetTextColor(color) => {
                ctx.canvas.set_text_color(*color);
                Ok(CommandOutcome::Done)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{Background, Canvas};
    use crate::resources::ResourceLoader;

    #[test]
    fn test_cancelled_pickers_change_nothing() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        let loader = ResourceLoader::new("unused");
        let before = canvas.copy_image();

        for cmd in [
            Command::SaveImage { path: None },
            Command::CustomBackground { path: None },
            Command::ColorBackground { color: None },
        ] {
            let mut ctx = CommandContext::new(&mut canvas, &loader);
            assert_eq!(cmd.execute(&mut ctx).unwrap(), CommandOutcome::Cancelled);
        }
        assert!(!canvas.needs_render());
        assert_eq!(canvas.copy_image(), before);
    }

    #[test]
    fn test_color_background() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        let loader = ResourceLoader::new("unused");
        let mut ctx = CommandContext::new(&mut canvas, &loader);

        Command::ColorBackground { color: Some(Color32::RED) }
            .execute(&mut ctx)
            .unwrap();
        assert_eq!(canvas.background(), &Background::SolidColor(Color32::RED));
    }

    #[test]
    fn test_missing_builtin_keeps_background() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        canvas.set_background_color(Color32::BLUE);
        let loader = ResourceLoader::new(std::env::temp_dir().join("no_such_resources"));
        let mut ctx = CommandContext::new(&mut canvas, &loader);

        let result = Command::ChooseBackground(BuiltinBackground::Sunset).execute(&mut ctx);
        assert!(matches!(result, Err(crate::CanvasError::ResourceNotFound(_))));
        assert_eq!(canvas.background(), &Background::SolidColor(Color32::BLUE));
    }

    #[test]
    fn test_picker_commands_need_input() {
        let pickers: Vec<_> = TOOLBAR
            .iter()
            .chain(MENU_BACKGROUND.iter())
            .flatten()
            .filter(|id| id.needs_input())
            .collect();
        assert!(pickers.contains(&&CommandId::SaveImage));
        assert!(pickers.contains(&&CommandId::CustomBackground));
        assert!(pickers.contains(&&CommandId::ColorBackground));
        assert!(!CommandId::New.needs_input());
        assert!(!CommandId::GradientOverlay.needs_input());
        assert!(!CommandId::Background(BuiltinBackground::Cloud).needs_input());
    }

    #[test]
    fn test_every_toolbar_entry_has_an_icon() {
        for id in TOOLBAR.iter().flatten() {
            assert!(id.icon().is_some(), "{:?} has no icon", id);
        }
    }
}
