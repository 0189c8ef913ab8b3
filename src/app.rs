use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::{Color32, TextureHandle, TextureId, TextureOptions};
use log::{info, warn};

use crate::command::{Command, CommandContext, CommandId, CommandOutcome, IconSource};
use crate::compositor::{Background, Canvas};
use crate::config::Settings;
use crate::error::CanvasResult;
use crate::input::InputHandler;
use crate::interaction::{InteractionController, PaletteStamp};
use crate::panels;
use crate::renderer::{to_color_image, CanvasView};
use crate::resources::{BuiltinBackground, ResourceId, ResourceLoader};

const DEFAULT_SAVE_NAME: &str = "saying.jpeg";

/// A stamp the user can pick from the palette strip.
pub struct PaletteEntry {
    pub name: String,
    pub stamp: PaletteStamp,
    pub texture: TextureHandle,
}

/// Input collected in a modal window before a command can run. The window
/// stands in for the platform file and color pickers.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    SaveImage { path: String },
    CustomBackground { path: String },
    Color { color: Color32 },
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::SaveImage { .. } => "Select Output File",
            Prompt::CustomBackground { .. } => "Select Background Image",
            Prompt::Color { .. } => "Select Background Color",
        }
    }

    /// The command this prompt resolves to; `accepted == false` is a cancel.
    pub fn into_command(self, accepted: bool) -> Command {
        let path = |text: String| {
            let trimmed = text.trim();
            (accepted && !trimmed.is_empty()).then(|| PathBuf::from(trimmed))
        };
        match self {
            Prompt::SaveImage { path: text } => Command::SaveImage { path: path(text) },
            Prompt::CustomBackground { path: text } => Command::CustomBackground { path: path(text) },
            Prompt::Color { color } => Command::ColorBackground {
                color: accepted.then_some(color),
            },
        }
    }
}

/// The desktop window: menus, toolbars and the canvas view around one
/// [`Canvas`].
pub struct SayingsApp {
    settings: Settings,
    loader: ResourceLoader,
    canvas: Canvas,
    controller: InteractionController,
    input: InputHandler,
    view: CanvasView,

    icons: HashMap<ResourceId, Option<TextureHandle>>,
    palette: Vec<PaletteEntry>,
    selected_palette: Option<usize>,

    prompt: Option<Prompt>,
    error_message: Option<String>,
    quit_requested: bool,
}

impl SayingsApp {
    /// Called once before the first frame. Settings come from `config_path`
    /// when given, otherwise from the last session's storage.
    pub fn new(cc: &eframe::CreationContext<'_>, config_path: Option<&Path>) -> CanvasResult<Self> {
        let settings = match config_path {
            Some(path) => Settings::load_or_default(path),
            None => cc
                .storage
                .and_then(|storage| eframe::get_value::<Settings>(storage, eframe::APP_KEY))
                .filter(|settings| settings.validate().is_ok())
                .unwrap_or_default(),
        };

        let mut app = Self::with_settings(settings)?;
        app.load_palette(&cc.egui_ctx);

        let earthrise = ResourceId::Background(BuiltinBackground::Earthrise);
        if let Err(err) = app.canvas.load_background(&app.loader, &earthrise) {
            warn!("Starting with a plain background: {}", err);
        }
        Ok(app)
    }

    fn with_settings(settings: Settings) -> CanvasResult<Self> {
        let canvas = Canvas::from_settings(&settings)?;
        Ok(Self {
            loader: ResourceLoader::new(settings.resource_root.clone()),
            controller: InteractionController::from_settings(&settings),
            canvas,
            input: InputHandler::new(),
            view: CanvasView::new(),
            icons: HashMap::new(),
            palette: Vec::new(),
            selected_palette: None,
            prompt: None,
            error_message: None,
            quit_requested: false,
            settings,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn view_parts(&mut self) -> (&mut Canvas, &mut InteractionController, &mut InputHandler, &mut CanvasView) {
        (&mut self.canvas, &mut self.controller, &mut self.input, &mut self.view)
    }

    /// Run a toolbar or menu action. Actions that need a path or color open
    /// the matching prompt instead.
    pub fn trigger(&mut self, id: CommandId) {
        if id.needs_input() {
            self.prompt = self.prompt_for(id);
            return;
        }

        let command = match id {
            CommandId::New => Command::NewPicture,
            CommandId::Quit => Command::Quit,
            CommandId::Background(bg) => Command::ChooseBackground(bg),
            CommandId::GradientOverlay => Command::SetGradientOverlay(!self.canvas.gradient_enabled()),
            CommandId::SaveImage | CommandId::CustomBackground | CommandId::ColorBackground => return,
        };
        self.execute(command);
    }

    fn prompt_for(&self, id: CommandId) -> Option<Prompt> {
        match id {
            CommandId::SaveImage => Some(Prompt::SaveImage {
                path: default_save_path().display().to_string(),
            }),
            CommandId::CustomBackground => Some(Prompt::CustomBackground { path: String::new() }),
            CommandId::ColorBackground => {
                let color = match self.canvas.background() {
                    Background::SolidColor(color) => *color,
                    Background::Image(_) => Color32::WHITE,
                };
                Some(Prompt::Color { color })
            }
            _ => None,
        }
    }

    pub fn execute(&mut self, command: Command) {
        let mut ctx = CommandContext::new(&mut self.canvas, &self.loader);
        match command.execute(&mut ctx) {
            Ok(CommandOutcome::Done) => {
                if command == Command::NewPicture {
                    self.controller.cancel();
                }
            }
            Ok(CommandOutcome::Cancelled) => info!("{:?} cancelled", command),
            Ok(CommandOutcome::QuitRequested) => self.quit_requested = true,
            Err(err) => {
                warn!("{:?} failed: {}", command, err);
                self.error_message = Some(err.to_string());
            }
        }
    }

    pub fn prompt_mut(&mut self) -> Option<&mut Prompt> {
        self.prompt.as_mut()
    }

    /// Close the prompt and run what it resolved to.
    pub fn finish_prompt(&mut self, accepted: bool) {
        if let Some(prompt) = self.prompt.take() {
            self.execute(prompt.into_command(accepted));
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }

    /// Texture for a command glyph, loaded on first use. A glyph that fails
    /// to load is remembered as missing and not retried.
    pub fn icon_texture(&mut self, ctx: &egui::Context, source: IconSource) -> Option<TextureId> {
        let id = source.resource()?;
        if !self.icons.contains_key(&id) {
            let texture = match self.loader.load(&id) {
                Ok(img) => Some(ctx.load_texture(id.to_string(), to_color_image(&img), TextureOptions::LINEAR)),
                Err(err) => {
                    warn!("No icon for {}: {}", id, err);
                    None
                }
            };
            self.icons.insert(id.clone(), texture);
        }
        self.icons.get(&id).and_then(|tex| tex.as_ref().map(|t| t.id()))
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    pub fn selected_palette(&self) -> Option<usize> {
        self.selected_palette
    }

    pub fn select_palette(&mut self, index: Option<usize>) {
        self.selected_palette = index.filter(|&i| i < self.palette.len());
        let stamp = self.selected_palette.map(|i| self.palette[i].stamp.clone());
        self.controller.select_palette(stamp);
    }

    pub fn clear_stamps(&mut self) {
        self.controller.cancel();
        self.canvas.clear_stamps();
    }

    /// Every `icons/*.png` under the resource root becomes a palette entry.
    fn load_palette(&mut self, ctx: &egui::Context) {
        let dir = self.loader.root().join("icons");
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("No stamp palette at {}: {}", dir.display(), err);
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        paths.sort();

        let size = egui::Vec2::splat(self.settings.default_stamp_size);
        for path in paths {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            match self.loader.load(&ResourceId::File(path.clone())) {
                Ok(img) => {
                    let texture = ctx.load_texture(format!("palette_{}", name), to_color_image(&img), TextureOptions::LINEAR);
                    self.palette.push(PaletteEntry {
                        name,
                        stamp: PaletteStamp {
                            image: Arc::new(img),
                            default_size: size,
                        },
                        texture,
                    });
                }
                Err(err) => warn!("Skipping palette icon: {}", err),
            }
        }
        info!("Loaded {} palette stamps", self.palette.len());

        if !self.palette.is_empty() {
            self.select_palette(Some(0));
        }
    }

    /// Carry the current text styling into the persisted settings.
    fn sync_settings(&mut self) {
        let text = self.canvas.text();
        self.settings.initial_text = text.text().to_owned();
        self.settings.font_size = text.font_size();
        self.settings.justify = text.justify();
    }
}

fn default_save_path() -> PathBuf {
    let desktop = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join("Desktop"))
        .filter(|dir| dir.is_dir());
    match desktop {
        Some(dir) => dir.join(DEFAULT_SAVE_NAME),
        None => PathBuf::from(DEFAULT_SAVE_NAME),
    }
}

impl eframe::App for SayingsApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.sync_settings();
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::menu_bar(self, ctx);
        panels::background_toolbar(self, ctx);
        panels::palette_strip(self, ctx);
        panels::text_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::prompt_window(self, ctx);
        panels::error_window(self, ctx);

        if self.quit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_prompt_yields_none() {
        let prompt = Prompt::SaveImage { path: "out.png".into() };
        assert_eq!(prompt.into_command(false), Command::SaveImage { path: None });

        let prompt = Prompt::Color { color: Color32::RED };
        assert_eq!(prompt.into_command(false), Command::ColorBackground { color: None });
    }

    #[test]
    fn test_blank_path_is_a_cancel() {
        let prompt = Prompt::CustomBackground { path: "   ".into() };
        assert_eq!(prompt.into_command(true), Command::CustomBackground { path: None });

        let prompt = Prompt::CustomBackground { path: " sky.png ".into() };
        assert_eq!(
            prompt.into_command(true),
            Command::CustomBackground {
                path: Some(PathBuf::from("sky.png"))
            }
        );
    }
}
