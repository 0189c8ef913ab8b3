use crate::compositor::Canvas;
use crate::resources::ResourceLoader;

/// What a command needs to run: the canvas it edits and the loader for
/// background images.
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The canvas being edited
    pub canvas: &'a mut Canvas,
    /// Resolves built-in and user images
    pub loader: &'a ResourceLoader,
}

impl<'a> CommandContext<'a> {
    pub fn new(canvas: &'a mut Canvas, loader: &'a ResourceLoader) -> Self {
        Self { canvas, loader }
    }
}
