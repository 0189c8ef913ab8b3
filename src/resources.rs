//! Built-in resource catalog and the single loader every image goes through.
//!
//! Built-in identifiers are an explicit enum resolved against a resource root;
//! user-supplied images come in as [`ResourceId::File`]. Both end up as an
//! [`RgbaImage`] or a classified [`CanvasError`].

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};

use crate::error::{CanvasError, CanvasResult};

/// The built-in background images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinBackground {
    Mandelbrot,
    Earthrise,
    Sunset,
    Cloud,
    EagleNebula,
}

impl BuiltinBackground {
    pub const ALL: [BuiltinBackground; 5] = [
        BuiltinBackground::Mandelbrot,
        BuiltinBackground::Earthrise,
        BuiltinBackground::Sunset,
        BuiltinBackground::Cloud,
        BuiltinBackground::EagleNebula,
    ];

    /// Name as shown in menus
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinBackground::Mandelbrot => "Mandelbrot",
            BuiltinBackground::Earthrise => "Earthrise",
            BuiltinBackground::Sunset => "Sunset",
            BuiltinBackground::Cloud => "Cloud",
            BuiltinBackground::EagleNebula => "Eagle_nebula",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bg| bg.name().eq_ignore_ascii_case(name))
    }

    fn image_path(&self) -> &'static str {
        match self {
            BuiltinBackground::Mandelbrot => "images/mandelbrot.jpeg",
            BuiltinBackground::Earthrise => "images/earthrise.jpeg",
            BuiltinBackground::Sunset => "images/sunset.jpeg",
            BuiltinBackground::Cloud => "images/cloud.jpeg",
            BuiltinBackground::EagleNebula => "images/eagle_nebula.jpeg",
        }
    }

    fn thumbnail_path(&self) -> &'static str {
        match self {
            BuiltinBackground::Mandelbrot => "images/mandelbrot_thumbnail.jpeg",
            BuiltinBackground::Earthrise => "images/earthrise_thumbnail.jpeg",
            BuiltinBackground::Sunset => "images/sunset_thumbnail.jpeg",
            BuiltinBackground::Cloud => "images/cloud_thumbnail.jpeg",
            BuiltinBackground::EagleNebula => "images/eagle_nebula_thumbnail.jpeg",
        }
    }
}

/// Glyphs used by toolbar and menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionIcon {
    FileOpen,
    FileSave,
    Exit,
}

impl ActionIcon {
    fn path(&self) -> &'static str {
        match self {
            ActionIcon::FileOpen => "action_icons/fileopen.png",
            ActionIcon::FileSave => "action_icons/filesave.png",
            ActionIcon::Exit => "action_icons/exit.png",
        }
    }
}

/// Anything the loader knows how to turn into pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Background(BuiltinBackground),
    Thumbnail(BuiltinBackground),
    ActionIcon(ActionIcon),
    /// A user-selected file
    File(PathBuf),
}

impl ResourceId {
    pub fn is_builtin(&self) -> bool {
        !matches!(self, ResourceId::File(_))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Background(bg) => write!(f, "background '{}'", bg.name()),
            ResourceId::Thumbnail(bg) => write!(f, "thumbnail '{}'", bg.name()),
            ResourceId::ActionIcon(icon) => write!(f, "action icon {:?}", icon),
            ResourceId::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves [`ResourceId`]s to decoded RGBA buffers.
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    root: PathBuf,
}

impl ResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location a resource resolves to
    pub fn resolve(&self, id: &ResourceId) -> PathBuf {
        match id {
            ResourceId::Background(bg) => self.root.join(bg.image_path()),
            ResourceId::Thumbnail(bg) => self.root.join(bg.thumbnail_path()),
            ResourceId::ActionIcon(icon) => self.root.join(icon.path()),
            ResourceId::File(path) => path.clone(),
        }
    }

    /// Load and decode a resource.
    ///
    /// A missing file is [`CanvasError::ResourceNotFound`]; a file that exists
    /// but cannot be read or decoded is [`CanvasError::DecodeError`].
    pub fn load(&self, id: &ResourceId) -> CanvasResult<RgbaImage> {
        let path = self.resolve(id);
        debug!("Loading {} from {}", id, path.display());

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if id.is_builtin() {
                    warn!("Built-in {} missing at {}", id, path.display());
                }
                return Err(CanvasError::ResourceNotFound(format!(
                    "{} ({})",
                    id,
                    path.display()
                )));
            }
            Err(err) => return Err(CanvasError::decode(id.to_string(), err)),
        };

        load_bytes(&id.to_string(), &bytes)
    }
}

/// Decode an in-memory image (dropped files, palette icons).
pub fn load_bytes(source_name: &str, bytes: &[u8]) -> CanvasResult<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(|err| CanvasError::decode(source_name, err))?;
    let rgba = img.into_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CanvasError::decode(source_name, "image has no pixels"));
    }
    debug!("Decoded {}: {}x{}", source_name, rgba.width(), rgba.height());
    Ok(rgba)
}
