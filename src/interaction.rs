//! Turns pointer gestures into stamp edits.
//!
//! One controller per pointer device. It only ever talks to the [`Canvas`]
//! through its mutating methods, which mark the frame for re-render; it never
//! touches pixels.

use std::fmt;
use std::sync::Arc;

use egui::{PointerButton, Pos2, Vec2};
use image::RgbaImage;
use log::debug;

use crate::compositor::Canvas;
use crate::config::Settings;
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{HitTarget, RESIZE_HANDLE_RADIUS};
use crate::input::InputEvent;
use crate::stamp::StampId;

pub const DEFAULT_MIN_STAMP_SIZE: f32 = 10.0;

/// The palette entry placed by a press on empty canvas.
#[derive(Clone)]
pub struct PaletteStamp {
    pub image: Arc<RgbaImage>,
    pub default_size: Vec2,
}

impl fmt::Debug for PaletteStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteStamp")
            .field("image", &self.image.dimensions())
            .field("default_size", &self.default_size)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Dragging {
        stamp: StampId,
        /// Press point minus the stamp's top-left at press time
        offset: Vec2,
    },
    Resizing {
        stamp: StampId,
        initial_size: Vec2,
        start_pos: Pos2,
    },
}

#[derive(Debug)]
pub struct InteractionController {
    state: InteractionState,
    palette: Option<PaletteStamp>,
    handle_radius: f32,
    min_stamp_size: f32,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            palette: None,
            handle_radius: RESIZE_HANDLE_RADIUS,
            min_stamp_size: DEFAULT_MIN_STAMP_SIZE,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            handle_radius: settings.handle_radius,
            min_stamp_size: settings.min_stamp_size,
            ..Self::new()
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn handle_radius(&self) -> f32 {
        self.handle_radius
    }

    /// Choose what a press on empty canvas places; `None` disables placing.
    pub fn select_palette(&mut self, palette: Option<PaletteStamp>) {
        self.palette = palette;
    }

    pub fn palette(&self) -> Option<&PaletteStamp> {
        self.palette.as_ref()
    }

    /// What a press at `pos` would grab, for cursor feedback.
    pub fn hover_target(&self, canvas: &Canvas, pos: Pos2) -> HitTarget {
        canvas
            .stamp_target_at(pos, self.handle_radius)
            .map_or(HitTarget::None, |(_, target)| target)
    }

    /// Dispatch one input event. Returns true if the canvas was changed.
    pub fn handle_event(&mut self, canvas: &mut Canvas, event: &InputEvent) -> CanvasResult<bool> {
        match *event {
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
            } => self.pointer_down(canvas, pos),
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Secondary,
            } => Ok(self.is_idle() && self.remove_at(canvas, pos)),
            InputEvent::PointerDown { .. } => Ok(false),
            InputEvent::PointerMove { pos } => self.pointer_move(canvas, pos),
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                ..
            } => {
                self.pointer_up();
                Ok(false)
            }
            InputEvent::PointerUp { .. } => Ok(false),
            InputEvent::DoubleClick { pos } => Ok(self.double_press(canvas, pos)),
            InputEvent::Cancel => {
                self.cancel();
                Ok(false)
            }
        }
    }

    /// Primary press. On a resize handle starts resizing, on a stamp body
    /// starts dragging, on empty canvas places the selected palette stamp and
    /// starts dragging it.
    pub fn pointer_down(&mut self, canvas: &mut Canvas, pos: Pos2) -> CanvasResult<bool> {
        if !self.is_idle() {
            return Ok(false);
        }

        match canvas.stamp_target_at(pos, self.handle_radius) {
            Some((stamp, HitTarget::ResizeHandle)) => {
                let initial_size = canvas
                    .stamp(stamp)
                    .map(|s| s.size())
                    .ok_or(CanvasError::StampNotFound(stamp))?;
                debug!("Resizing stamp {} from {:?}", stamp, initial_size);
                self.state = InteractionState::Resizing {
                    stamp,
                    initial_size,
                    start_pos: pos,
                };
                Ok(false)
            }
            Some((stamp, _)) => {
                let origin = canvas
                    .stamp(stamp)
                    .map(|s| s.position())
                    .ok_or(CanvasError::StampNotFound(stamp))?;
                debug!("Dragging stamp {}", stamp);
                self.state = InteractionState::Dragging {
                    stamp,
                    offset: pos - origin,
                };
                Ok(false)
            }
            None => {
                let Some(palette) = &self.palette else {
                    return Ok(false);
                };
                let stamp = canvas.add_stamp(palette.image.clone(), pos, palette.default_size)?;
                self.state = InteractionState::Dragging {
                    stamp,
                    offset: Vec2::ZERO,
                };
                Ok(true)
            }
        }
    }

    pub fn pointer_move(&mut self, canvas: &mut Canvas, pos: Pos2) -> CanvasResult<bool> {
        let result = match self.state {
            InteractionState::Idle => return Ok(false),
            InteractionState::Dragging { stamp, offset } => canvas.move_stamp(stamp, pos - offset),
            InteractionState::Resizing {
                stamp,
                initial_size,
                start_pos,
            } => {
                let size = (initial_size + (pos - start_pos)).max(Vec2::splat(self.min_stamp_size));
                canvas.resize_stamp(stamp, size)
            }
        };

        match result {
            Ok(()) => Ok(true),
            Err(CanvasError::StampNotFound(id)) => {
                // Removed underneath us (e.g. the canvas was cleared mid-drag)
                debug!("Stamp {} vanished during gesture", id);
                self.state = InteractionState::Idle;
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Abandon the gesture. The last applied position or size stays.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!("Gesture cancelled in {:?}", self.state);
        }
        self.state = InteractionState::Idle;
    }

    /// Double press while idle removes the stamp under the pointer.
    pub fn double_press(&mut self, canvas: &mut Canvas, pos: Pos2) -> bool {
        self.is_idle() && self.remove_at(canvas, pos)
    }

    fn remove_at(&mut self, canvas: &mut Canvas, pos: Pos2) -> bool {
        match canvas.stamp_at(pos).map(|stamp| stamp.id()) {
            Some(id) => canvas.remove_stamp(id),
            None => false,
        }
    }
}
