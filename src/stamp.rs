use std::fmt;
use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;
use log::debug;
use uuid::Uuid;

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::hit_testing::{self, HitTarget};

/// Stable identity of a placed stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StampId(Uuid);

impl StampId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One placed icon: a source image drawn scaled into `rect()`.
#[derive(Clone)]
pub struct IconStamp {
    id: StampId,
    /// Shared, read-only pixels; placing the same palette icon twice shares them
    source: Arc<RgbaImage>,
    position: Pos2,
    size: Vec2,
    order: u64,
}

// Custom Debug implementation to avoid dumping pixel data
impl fmt::Debug for IconStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconStamp")
            .field("id", &self.id)
            .field("source", &(self.source.width(), self.source.height()))
            .field("position", &self.position)
            .field("size", &self.size)
            .field("order", &self.order)
            .finish()
    }
}

impl IconStamp {
    pub fn id(&self) -> StampId {
        self.id
    }

    pub fn source(&self) -> &Arc<RgbaImage> {
        &self.source
    }

    /// Top-left corner in canvas coordinates
    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Insertion order; larger means painted later
    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }
}

fn validate_size(size: Vec2) -> CanvasResult<()> {
    if size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0 {
        Ok(())
    } else {
        Err(CanvasError::InvalidGeometry(format!(
            "stamp size must be positive, got {}x{}",
            size.x, size.y
        )))
    }
}

fn validate_position(position: Pos2) -> CanvasResult<()> {
    if position.x.is_finite() && position.y.is_finite() {
        Ok(())
    } else {
        Err(CanvasError::InvalidGeometry(format!(
            "stamp position must be finite, got {:?}",
            position
        )))
    }
}

/// Ordered collection of stamps. Index order is paint order; the last stamp
/// is on top and wins hit tests.
#[derive(Debug, Clone, Default)]
pub struct IconLayer {
    stamps: Vec<IconStamp>,
    next_order: u64,
}

impl IconLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new stamp on top of all others.
    pub fn add(&mut self, source: Arc<RgbaImage>, position: Pos2, size: Vec2) -> CanvasResult<StampId> {
        if source.width() == 0 || source.height() == 0 {
            return Err(CanvasError::decode("stamp", "image has no pixels"));
        }
        validate_size(size)?;
        validate_position(position)?;

        let stamp = IconStamp {
            id: StampId::new(),
            source,
            position,
            size,
            order: self.next_order,
        };
        self.next_order += 1;

        let id = stamp.id;
        debug!("Stamp {} added at {:?}, size {:?}", id, position, size);
        self.stamps.push(stamp);
        Ok(id)
    }

    /// Top-most stamp whose bounds contain `point`.
    pub fn hit_test(&self, point: Pos2) -> Option<&IconStamp> {
        self.stamps.iter().rev().find(|stamp| stamp.rect().contains(point))
    }

    /// Top-most stamp under `point`, counting its resize handle, and which
    /// part of it was hit.
    pub fn hit_test_with_handle(&self, point: Pos2, handle_radius: f32) -> Option<(&IconStamp, HitTarget)> {
        self.stamps.iter().rev().find_map(|stamp| {
            match hit_testing::classify(point, stamp.rect(), handle_radius) {
                HitTarget::None => None,
                target => Some((stamp, target)),
            }
        })
    }

    pub fn get(&self, id: StampId) -> Option<&IconStamp> {
        self.stamps.iter().find(|stamp| stamp.id == id)
    }

    fn get_mut(&mut self, id: StampId) -> CanvasResult<&mut IconStamp> {
        self.stamps
            .iter_mut()
            .find(|stamp| stamp.id == id)
            .ok_or(CanvasError::StampNotFound(id))
    }

    /// Move a stamp's top-left corner. Positions outside the canvas are kept;
    /// the stamp is clipped when painted.
    pub fn move_to(&mut self, id: StampId, position: Pos2) -> CanvasResult<()> {
        validate_position(position)?;
        let stamp = self.get_mut(id)?;
        stamp.position = position;
        Ok(())
    }

    /// Change a stamp's size, keeping its top-left corner. Non-positive sizes
    /// are rejected and leave the stamp untouched.
    pub fn resize(&mut self, id: StampId, size: Vec2) -> CanvasResult<()> {
        validate_size(size)?;
        let stamp = self.get_mut(id)?;
        stamp.size = size;
        Ok(())
    }

    /// Remove by identity. Returns false if the stamp was already gone.
    pub fn remove(&mut self, id: StampId) -> bool {
        let before = self.stamps.len();
        self.stamps.retain(|stamp| stamp.id != id);
        let removed = self.stamps.len() != before;
        if removed {
            debug!("Stamp {} removed", id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    /// Stamps in paint order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &IconStamp> {
        self.stamps.iter()
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn icon() -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_add_assigns_increasing_order() {
        let mut layer = IconLayer::new();
        let a = layer.add(icon(), pos2(0.0, 0.0), vec2(10.0, 10.0)).unwrap();
        let b = layer.add(icon(), pos2(5.0, 5.0), vec2(10.0, 10.0)).unwrap();

        assert!(layer.get(a).unwrap().order() < layer.get(b).unwrap().order());
        let ids: Vec<_> = layer.iter().map(IconStamp::id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_hit_test_prefers_most_recent() {
        let mut layer = IconLayer::new();
        let _below = layer.add(icon(), pos2(0.0, 0.0), vec2(50.0, 50.0)).unwrap();
        let above = layer.add(icon(), pos2(25.0, 25.0), vec2(50.0, 50.0)).unwrap();

        assert_eq!(layer.hit_test(pos2(30.0, 30.0)).map(IconStamp::id), Some(above));
        assert!(layer.hit_test(pos2(200.0, 200.0)).is_none());
    }

    #[test]
    fn test_resize_rejects_non_positive() {
        let mut layer = IconLayer::new();
        let id = layer.add(icon(), pos2(0.0, 0.0), vec2(20.0, 30.0)).unwrap();

        for bad in [vec2(0.0, 10.0), vec2(10.0, -1.0), vec2(f32::NAN, 10.0)] {
            let result = layer.resize(id, bad);
            assert!(matches!(result, Err(CanvasError::InvalidGeometry(_))));
            assert_eq!(layer.get(id).unwrap().size(), vec2(20.0, 30.0));
        }
    }

    #[test]
    fn test_add_rejects_empty_size() {
        let mut layer = IconLayer::new();
        assert!(layer.add(icon(), pos2(0.0, 0.0), vec2(0.0, 0.0)).is_err());
        assert!(layer.is_empty());
    }

    #[test]
    fn test_add_rejects_source_without_pixels() {
        let mut layer = IconLayer::new();
        for (w, h) in [(0, 0), (0, 4), (4, 0)] {
            let result = layer.add(Arc::new(RgbaImage::new(w, h)), pos2(5.0, 5.0), vec2(10.0, 10.0));
            assert!(matches!(result, Err(CanvasError::DecodeError { .. })));
        }
        assert!(layer.is_empty());
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut layer = IconLayer::new();
        let id = layer.add(icon(), pos2(0.0, 0.0), vec2(10.0, 10.0)).unwrap();

        assert!(layer.remove(id));
        assert!(!layer.remove(id));
        assert!(matches!(layer.move_to(id, pos2(1.0, 1.0)), Err(CanvasError::StampNotFound(_))));
    }

    #[test]
    fn test_move_outside_canvas_is_kept() {
        let mut layer = IconLayer::new();
        let id = layer.add(icon(), pos2(0.0, 0.0), vec2(10.0, 10.0)).unwrap();

        layer.move_to(id, pos2(-500.0, 9000.0)).unwrap();
        assert_eq!(layer.get(id).unwrap().position(), pos2(-500.0, 9000.0));
    }
}
