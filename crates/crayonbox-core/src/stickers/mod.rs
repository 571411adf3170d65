//! Sticker overlays: positioned, sized, rotated glyph stamps above the ink layer.
//!
//! Stickers are pure data kept in z-order (insertion order). Selection is
//! transient UI state tracked alongside them and never persisted.

mod catalog;
mod handles;
mod painter;

pub use catalog::{CatalogEntry, STICKER_CATALOG, StickerCatalog};
pub use handles::{HANDLE_SIZE, Handle, HandleKind, hit_test_handle, sticker_handles};
pub use painter::{BadgePainter, StickerPainter};

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Size given to a newly placed sticker.
pub const DEFAULT_STICKER_SIZE: f64 = 40.0;
/// Extra radius around a sticker that still counts as a hit.
pub const HIT_PADDING: f64 = 10.0;
/// Smallest sticker size for every resize path.
pub const MIN_STICKER_SIZE: f64 = 20.0;
/// Largest size reachable by dragging a corner handle.
pub const MAX_DRAG_SIZE: f64 = 100.0;
/// Largest size reachable with the toolbar grow button.
pub const MAX_STEP_SIZE: f64 = 80.0;
/// Drag distance to size change ratio for handle resizes.
const DRAG_RESIZE_FACTOR: f64 = 0.5;

/// Identifier of a placed sticker, increasing in placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StickerId(pub u64);

impl std::fmt::Display for StickerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sticker-{}", self.0)
    }
}

/// A placed sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerElement {
    pub id: StickerId,
    /// Catalog id of the sticker type.
    pub sticker_type_id: String,
    /// Center in raster coordinates.
    pub x: f64,
    pub y: f64,
    /// Side length of the glyph's bounding square.
    pub size: f64,
    /// Rotation in degrees, normalized to `[0, 360)`.
    pub rotation_degrees: f64,
}

impl StickerElement {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether `point` is within the sticker's hit radius.
    pub fn hit_test(&self, point: Point) -> bool {
        self.center().distance(point) < self.size / 2.0 + HIT_PADDING
    }
}

/// Size produced by a handle drag.
///
/// Deliberately coarse: the distance dragged, signed by whether the drag went
/// right/down or left/up overall, scaled by one half. Which corner is held
/// does not matter.
pub fn drag_resize_size(start_size: f64, start: Point, current: Point) -> f64 {
    let dx = current.x - start.x;
    let dy = current.y - start.y;
    let delta = (dx * dx + dy * dy).sqrt();
    let direction = if dx + dy > 0.0 { 1.0 } else { -1.0 };
    (start_size + delta * direction * DRAG_RESIZE_FACTOR).clamp(MIN_STICKER_SIZE, MAX_DRAG_SIZE)
}

/// The sticker collection of a drawing session.
#[derive(Debug, Clone, Default)]
pub struct StickerOverlay {
    /// Stickers back to front.
    elements: Vec<StickerElement>,
    selected: Option<StickerId>,
    next_id: u64,
}

impl StickerOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stickers in z-order (back to front).
    pub fn elements(&self) -> &[StickerElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: StickerId) -> Option<&StickerElement> {
        self.elements.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: StickerId) -> Option<&mut StickerElement> {
        self.elements.iter_mut().find(|s| s.id == id)
    }

    /// Place a new sticker on top of all others.
    pub fn place(&mut self, sticker_type_id: &str, point: Point) -> &StickerElement {
        self.next_id += 1;
        let id = StickerId(self.next_id);
        self.elements.push(StickerElement {
            id,
            sticker_type_id: sticker_type_id.to_string(),
            x: point.x,
            y: point.y,
            size: DEFAULT_STICKER_SIZE,
            rotation_degrees: 0.0,
        });
        log::debug!("Placed {} ({}) at ({:.1}, {:.1})", id, sticker_type_id, point.x, point.y);
        &self.elements[self.elements.len() - 1]
    }

    /// Topmost sticker whose hit radius contains `point`.
    ///
    /// When stickers overlap, the one drawn last (visually on top) wins.
    pub fn hit_test(&self, point: Point) -> Option<&StickerElement> {
        self.elements.iter().rev().find(|s| s.hit_test(point))
    }

    /// Corner handle of the selected sticker under `point`.
    pub fn hit_test_handle(&self, point: Point) -> Option<(StickerId, HandleKind)> {
        let sticker = self.selected_element()?;
        hit_test_handle(sticker, point).map(|kind| (sticker.id, kind))
    }

    /// Set the size from a handle drag, clamped to `[20, 100]`.
    pub fn resize_by_drag(
        &mut self,
        id: StickerId,
        start_size: f64,
        start: Point,
        current: Point,
    ) -> Option<f64> {
        let sticker = self.get_mut(id)?;
        sticker.size = drag_resize_size(start_size, start, current);
        Some(sticker.size)
    }

    /// Grow or shrink by `delta`, clamped to `[20, 80]`.
    pub fn resize_by_step(&mut self, id: StickerId, delta: f64) -> Option<f64> {
        let sticker = self.get_mut(id)?;
        sticker.size = (sticker.size + delta).clamp(MIN_STICKER_SIZE, MAX_STEP_SIZE);
        Some(sticker.size)
    }

    /// Add `delta_degrees` to the rotation, wrapped into `[0, 360)`.
    pub fn rotate(&mut self, id: StickerId, delta_degrees: f64) -> Option<f64> {
        let sticker = self.get_mut(id)?;
        sticker.rotation_degrees = (sticker.rotation_degrees + delta_degrees).rem_euclid(360.0);
        Some(sticker.rotation_degrees)
    }

    /// Delete a sticker, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: StickerId) -> Option<StickerElement> {
        let pos = self.elements.iter().position(|s| s.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.elements.remove(pos))
    }

    /// Remove every sticker and the selection.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected = None;
    }

    pub fn selected(&self) -> Option<StickerId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&StickerElement> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: StickerId) -> bool {
        self.selected == Some(id)
    }

    /// Select a sticker (replacing any previous selection).
    pub fn select(&mut self, id: StickerId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Select `id`, or deselect it if it is already selected.
    pub fn toggle_selection(&mut self, id: StickerId) {
        if self.selected == Some(id) {
            self.selected = None;
        } else {
            self.select(id);
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_defaults_and_order() {
        let mut overlay = StickerOverlay::new();
        let a = overlay.place("star", Point::new(10.0, 20.0)).id;
        let b = overlay.place("heart", Point::new(30.0, 40.0)).id;

        assert!(b > a);
        let placed = overlay.get(a).unwrap();
        assert_eq!(placed.size, DEFAULT_STICKER_SIZE);
        assert_eq!(placed.rotation_degrees, 0.0);
        assert_eq!(overlay.elements().last().map(|s| s.id), Some(b));
    }

    #[test]
    fn test_hit_test_padding() {
        let mut overlay = StickerOverlay::new();
        let id = overlay.place("star", Point::new(100.0, 100.0)).id;
        // Radius 20 + padding 10.
        assert_eq!(overlay.hit_test(Point::new(129.0, 100.0)).map(|s| s.id), Some(id));
        assert!(overlay.hit_test(Point::new(130.0, 100.0)).is_none());
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut overlay = StickerOverlay::new();
        overlay.place("star", Point::new(100.0, 100.0));
        let top = overlay.place("heart", Point::new(110.0, 100.0)).id;
        assert_eq!(overlay.hit_test(Point::new(105.0, 100.0)).map(|s| s.id), Some(top));
    }

    #[test]
    fn test_drag_resize_clamps() {
        let mut overlay = StickerOverlay::new();
        let id = overlay.place("star", Point::new(100.0, 100.0)).id;
        let start = Point::new(120.0, 120.0);

        // Far down-right: requested size well above 100.
        let size = overlay.resize_by_drag(id, 40.0, start, Point::new(1120.0, 120.0));
        assert_eq!(size, Some(MAX_DRAG_SIZE));

        // Far up-left: requested size well below 20.
        let size = overlay.resize_by_drag(id, 40.0, start, Point::new(20.0, 120.0));
        assert_eq!(size, Some(MIN_STICKER_SIZE));
    }

    #[test]
    fn test_drag_resize_formula() {
        let start = Point::new(0.0, 0.0);
        assert_eq!(drag_resize_size(40.0, start, Point::new(30.0, 40.0)), 65.0);
        assert_eq!(drag_resize_size(40.0, start, Point::new(-6.0, -8.0)), 35.0);
        // Diagonal where dx + dy == 0 shrinks.
        assert_eq!(drag_resize_size(40.0, start, Point::new(6.0, -6.0)), 40.0 - 72f64.sqrt() * 0.5);
        // Corner identity is irrelevant: only the drag vector counts.
        assert_eq!(drag_resize_size(50.0, start, Point::new(10.0, 0.0)), 55.0);
    }

    #[test]
    fn test_step_resize_clamps_to_80() {
        let mut overlay = StickerOverlay::new();
        let id = overlay.place("star", Point::ZERO).id;
        assert_eq!(overlay.resize_by_step(id, 10.0), Some(50.0));
        assert_eq!(overlay.resize_by_step(id, 100.0), Some(MAX_STEP_SIZE));
        assert_eq!(overlay.resize_by_step(id, -500.0), Some(MIN_STICKER_SIZE));
    }

    #[test]
    fn test_rotation_wraps() {
        let mut overlay = StickerOverlay::new();
        let id = overlay.place("star", Point::ZERO).id;
        overlay.rotate(id, 350.0);
        assert_eq!(overlay.rotate(id, 350.0), Some(340.0));
        assert_eq!(overlay.rotate(id, -350.0), Some(350.0));
        assert_eq!(overlay.rotate(id, -15.0), Some(335.0));
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut overlay = StickerOverlay::new();
        let a = overlay.place("star", Point::ZERO).id;
        let b = overlay.place("heart", Point::ZERO).id;

        overlay.select(a);
        overlay.remove(b);
        assert_eq!(overlay.selected(), Some(a));

        overlay.remove(a);
        assert_eq!(overlay.selected(), None);
        assert!(overlay.is_empty());
        assert!(overlay.remove(a).is_none());
    }

    #[test]
    fn test_toggle_selection() {
        let mut overlay = StickerOverlay::new();
        let a = overlay.place("star", Point::ZERO).id;
        let b = overlay.place("heart", Point::new(200.0, 0.0)).id;

        overlay.toggle_selection(a);
        assert!(overlay.is_selected(a));
        overlay.toggle_selection(b);
        assert!(overlay.is_selected(b));
        overlay.toggle_selection(b);
        assert_eq!(overlay.selected(), None);
        assert!(!overlay.select(StickerId(999)));
    }

    #[test]
    fn test_handle_hit_requires_selection() {
        let mut overlay = StickerOverlay::new();
        let id = overlay.place("star", Point::new(100.0, 100.0)).id;
        let corner = Point::new(120.0, 120.0);

        assert!(overlay.hit_test_handle(corner).is_none());
        overlay.select(id);
        assert_eq!(overlay.hit_test_handle(corner), Some((id, HandleKind::BottomRight)));
    }
}
