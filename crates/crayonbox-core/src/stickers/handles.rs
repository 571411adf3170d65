//! Corner resize handles for the selected sticker.

use super::StickerElement;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Side length of a resize handle, in raster units.
pub const HANDLE_SIZE: f64 = 8.0;

/// Which corner handle was grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandleKind {
    pub const ALL: [HandleKind; 4] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomLeft,
        HandleKind::BottomRight,
    ];

    /// Unit offset of this corner from the sticker center.
    pub(crate) fn sign(self) -> (f64, f64) {
        match self {
            HandleKind::TopLeft => (-1.0, -1.0),
            HandleKind::TopRight => (1.0, -1.0),
            HandleKind::BottomLeft => (-1.0, 1.0),
            HandleKind::BottomRight => (1.0, 1.0),
        }
    }
}

/// A manipulation handle on a sticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Handle center in raster coordinates.
    pub position: Point,
}

impl Handle {
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// The square occupied by the handle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }
}

/// Handle centers at the corners of the sticker's unrotated bounding square.
pub fn sticker_handles(sticker: &StickerElement) -> [Handle; 4] {
    let half = sticker.size / 2.0;
    HandleKind::ALL.map(|kind| {
        let (sx, sy) = kind.sign();
        Handle::new(kind, Point::new(sticker.x + sx * half, sticker.y + sy * half))
    })
}

/// Which corner handle, if any, contains `point`.
pub fn hit_test_handle(sticker: &StickerElement, point: Point) -> Option<HandleKind> {
    let half = HANDLE_SIZE / 2.0;
    sticker_handles(sticker)
        .into_iter()
        .find(|h| (point.x - h.position.x).abs() <= half && (point.y - h.position.y).abs() <= half)
        .map(|h| h.kind)
}
