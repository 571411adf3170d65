//! Input normalization: client-space pointer events to raster coordinates.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Bounding box of the displayed canvas element in client (CSS pixel) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect at the origin that displays the raster at 1:1.
    pub fn identity(raster: Size) -> Self {
        Self::new(0.0, 0.0, raster.width, raster.height)
    }
}

/// A single touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    pub client_x: f64,
    pub client_y: f64,
}

/// A pointer event as delivered by the host, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawPointer {
    Mouse { client_x: f64, client_y: f64 },
    Touch { touches: Vec<Touch> },
}

impl RawPointer {
    /// Primary contact point in client space.
    ///
    /// Touch events use the first contact; a touch event with no contacts has none.
    pub fn primary(&self) -> Option<Point> {
        match self {
            RawPointer::Mouse { client_x, client_y } => Some(Point::new(*client_x, *client_y)),
            RawPointer::Touch { touches } => touches
                .first()
                .map(|t| Point::new(t.client_x, t.client_y)),
        }
    }

    /// Normalize to a raster-space sample.
    pub fn to_sample(&self, bounds: ClientRect, raster: Size) -> Option<PointerSample> {
        self.primary()
            .map(|client| PointerSample::from(to_raster_coords(client, bounds, raster)))
    }
}

/// A pointer position in raster-pixel space, independent of input device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Integer pixel under the sample (floored).
    pub fn pixel(self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

impl From<Point> for PointerSample {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// Map a client-space point into raster-pixel space.
///
/// Horizontal and vertical scale are independent. No clamping is performed;
/// the result may fall outside the raster. A degenerate bounding box maps
/// with scale 1.0 on that axis.
pub fn to_raster_coords(client: Point, bounds: ClientRect, raster: Size) -> Point {
    let scale = |raster_len: f64, display_len: f64| {
        if display_len > 0.0 {
            raster_len / display_len
        } else {
            1.0
        }
    };
    let scale_x = scale(raster.width, bounds.width);
    let scale_y = scale(raster.height, bounds.height);

    Point::new(
        (client.x - bounds.left) * scale_x,
        (client.y - bounds.top) * scale_y,
    )
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether a command modifier (ctrl or meta) is held.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which element holds keyboard focus when a key arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// The drawing canvas itself.
    Canvas,
    /// No specific element (document body).
    #[default]
    Nothing,
    /// A text field or other input element.
    TextInput,
    /// Any other focusable control.
    Other,
}

impl FocusTarget {
    /// Canvas shortcuts only fire when the canvas or nothing in particular has focus.
    pub fn accepts_canvas_shortcuts(self) -> bool {
        matches!(self, FocusTarget::Canvas | FocusTarget::Nothing)
    }
}
