//! Freehand brush and eraser strokes rendered into the ink layer.

use crate::color::Rgba;
use crate::raster::RasterBuffer;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use tiny_skia::{BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Stroke, Transform};

/// Smallest brush width offered.
pub const MIN_BRUSH_SIZE: f64 = 2.0;
/// Largest brush width offered.
pub const MAX_BRUSH_SIZE: f64 = 20.0;
/// Default brush width.
pub const DEFAULT_BRUSH_SIZE: f64 = 8.0;
/// Eraser width relative to the nominal brush width.
pub const ERASER_SCALE: f64 = 2.0;

/// How a stroke composites into the ink layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeMode {
    /// Source-over painting with the tool color.
    #[default]
    Paint,
    /// Destination-out: pixels along the path become transparent.
    Erase,
}

/// Paint parameters for a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub mode: StrokeMode,
    pub color: Rgba,
    /// Nominal brush width in raster units.
    pub size: f64,
}

impl Tool {
    pub fn brush(color: Rgba, size: f64) -> Self {
        Self {
            mode: StrokeMode::Paint,
            color,
            size: clamp_brush_size(size),
        }
    }

    pub fn eraser(size: f64) -> Self {
        Self {
            mode: StrokeMode::Erase,
            color: Rgba::TRANSPARENT,
            size: clamp_brush_size(size),
        }
    }

    /// Same tool with a new nominal width, clamped to the offered range.
    pub fn with_size(self, size: f64) -> Self {
        Self {
            size: clamp_brush_size(size),
            ..self
        }
    }

    /// Width actually rasterized: erasers are twice the nominal width.
    pub fn effective_width(&self) -> f64 {
        match self.mode {
            StrokeMode::Paint => self.size,
            StrokeMode::Erase => self.size * ERASER_SCALE,
        }
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        match self.mode {
            StrokeMode::Paint => {
                paint.set_color(self.color.to_skia());
                paint.blend_mode = BlendMode::SourceOver;
            }
            StrokeMode::Erase => {
                paint.set_color(tiny_skia::Color::BLACK);
                paint.blend_mode = BlendMode::DestinationOut;
            }
        }
        paint
    }
}

impl Default for Tool {
    fn default() -> Self {
        Self::brush(Rgba::opaque(0xef, 0x44, 0x44), DEFAULT_BRUSH_SIZE)
    }
}

/// Clamp a nominal brush width into `[MIN_BRUSH_SIZE, MAX_BRUSH_SIZE]`.
pub fn clamp_brush_size(size: f64) -> f64 {
    if size.is_nan() {
        return DEFAULT_BRUSH_SIZE;
    }
    size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
}

/// An in-progress stroke.
#[derive(Debug, Clone)]
struct ActiveStroke {
    tool: Tool,
    start: Point,
    last: Point,
    segments: usize,
}

/// Renders continuous paths into the ink layer as pointer samples arrive.
#[derive(Debug, Clone, Default)]
pub struct StrokeRenderer {
    active: Option<ActiveStroke>,
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stroke is open.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a path at `point`. Nothing is written until the stroke is extended or ended.
    pub fn begin(&mut self, point: Point, tool: Tool) {
        self.active = Some(ActiveStroke {
            tool,
            start: point,
            last: point,
            segments: 0,
        });
    }

    /// Append a segment from the previous point to `point`.
    ///
    /// Returns false when no stroke is open.
    pub fn extend(&mut self, ink: &mut RasterBuffer, point: Point) -> bool {
        let Some(stroke) = self.active.as_mut() else {
            return false;
        };

        if point == stroke.last {
            stamp_dot(ink, point, &stroke.tool);
        } else if let Some(path) = segment_path(stroke.last, point) {
            let line = Stroke {
                width: stroke.tool.effective_width() as f32,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Default::default()
            };
            ink.pixmap_mut().stroke_path(
                &path,
                &stroke.tool.paint(),
                &line,
                Transform::identity(),
                None,
            );
        }

        stroke.last = point;
        stroke.segments += 1;
        true
    }

    /// Finish the stroke. A stroke that never moved leaves a round dot.
    pub fn end(&mut self, ink: &mut RasterBuffer) -> bool {
        let Some(stroke) = self.active.take() else {
            return false;
        };
        if stroke.segments == 0 {
            stamp_dot(ink, stroke.start, &stroke.tool);
        }
        true
    }
}

fn segment_path(from: Point, to: Point) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x as f32, from.y as f32);
    pb.line_to(to.x as f32, to.y as f32);
    pb.finish()
}

/// Fill a disc of the stroke's width centered at `point`.
fn stamp_dot(ink: &mut RasterBuffer, point: Point, tool: &Tool) {
    let radius = (tool.effective_width() / 2.0) as f32;
    if let Some(circle) = PathBuilder::from_circle(point.x as f32, point.y as f32, radius) {
        ink.pixmap_mut().fill_path(
            &circle,
            &tool.paint(),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}
