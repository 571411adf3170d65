//! Rasterization of sticker glyphs into the display layer.

use super::catalog::CatalogEntry;
use crate::color::Rgba;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// Draws a sticker glyph into a pixmap.
///
/// `transform` maps the sticker's local space (origin at the sticker center,
/// rotation applied) into the target; `size` is the glyph's side length.
pub trait StickerPainter {
    fn paint(&self, target: &mut Pixmap, entry: &CatalogEntry, size: f32, transform: Transform);
}

/// Paints each sticker as a round badge in the catalog tint with an
/// orientation dot near its top edge, so rotation stays visible.
///
/// Hosts with an emoji font can supply their own painter.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgePainter;

impl BadgePainter {
    const MARKER: Rgba = Rgba::WHITE;
}

impl StickerPainter for BadgePainter {
    fn paint(&self, target: &mut Pixmap, entry: &CatalogEntry, size: f32, transform: Transform) {
        let radius = size / 2.0;
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };

        if let Some(disc) = PathBuilder::from_circle(0.0, 0.0, radius) {
            paint.set_color(entry.tint.to_skia());
            target.fill_path(&disc, &paint, FillRule::Winding, transform, None);
        }

        if let Some(marker) = PathBuilder::from_circle(0.0, -radius * 0.6, radius * 0.2) {
            paint.set_color(Self::MARKER.to_skia());
            target.fill_path(&marker, &paint, FillRule::Winding, transform, None);
        }
    }
}
