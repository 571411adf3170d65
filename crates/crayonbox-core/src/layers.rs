//! The two-layer canvas: persistent ink and the composited display.
//!
//! Strokes and fills write only to `ink`. `display` is derived state: ink,
//! then stickers in z-order, then the selection decoration. It is rebuilt
//! from scratch by [`LayerStore::recomposite`] after every mutation.

use crate::color::{Rgba, SELECTION_COLOR};
use crate::raster::{RasterBuffer, RasterError};
use crate::stickers::{HANDLE_SIZE, HandleKind, StickerCatalog, StickerOverlay, StickerPainter};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform};

/// Selection outline width.
const SELECTION_LINE_WIDTH: f32 = 2.0;
/// Selection outline dash pattern (on, off).
const SELECTION_DASH: [f32; 2] = [5.0, 5.0];

/// Ink and display buffers of identical size.
#[derive(Debug, Clone)]
pub struct LayerStore {
    ink: RasterBuffer,
    display: RasterBuffer,
    background: Rgba,
}

impl LayerStore {
    /// Allocate both layers, with the ink initialized to an opaque background.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self, RasterError> {
        let background = background.with_full_alpha();
        let ink = RasterBuffer::filled(width, height, background)?;
        let display = ink.clone();
        Ok(Self {
            ink,
            display,
            background,
        })
    }

    pub fn width(&self) -> u32 {
        self.ink.width()
    }

    pub fn height(&self) -> u32 {
        self.ink.height()
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn ink(&self) -> &RasterBuffer {
        &self.ink
    }

    pub fn ink_mut(&mut self) -> &mut RasterBuffer {
        &mut self.ink
    }

    pub fn display(&self) -> &RasterBuffer {
        &self.display
    }

    /// Reset the ink to the background color.
    ///
    /// The display is stale until the next recomposite.
    pub fn clear(&mut self) {
        self.ink.fill(self.background);
    }

    /// Rebuild the display from the ink and the sticker overlay.
    ///
    /// Stickers whose type is not in `catalog` are skipped.
    pub fn recomposite(
        &mut self,
        stickers: &StickerOverlay,
        catalog: &StickerCatalog,
        painter: &dyn StickerPainter,
    ) {
        composite(&self.ink, &mut self.display, stickers, catalog, painter, true);
    }

    /// Ink plus stickers without the selection decoration, for export.
    pub fn flatten(
        &self,
        stickers: &StickerOverlay,
        catalog: &StickerCatalog,
        painter: &dyn StickerPainter,
    ) -> RasterBuffer {
        let mut image = self.ink.clone();
        composite(&self.ink, &mut image, stickers, catalog, painter, false);
        image
    }
}

fn composite(
    ink: &RasterBuffer,
    target: &mut RasterBuffer,
    stickers: &StickerOverlay,
    catalog: &StickerCatalog,
    painter: &dyn StickerPainter,
    decorate: bool,
) {
    // Both layers share dimensions by construction.
    if let Err(err) = target.copy_from(ink) {
        log::error!("Recomposite failed: {}", err);
        return;
    }

    let target = target.pixmap_mut();
    for sticker in stickers.elements() {
        let Some(entry) = catalog.lookup(&sticker.sticker_type_id) else {
            log::warn!("Skipping unknown sticker type '{}'", sticker.sticker_type_id);
            continue;
        };

        let transform = sticker_transform(sticker.x, sticker.y, sticker.rotation_degrees);
        let size = sticker.size as f32;
        painter.paint(target, entry, size, transform);

        if decorate && stickers.is_selected(sticker.id) {
            draw_selection(target, size, transform);
        }
    }
}

/// Translate to the sticker center, then rotate about it.
fn sticker_transform(x: f64, y: f64, rotation_degrees: f64) -> Transform {
    let radians = rotation_degrees.to_radians() as f32;
    let (sin, cos) = radians.sin_cos();
    Transform::from_translate(x as f32, y as f32)
        .pre_concat(Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0))
}

/// Dashed outline and corner handles, drawn in the sticker's rotated frame.
fn draw_selection(target: &mut Pixmap, size: f32, transform: Transform) {
    let half = size / 2.0;
    let mut paint = Paint {
        anti_alias: true,
        ..Default::default()
    };
    paint.set_color(SELECTION_COLOR.to_skia());

    if let Some(outline) = Rect::from_xywh(-half, -half, size, size).map(PathBuilder::from_rect) {
        let stroke = Stroke {
            width: SELECTION_LINE_WIDTH,
            dash: StrokeDash::new(SELECTION_DASH.to_vec(), 0.0),
            ..Default::default()
        };
        target.stroke_path(&outline, &paint, &stroke, transform, None);
    }

    let handle = HANDLE_SIZE as f32;
    for kind in HandleKind::ALL {
        let (sx, sy) = kind.sign();
        let cx = sx as f32 * half;
        let cy = sy as f32 * half;
        if let Some(rect) = Rect::from_xywh(cx - handle / 2.0, cy - handle / 2.0, handle, handle) {
            target.fill_rect(rect, &paint, transform, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stickers::BadgePainter;
    use kurbo::Point;

    fn store() -> LayerStore {
        LayerStore::new(200, 200, Rgba::WHITE).unwrap()
    }

    #[test]
    fn test_new_layers_are_background() {
        let layers = store();
        assert_eq!(layers.ink().count_pixels(Rgba::WHITE), 200 * 200);
        assert_eq!(layers.display(), layers.ink());
        assert!(LayerStore::new(0, 600, Rgba::WHITE).is_err());
    }

    #[test]
    fn test_recomposite_copies_ink() {
        let mut layers = store();
        layers.ink_mut().set_opaque_pixel(3, 4, Rgba::BLACK);
        assert_eq!(layers.display().pixel(3, 4), Some(Rgba::WHITE));

        layers.recomposite(&StickerOverlay::new(), &StickerCatalog::default(), &BadgePainter);
        assert_eq!(layers.display().pixel(3, 4), Some(Rgba::BLACK));
    }

    #[test]
    fn test_stickers_never_touch_ink() {
        let mut layers = store();
        let mut overlay = StickerOverlay::new();
        overlay.place("star", Point::new(100.0, 100.0));
        layers.recomposite(&overlay, &StickerCatalog::default(), &BadgePainter);

        let star = StickerCatalog::default().lookup("star").unwrap().tint;
        assert_eq!(layers.display().pixel(100, 100), Some(star));
        assert_eq!(layers.ink().pixel(100, 100), Some(Rgba::WHITE));
    }

    #[test]
    fn test_later_sticker_drawn_on_top() {
        let mut layers = store();
        let mut overlay = StickerOverlay::new();
        let catalog = StickerCatalog::default();
        overlay.place("rainbow", Point::new(100.0, 100.0));
        overlay.place("rocket", Point::new(100.0, 100.0));
        layers.recomposite(&overlay, &catalog, &BadgePainter);

        let rocket = catalog.lookup("rocket").unwrap().tint;
        assert_eq!(layers.display().pixel(100, 100), Some(rocket));
    }

    #[test]
    fn test_selection_handles_drawn() {
        let mut layers = store();
        let mut overlay = StickerOverlay::new();
        let id = overlay.place("star", Point::new(100.0, 100.0)).id;
        let catalog = StickerCatalog::default();

        layers.recomposite(&overlay, &catalog, &BadgePainter);
        assert_eq!(layers.display().pixel(121, 121), Some(Rgba::WHITE));

        overlay.select(id);
        layers.recomposite(&overlay, &catalog, &BadgePainter);
        assert_eq!(layers.display().pixel(121, 121), Some(SELECTION_COLOR));
        assert_eq!(layers.display().pixel(78, 78), Some(SELECTION_COLOR));
    }

    #[test]
    fn test_flatten_omits_selection() {
        let mut layers = store();
        let mut overlay = StickerOverlay::new();
        let id = overlay.place("star", Point::new(100.0, 100.0)).id;
        overlay.select(id);
        let catalog = StickerCatalog::default();
        layers.recomposite(&overlay, &catalog, &BadgePainter);

        let image = layers.flatten(&overlay, &catalog, &BadgePainter);
        assert_eq!(image.pixel(121, 121), Some(Rgba::WHITE));
        assert_eq!(image.pixel(100, 100), layers.display().pixel(100, 100));
    }

    #[test]
    fn test_unknown_sticker_type_skipped() {
        let mut layers = store();
        let mut overlay = StickerOverlay::new();
        overlay.place("dragon", Point::new(100.0, 100.0));
        layers.recomposite(&overlay, &StickerCatalog::default(), &BadgePainter);
        assert_eq!(layers.display(), layers.ink());
    }

    #[test]
    fn test_clear_resets_ink() {
        let mut layers = store();
        layers.ink_mut().fill(Rgba::BLACK);
        layers.clear();
        assert_eq!(layers.ink().count_pixels(Rgba::WHITE), 200 * 200);
    }
}
