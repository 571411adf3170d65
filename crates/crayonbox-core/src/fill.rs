//! Paint-bucket flood fill over the ink layer.

use crate::color::{Rgba, colors_equal};
use crate::raster::RasterBuffer;

/// Result of a flood fill request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// The seed lies outside the buffer; nothing was read or written.
    OutOfBounds,
    /// The seed pixel already has the fill color; the buffer is untouched.
    AlreadyFilled,
    /// The connected region was repainted.
    Filled { pixels: usize },
}

impl FillOutcome {
    /// Whether any pixel was written.
    pub fn changed(&self) -> bool {
        matches!(self, FillOutcome::Filled { pixels } if *pixels > 0)
    }
}

/// Replace the 4-connected region of pixels matching the seed's color with `fill`.
///
/// The seed must already be floored to integer pixel coordinates. The target
/// color is captured once from the seed, so repainted pixels never feed back
/// into the match. `fill` is always written fully opaque.
pub fn flood_fill(ink: &mut RasterBuffer, seed_x: i64, seed_y: i64, fill: Rgba) -> FillOutcome {
    let Some(target) = ink.pixel(seed_x, seed_y) else {
        return FillOutcome::OutOfBounds;
    };
    let fill = fill.with_full_alpha();
    if colors_equal(target, fill) {
        return FillOutcome::AlreadyFilled;
    }

    let width = ink.width() as usize;
    let mut visited = vec![false; width * ink.height() as usize];
    let mut stack = vec![(seed_x, seed_y)];
    let mut pixels = 0;

    while let Some((x, y)) = stack.pop() {
        if !ink.contains(x, y) {
            continue;
        }
        let idx = y as usize * width + x as usize;
        if visited[idx] {
            continue;
        }
        match ink.pixel(x, y) {
            Some(current) if colors_equal(current, target) => {}
            _ => continue,
        }

        visited[idx] = true;
        ink.set_opaque_pixel(x, y, fill);
        pixels += 1;

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    log::debug!("Flood fill at ({}, {}) repainted {} pixels", seed_x, seed_y, pixels);
    FillOutcome::Filled { pixels }
}
