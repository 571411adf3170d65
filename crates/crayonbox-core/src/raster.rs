//! Fixed-size RGBA raster buffers and exact snapshots of them.

use crate::color::Rgba;
use thiserror::Error;
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Largest accepted raster dimension.
pub const MAX_DIMENSION: u32 = 8192;

/// Raster errors.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Snapshot is {got_width}x{got_height}, buffer is {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
}

/// A width × height grid of RGBA pixels.
///
/// Pixels are stored premultiplied (as the rasterizer produces them); opaque
/// pixels read back exactly as written.
#[derive(Clone)]
pub struct RasterBuffer {
    pixmap: Pixmap,
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for RasterBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.data() == other.data()
    }
}

impl RasterBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(RasterError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    /// Allocate a buffer filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Result<Self, RasterError> {
        let mut buffer = Self::new(width, height)?;
        buffer.fill(color);
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Whether `(x, y)` lies inside `[0, width) × [0, height)`.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        self.contains(x, y)
            .then(|| y as usize * self.width() as usize + x as usize)
    }

    /// Read a pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba> {
        let idx = self.index(x, y)?;
        Some(Rgba::from(self.pixmap.pixels()[idx]))
    }

    /// Write an opaque pixel. Out-of-bounds writes are ignored.
    pub fn set_opaque_pixel(&mut self, x: i64, y: i64, color: Rgba) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        match PremultipliedColorU8::from_rgba(color.r, color.g, color.b, 255) {
            Some(pixel) => {
                self.pixmap.pixels_mut()[idx] = pixel;
                true
            }
            None => false,
        }
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, color: Rgba) {
        self.pixmap.fill(color.to_skia());
    }

    /// Replace the contents with another buffer of the same size.
    pub fn copy_from(&mut self, other: &RasterBuffer) -> Result<(), RasterError> {
        self.check_size(other.width(), other.height())?;
        self.pixmap.data_mut().copy_from_slice(other.pixmap.data());
        Ok(())
    }

    /// Take an exact copy of the pixels.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data().to_vec(),
        }
    }

    /// Restore pixels from a snapshot of a same-sized buffer.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), RasterError> {
        self.check_size(snapshot.width, snapshot.height)?;
        self.pixmap.data_mut().copy_from_slice(&snapshot.data);
        Ok(())
    }

    /// Raw premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Count pixels equal to `color`.
    pub fn count_pixels(&self, color: Rgba) -> usize {
        self.pixmap
            .pixels()
            .iter()
            .filter(|&&p| Rgba::from(p) == color)
            .count()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    fn check_size(&self, width: u32, height: u32) -> Result<(), RasterError> {
        if width != self.width() || height != self.height() {
            return Err(RasterError::SizeMismatch {
                width: self.width(),
                height: self.height(),
                got_width: width,
                got_height: height,
            });
        }
        Ok(())
    }
}

/// An opaque, exact copy of a buffer's pixels, used for undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the snapshot payload in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            RasterBuffer::new(0, 10),
            Err(RasterError::InvalidDimensions { .. })
        ));
        assert!(RasterBuffer::new(MAX_DIMENSION + 1, 1).is_err());
    }

    #[test]
    fn test_new_is_transparent() {
        let buffer = RasterBuffer::new(4, 3).unwrap();
        assert_eq!(buffer.pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(buffer.count_pixels(Rgba::TRANSPARENT), 12);
    }

    #[test]
    fn test_pixel_bounds() {
        let mut buffer = RasterBuffer::filled(4, 3, Rgba::WHITE).unwrap();
        assert_eq!(buffer.pixel(3, 2), Some(Rgba::WHITE));
        assert_eq!(buffer.pixel(4, 0), None);
        assert_eq!(buffer.pixel(0, -1), None);
        assert!(!buffer.set_opaque_pixel(-1, 0, Rgba::BLACK));
        assert!(buffer.set_opaque_pixel(1, 1, Rgba::new(10, 20, 30, 7)));
        assert_eq!(buffer.pixel(1, 1), Some(Rgba::opaque(10, 20, 30)));
    }

    #[test]
    fn test_snapshot_restore_exact() {
        let mut buffer = RasterBuffer::filled(8, 8, Rgba::WHITE).unwrap();
        buffer.set_opaque_pixel(2, 2, Rgba::BLACK);
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.byte_len(), 8 * 8 * 4);

        buffer.fill(Rgba::opaque(1, 2, 3));
        buffer.restore(&snapshot).unwrap();
        assert_eq!(buffer.snapshot(), snapshot);
        assert_eq!(buffer.pixel(2, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn test_restore_size_mismatch() {
        let small = RasterBuffer::new(2, 2).unwrap();
        let mut big = RasterBuffer::new(3, 3).unwrap();
        assert!(matches!(
            big.restore(&small.snapshot()),
            Err(RasterError::SizeMismatch { .. })
        ));
        assert!(big.copy_from(&small).is_err());
    }
}
