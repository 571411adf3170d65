//! Encoding the display layer: full-size PNG, JPEG thumbnail, data URLs.

use crate::color::Rgba;
use crate::raster::RasterBuffer;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

pub const PNG_MIME: &str = "image/png";
pub const JPEG_MIME: &str = "image/jpeg";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },
    #[error("Thumbnail size must be non-zero")]
    EmptyThumbnail,
    #[error("Malformed data URL")]
    DataUrl,
}

/// Thumbnail output parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    pub width: u32,
    pub height: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            quality: 70,
        }
    }
}

/// Straight (non-premultiplied) RGBA bytes of a buffer.
pub fn to_straight_rgba(buffer: &RasterBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(buffer.data().len());
    for pixel in buffer.pixmap().pixels() {
        let c = pixel.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// RGB bytes of a buffer flattened over an opaque background.
fn flatten_rgb(buffer: &RasterBuffer, background: Rgba) -> Vec<u8> {
    let mut out = Vec::with_capacity(buffer.data().len() / 4 * 3);
    for pixel in buffer.pixmap().pixels() {
        let inv = 255 - pixel.alpha() as u16;
        let over = |p: u8, bg: u8| (p as u16 + (bg as u16 * inv + 127) / 255).min(255) as u8;
        out.extend_from_slice(&[
            over(pixel.red(), background.r),
            over(pixel.green(), background.g),
            over(pixel.blue(), background.b),
        ]);
    }
    out
}

/// Encode a buffer as an 8-bit RGBA PNG.
pub fn encode_png(buffer: &RasterBuffer) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (buffer.width(), buffer.height());
    let rgba = to_straight_rgba(buffer);

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
    }
    log::debug!("Encoded {}x{} PNG: {} bytes", width, height, png_data.len());
    Ok(png_data)
}

/// Downscale a buffer to a JPEG thumbnail, flattened over `background`.
pub fn encode_thumbnail(
    buffer: &RasterBuffer,
    spec: ThumbnailSpec,
    background: Rgba,
) -> Result<Vec<u8>, ExportError> {
    if spec.width == 0 || spec.height == 0 {
        return Err(ExportError::EmptyThumbnail);
    }
    let (width, height) = (buffer.width(), buffer.height());
    let rgb = image::RgbImage::from_raw(width, height, flatten_rgb(buffer, background))
        .ok_or(ExportError::BufferSize { width, height })?;
    let scaled = DynamicImage::ImageRgb8(rgb)
        .resize_exact(spec.width, spec.height, FilterType::Triangle)
        .to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, spec.quality.clamp(1, 100)).encode_image(&scaled)?;
    log::debug!(
        "Encoded {}x{} thumbnail: {} bytes",
        spec.width,
        spec.height,
        jpeg.len()
    );
    Ok(jpeg)
}

/// Decode PNG or JPEG bytes into a straight RGBA image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, ExportError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and decoded bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), ExportError> {
    let rest = url.strip_prefix("data:").ok_or(ExportError::DataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(ExportError::DataUrl)?;
    let mime = header.strip_suffix(";base64").ok_or(ExportError::DataUrl)?;
    let bytes = STANDARD.decode(payload).map_err(|_| ExportError::DataUrl)?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_preserves_pixels() {
        let mut buffer = RasterBuffer::filled(16, 8, Rgba::WHITE).unwrap();
        buffer.set_opaque_pixel(3, 2, Rgba::opaque(239, 68, 68));

        let decoded = decode_image(&encode_png(&buffer).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert_eq!(decoded.get_pixel(3, 2).0, [239, 68, 68, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_thumbnail_dimensions() {
        let buffer = RasterBuffer::filled(800, 600, Rgba::WHITE).unwrap();
        let jpeg = encode_thumbnail(&buffer, ThumbnailSpec::default(), Rgba::WHITE).unwrap();
        assert_eq!(&jpeg[..2], &[0xff, 0xd8]);

        let decoded = decode_image(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (200, 150));
    }

    #[test]
    fn test_thumbnail_flattens_transparency() {
        // Erased pixels are transparent; they must not come out black.
        let buffer = RasterBuffer::new(40, 30).unwrap();
        let jpeg = encode_thumbnail(
            &buffer,
            ThumbnailSpec {
                width: 20,
                height: 15,
                quality: 90,
            },
            Rgba::WHITE,
        )
        .unwrap();
        let pixel = decode_image(&jpeg).unwrap().get_pixel(10, 7).0;
        assert!(pixel[0] > 240 && pixel[1] > 240 && pixel[2] > 240);
    }

    #[test]
    fn test_zero_thumbnail_rejected() {
        let buffer = RasterBuffer::new(4, 4).unwrap();
        let spec = ThumbnailSpec {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            encode_thumbnail(&buffer, spec, Rgba::WHITE),
            Err(ExportError::EmptyThumbnail)
        ));
    }

    #[test]
    fn test_data_url() {
        let url = to_data_url(PNG_MIME, b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, PNG_MIME);
        assert_eq!(bytes, b"abc");
        assert!(parse_data_url("image/png;base64,YWJj").is_err());
        assert!(parse_data_url("data:image/png,YWJj").is_err());
    }
}
