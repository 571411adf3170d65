//! Color model: 8-bit RGBA colors, hex parsing and the child palette.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
///
/// Pixels read back from a raster buffer are reported exactly as stored, so
/// two `Rgba` values compare equal only when every channel matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color from its RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with full opacity.
    pub fn with_full_alpha(self) -> Self {
        Self { a: 255, ..self }
    }

    /// Format as `#rrggbb` (alpha is dropped).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl From<tiny_skia::PremultipliedColorU8> for Rgba {
    fn from(pixel: tiny_skia::PremultipliedColorU8) -> Self {
        Self::new(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha())
    }
}

/// Parse a `#rrggbb` hex color (the `#` is optional, digits are case-insensitive).
///
/// Returns `None` for any other shape, including 3- and 8-digit forms.
/// The parsed color is always fully opaque.
pub fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgba::opaque(channel(0)?, channel(2)?, channel(4)?))
}

/// Exact per-channel equality, alpha included.
pub fn colors_equal(a: Rgba, b: Rgba) -> bool {
    a == b
}

/// A named palette swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub name: &'static str,
    pub hex: &'static str,
}

/// The palette offered to children, in toolbar order.
pub const PALETTE: [Swatch; 12] = [
    Swatch { name: "Red", hex: "#ef4444" },
    Swatch { name: "Orange", hex: "#f97316" },
    Swatch { name: "Yellow", hex: "#eab308" },
    Swatch { name: "Green", hex: "#22c55e" },
    Swatch { name: "Blue", hex: "#3b82f6" },
    Swatch { name: "Indigo", hex: "#6366f1" },
    Swatch { name: "Purple", hex: "#a855f7" },
    Swatch { name: "Pink", hex: "#ec4899" },
    Swatch { name: "Black", hex: "#1f2937" },
    Swatch { name: "Gray", hex: "#6b7280" },
    Swatch { name: "Light Gray", hex: "#d1d5db" },
    Swatch { name: "White", hex: "#ffffff" },
];

/// Default brush color (palette red).
pub const DEFAULT_BRUSH_HEX: &str = "#ef4444";

/// Selection outline and handle color.
pub const SELECTION_COLOR: Rgba = Rgba::opaque(0x38, 0xbd, 0xf8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ef4444"), Some(Rgba::opaque(239, 68, 68)));
        assert_eq!(parse_hex_color("#FFFFFF"), Some(Rgba::WHITE));
        assert_eq!(parse_hex_color("3b82f6"), Some(Rgba::opaque(59, 130, 246)));
    }

    #[test]
    fn test_parse_hex_color_rejects_other_shapes() {
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#ff000080"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("red"), None);
    }

    #[test]
    fn test_colors_equal_includes_alpha() {
        assert!(colors_equal(Rgba::WHITE, Rgba::opaque(255, 255, 255)));
        assert!(!colors_equal(Rgba::new(0, 0, 0, 0), Rgba::BLACK));
    }

    #[test]
    fn test_palette_parses() {
        for swatch in PALETTE {
            assert!(parse_hex_color(swatch.hex).is_some(), "{}", swatch.name);
        }
        assert_eq!(
            parse_hex_color(DEFAULT_BRUSH_HEX),
            parse_hex_color(PALETTE[0].hex)
        );
    }

    #[test]
    fn test_peniko_round_trip() {
        let color = Rgba::opaque(12, 34, 56);
        let peniko: Color = color.into();
        assert_eq!(Rgba::from(peniko), color);
        assert_eq!(color.to_hex(), "#0c2238");
    }
}
