//! Color type and parsing utilities
//!
//! Consolidates hex color parsing used by the config file and the CLI.

use std::fmt;

/// 8-bit RGBA color
///
/// Equality is by value across all four channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Opaque white (default display color of a font)
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Opaque black
    pub const BLACK: Self = Self([0, 0, 0, 255]);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }

    pub fn a(self) -> u8 {
        self.0[3]
    }

    /// Parse a hex color string, see [`parse_hex_color`]
    pub fn from_hex(hex: &str) -> Option<Self> {
        parse_hex_color(hex)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Three components: alpha defaults to 255
impl From<[u8; 3]> for Rgba {
    fn from(color: [u8; 3]) -> Self {
        Self([color[0], color[1], color[2], u8::MAX])
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(color: [u8; 4]) -> Self {
        Self(color)
    }
}

impl From<(u8, u8, u8)> for Rgba {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self([r, g, b, u8::MAX])
    }
}

impl fmt::Display for Rgba {
    /// Formats as `#RRGGBB`, or `#RRGGBBAA` when not opaque
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == u8::MAX {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

/// Parse hex color (e.g., "ff0000" -> opaque red)
///
/// Supported formats, with or without a leading `#`:
/// - RRGGBB
/// - RGB (short format, F -> FF)
/// - RRGGBBAA
///
/// Returns None on invalid input.
pub fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        6 => Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, u8::MAX])),
        8 => Some(Rgba([
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        ])),
        3 => {
            // Short format: expand F -> FF
            Some(Rgba([
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                u8::MAX,
            ]))
        }
        _ => None,
    }
}
