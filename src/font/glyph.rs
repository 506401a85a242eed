//! Glyph metrics and the character code registry

use std::collections::HashMap;

/// Metrics for one character: where its pixels live in the atlas page and
/// how it is placed relative to the layout cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Character code
    pub id: u32,
    /// Left edge of the glyph region within its page (pixels)
    pub x: f32,
    /// Top edge of the glyph region within its page (pixels)
    pub y: f32,
    /// Region width (pixels, >= 0)
    pub width: f32,
    /// Region height (pixels, >= 0)
    pub height: f32,
    /// Horizontal placement offset
    pub x_offset: f32,
    /// Vertical placement offset from the line top
    pub y_offset: f32,
    /// Horizontal cursor advance
    pub x_advance: f32,
    /// Atlas page holding the pixels
    pub page_id: u32,
}

/// Character code -> glyph map
#[derive(Debug, Clone, Default)]
pub struct GlyphRegistry {
    glyphs: HashMap<u32, Glyph>,
}

impl GlyphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a glyph, replacing any earlier glyph with the same code.
    /// Returns the replaced glyph.
    pub fn insert(&mut self, glyph: Glyph) -> Option<Glyph> {
        self.glyphs.insert(glyph.id, glyph)
    }

    pub fn get(&self, code: u32) -> Option<&Glyph> {
        self.glyphs.get(&code)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.glyphs.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }
}
