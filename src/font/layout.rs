//! Glyph placement
//!
//! A glyph is shown as a window into its atlas page: a box of the glyph's
//! size whose background is the whole page, scaled and shifted so that the
//! glyph region lines up with the box.

use super::glyph::Glyph;

/// Placement box for one glyph, all values in output pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub width: f32,
    pub height: f32,
    /// Advance minus width; negative when glyphs overlap
    pub margin_right: f32,
    pub margin_top: f32,
    pub translate_x: f32,
    /// Scaled page width
    pub background_source_width: f32,
    /// Scaled page height
    pub background_source_height: f32,
    pub background_position_x: f32,
    pub background_position_y: f32,
}

/// Compute the placement box of `glyph` on a `page_width` x `page_height`
/// page at `scale`.
///
/// # Example
/// ```
/// use pixfont::font::{layout, Glyph};
///
/// let glyph = Glyph {
///     id: 65, x: 0.0, y: 0.0, width: 8.0, height: 10.0,
///     x_offset: 0.0, y_offset: 1.0, x_advance: 9.0, page_id: 0,
/// };
/// let b = layout(&glyph, 64, 32, 2.0);
/// assert_eq!((b.width, b.height, b.margin_right), (16.0, 20.0, 2.0));
/// ```
pub fn layout(glyph: &Glyph, page_width: u32, page_height: u32, scale: f32) -> GlyphBox {
    GlyphBox {
        width: glyph.width * scale,
        height: glyph.height * scale,
        margin_right: (glyph.x_advance - glyph.width) * scale,
        margin_top: glyph.y_offset * scale,
        translate_x: glyph.x_offset * scale,
        background_source_width: page_width as f32 * scale,
        background_source_height: page_height as f32 * scale,
        background_position_x: -glyph.x * scale,
        background_position_y: -glyph.y * scale,
    }
}
