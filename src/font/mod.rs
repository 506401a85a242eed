//! Bitmap font engine
//!
//! Handles:
//! - Descriptor parsing (info/common/page/char lines)
//! - Glyph metrics registry
//! - Atlas page loading, recoloring and encoding
//! - Glyph placement boxes

pub mod bitmap_font;
pub mod descriptor;
pub mod glyph;
pub mod layout;
pub mod pages;
pub mod raster;

pub use bitmap_font::BitmapFont;
pub use descriptor::{parse, AtlasPageRef, Command, FontDefinition, FontDescriptor};
pub use glyph::{Glyph, GlyphRegistry};
pub use layout::{layout, GlyphBox};
pub use pages::AtlasPageSet;
pub use raster::RasterBuffer;
