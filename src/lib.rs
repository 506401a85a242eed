//! pixfont - bitmap font engine
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │   descriptor (.fnt)  →  FontDefinition   │
//! │                            ↓             │
//! │   Loader  →  AtlasPageSet (parallel)     │
//! │                            ↓             │
//! │   BitmapFont: glyphs + pages + color     │
//! │                            ↓             │
//! │   layout() → GlyphBox  +  encoded pages  │
//! │                            ↓             │
//! │   host (HTML renderer, ...)              │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pixfont::{BitmapFont, FsLoader};
//! use std::sync::Arc;
//!
//! # async fn run() -> pixfont::Result<()> {
//! let mut font = BitmapFont::open("fonts/pixel.fnt", Arc::new(FsLoader::new()));
//! font.ready().await?;
//! font.set_color([255, 0, 0])?;
//! let glyph_box = font.layout('A' as u32, 2.0)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod loader;
pub mod render;
pub mod utils;

pub use error::{FontError, Result};
pub use font::{layout, BitmapFont, Glyph, GlyphBox, RasterBuffer};
pub use loader::{FsLoader, Loader};
pub use utils::Rgba;
