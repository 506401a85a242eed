//! Utility functions shared across pixfont
//!
//! Common helpers that don't fit in specialized modules.

pub mod color;
pub mod unescape;

pub use color::{parse_hex_color, Rgba};
pub use unescape::{unescape_literal, UnescapeError};
