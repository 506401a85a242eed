//! Global constants for pixfont
//!
//! Consolidates limits and format constants to eliminate magic numbers
//! throughout the codebase.

// ============================================================================
// Raster Limits
// ============================================================================

/// Maximum atlas page dimension (16384 pixels)
pub const MAX_PAGE_DIMENSION: u32 = 16384;

/// Bytes per RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

// ============================================================================
// Encoding
// ============================================================================

/// Prefix of an encoded atlas page
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

// ============================================================================
// Descriptor Keywords
// ============================================================================

/// Font-wide information line
pub const CMD_INFO: &str = "info";

/// Line metrics shared by all glyphs
pub const CMD_COMMON: &str = "common";

/// Atlas page declaration
pub const CMD_PAGE: &str = "page";

/// Per-character glyph metrics
pub const CMD_CHAR: &str = "char";

// ============================================================================
// CLI Defaults
// ============================================================================

/// Default glyph scale factor
pub const DEFAULT_SCALE: f32 = 1.0;

/// Minimum accepted scale factor
pub const MIN_SCALE: f32 = 0.125;

/// Maximum accepted scale factor
pub const MAX_SCALE: f32 = 64.0;
