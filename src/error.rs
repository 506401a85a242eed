//! Error types for the font engine
//!
//! Every failure the engine can report is a variant of [`FontError`].
//! The type is `Clone` so that a font whose loading failed can report
//! the same error on every later `ready()` call.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = FontError> = std::result::Result<T, E>;

/// Font engine error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FontError {
    /// Bytes are not a decodable image (or the pixel data is inconsistent)
    #[error("image decode error: {0}")]
    Decode(String),

    /// Descriptor or page bytes could not be fetched
    #[error("failed to fetch {}: {reason}", .path.display())]
    Fetch { path: PathBuf, reason: String },

    /// A required key is missing or has an unusable value
    #[error("malformed descriptor (line {line}): `{command}` key `{key}`: {reason}")]
    MalformedDescriptor {
        command: String,
        key: String,
        line: usize,
        reason: String,
    },

    /// Descriptor bytes are not valid UTF-8
    #[error("descriptor is not valid UTF-8: {}", .path.display())]
    InvalidText { path: PathBuf },

    /// Operation attempted before the font finished loading
    #[error("font is not ready")]
    NotReady,

    /// Character code has no glyph in this font
    #[error("unsupported glyph: U+{0:04X}")]
    UnsupportedGlyph(u32),

    /// Pixels could not be encoded as PNG
    #[error("image encode error: {0}")]
    Encode(String),

    /// The loading task was cancelled or panicked
    #[error("font loading aborted: {0}")]
    Aborted(String),
}

impl FontError {
    pub(crate) fn malformed(
        command: &str,
        key: &str,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedDescriptor {
            command: command.to_string(),
            key: key.to_string(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn fetch(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Fetch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
