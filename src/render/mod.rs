//! Output backends
//!
//! Turn glyph boxes plus encoded atlas pages into something a host can show.

pub mod html;

pub use html::{render_document, render_run, TextRun};
