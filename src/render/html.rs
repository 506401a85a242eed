//! HTML output
//!
//! Turns glyph boxes and encoded pages into inline elements. Each run of
//! text becomes a wrapper `<span>` that carries the run's page images as CSS
//! custom properties, with one inline-block `<span>` per glyph that windows
//! into its page.
//!
//! A font has a single color at a time, so runs are rendered one after the
//! other: each run recolors the font and encodes its pages before the next
//! run starts.

use log::{debug, trace};
use std::collections::BTreeSet;

use crate::error::Result;
use crate::font::BitmapFont;
use crate::utils::Rgba;

/// A piece of text drawn with one color and scale
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub color: Rgba,
    pub scale: f32,
}

impl<'a> TextRun<'a> {
    pub fn new(text: &'a str, color: impl Into<Rgba>, scale: f32) -> Self {
        Self {
            text,
            color: color.into(),
            scale,
        }
    }
}

/// Render one run as an HTML fragment.
///
/// Characters without a glyph are skipped; `\n` becomes `<br>`.
pub fn render_run(font: &mut BitmapFont, run: &TextRun<'_>) -> Result<String> {
    font.set_color(run.color)?;

    // Pages this run actually uses
    let page_ids: BTreeSet<u32> = run
        .text
        .chars()
        .filter_map(|c| font.get_glyph(c as u32))
        .map(|g| g.page_id)
        .collect();

    let line_height = font.descriptor()?.line_height * run.scale;

    let mut out = String::new();
    out.push_str(&format!(
        "<span class=\"pixfont\" role=\"img\" aria-label=\"{}\" style=\"display:inline-block;white-space:nowrap;line-height:0;min-height:{}px;",
        escape_html(run.text),
        px(line_height)
    ));
    for id in &page_ids {
        if let Some(uri) = font.encoded_page(*id)? {
            out.push_str(&format!("--pf-page-{}:url({});", id, uri));
        }
    }
    out.push_str("\">");

    let mut skipped = 0usize;
    for c in run.text.chars() {
        if c == '\n' {
            out.push_str("<br>");
            continue;
        }
        let code = c as u32;
        let glyph = match font.get_glyph(code) {
            Some(g) => *g,
            None => {
                trace!("No glyph for {:?} (U+{:04X}), skipping", c, code);
                skipped += 1;
                continue;
            }
        };
        let b = font.layout(code, run.scale)?;
        out.push_str(&format!(
            "<span style=\"display:inline-block;vertical-align:top;\
width:{}px;height:{}px;margin-right:{}px;margin-top:{}px;transform:translateX({}px);\
background-image:var(--pf-page-{});background-size:{}px {}px;background-position:{}px {}px;\
background-repeat:no-repeat;image-rendering:pixelated;\"></span>",
            px(b.width),
            px(b.height),
            px(b.margin_right),
            px(b.margin_top),
            px(b.translate_x),
            glyph.page_id,
            px(b.background_source_width),
            px(b.background_source_height),
            px(b.background_position_x),
            px(b.background_position_y),
        ));
    }
    out.push_str("</span>");

    if skipped > 0 {
        debug!("Skipped {} unsupported character(s)", skipped);
    }
    Ok(out)
}

/// Render runs into a complete HTML document
pub fn render_document(font: &mut BitmapFont, runs: &[TextRun<'_>]) -> Result<String> {
    let mut body = String::new();
    for run in runs {
        body.push_str(&render_run(font, run)?);
        body.push('\n');
    }
    let title = font.descriptor()?.face.clone();
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(&title),
        body
    ))
}

/// Format a pixel value, without a `-0`
fn px(v: f32) -> f32 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{AtlasPageSet, FontDefinition, RasterBuffer};
    use std::path::Path;

    const DESCRIPTOR: &str = "\
info face=\"Tiny\" padding=0,0,0,0 spacing=1,1
common lineHeight=10
page id=0 file=\"tiny_0.png\"
char id=65 x=0 y=0 width=8 height=10 xoffset=0 yoffset=1 xadvance=9 page=0
char id=66 x=8 y=0 width=8 height=10 xoffset=1 yoffset=0 xadvance=9 page=0
";

    fn font() -> BitmapFont {
        let def = FontDefinition::parse(DESCRIPTOR, Path::new("tiny.fnt")).unwrap();
        let page = RasterBuffer::from_rgba(16, 10, vec![255; 16 * 10 * 4]).unwrap();
        BitmapFont::from_parts(def, AtlasPageSet::from_pages([(0, page)])).unwrap()
    }

    #[test]
    fn test_render_run_structure() {
        let mut font = font();
        let html = render_run(&mut font, &TextRun::new("AB?", [255, 0, 0], 2.0)).unwrap();

        assert!(html.starts_with("<span class=\"pixfont\""));
        assert!(html.contains("aria-label=\"AB?\""));
        assert!(html.contains("--pf-page-0:url(data:image/png;base64,"));
        // '?' has no glyph: two glyph spans only
        assert_eq!(html.matches("background-image:var(--pf-page-0)").count(), 2);
        assert!(html.contains("width:16px;height:20px;margin-right:2px;margin-top:2px;"));
        assert!(html.contains("background-position:-16px 0px;"));
        assert_eq!(font.color(), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_runs_recolor_in_sequence() {
        let mut font = font();
        let red = render_run(&mut font, &TextRun::new("A", [255, 0, 0], 1.0)).unwrap();
        let blue = render_run(&mut font, &TextRun::new("A", [0, 0, 255], 1.0)).unwrap();
        assert_ne!(red, blue);
        assert_eq!(font.color(), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_document_escapes_text() {
        let mut font = font();
        let doc = render_document(&mut font, &[TextRun::new("<A&B>", Rgba::WHITE, 1.0)]).unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Tiny</title>"));
        assert!(doc.contains("aria-label=\"&lt;A&amp;B&gt;\""));
    }

    #[test]
    fn test_newline_becomes_break() {
        let mut font = font();
        let html = render_run(&mut font, &TextRun::new("A\nB", Rgba::WHITE, 1.0)).unwrap();
        assert_eq!(html.matches("<br>").count(), 1);
    }
}
