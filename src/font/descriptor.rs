//! Font descriptor parser
//!
//! Parses the text descriptor shipped next to the atlas pages and converts
//! it to font metadata, page references and glyph metrics.
//!
//! ## Format Overview
//!
//! ```text
//! info face="Pixel" size=16 padding=0,0,0,0 spacing=1,1
//! common lineHeight=18 base=14 scaleW=128 scaleH=64 pages=1
//! page id=0 file="pixel_0.png"
//! char id=65 x=0 y=0 width=8 height=10 xoffset=0 yoffset=1 xadvance=9 page=0
//! kerning first=65 second=86 amount=-1
//! ```
//!
//! - One command per line: a keyword followed by `key=value` tokens
//! - Tokens are whitespace separated; quoted values (`"` or `'`) may contain spaces
//! - Only the first `=` splits key from value
//! - Unknown keywords (e.g. `kerning`, `chars`) are kept but ignored

use log::{debug, trace, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::glyph::{Glyph, GlyphRegistry};
use crate::constants::{CMD_CHAR, CMD_COMMON, CMD_INFO, CMD_PAGE};
use crate::error::{FontError, Result};
use crate::utils::unescape_literal;

/// One parsed descriptor line
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// 1-based source line
    pub line: usize,
    /// Leading keyword (`info`, `common`, `page`, `char`, ...)
    pub keyword: String,
    /// `key=value` tokens in source order, values still raw (quotes kept)
    pub attributes: Vec<(String, String)>,
}

impl Command {
    /// Raw value of the first attribute named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn required(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| FontError::malformed(&self.keyword, key, self.line, "missing"))
    }

    /// Finite value that fits in an `f32`
    fn number(&self, key: &str) -> Result<f32> {
        let raw = self.required(key)?;
        self.number_f32(key, raw)
    }

    fn optional_number(&self, key: &str) -> Result<Option<f32>> {
        self.get(key).map(|raw| self.number_f32(key, raw)).transpose()
    }

    fn parse_number(&self, key: &str, raw: &str) -> Result<f64> {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(FontError::malformed(
                &self.keyword,
                key,
                self.line,
                format!("not a finite number: {:?}", raw),
            )),
        }
    }

    /// Metrics are stored as `f32`; values that overflow it are rejected
    fn number_f32(&self, key: &str, raw: &str) -> Result<f32> {
        let v = self.parse_number(key, raw)? as f32;
        if !v.is_finite() {
            return Err(FontError::malformed(
                &self.keyword,
                key,
                self.line,
                format!("number out of range: {:?}", raw),
            ));
        }
        Ok(v)
    }

    /// Non-negative integral value (ids and page references)
    fn integer(&self, key: &str) -> Result<u32> {
        let raw = self.required(key)?;
        let v = self.parse_number(key, raw)?;
        if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
            return Err(FontError::malformed(
                &self.keyword,
                key,
                self.line,
                format!("not a non-negative integer: {}", v),
            ));
        }
        Ok(v as u32)
    }

    /// Non-negative extent (glyph width/height)
    fn extent(&self, key: &str) -> Result<f32> {
        let v = self.number(key)?;
        if v < 0.0 {
            return Err(FontError::malformed(
                &self.keyword,
                key,
                self.line,
                format!("negative extent: {}", v),
            ));
        }
        Ok(v)
    }

    /// Comma-separated list of exactly N numbers
    fn number_list<const N: usize>(&self, key: &str) -> Result<[f32; N]> {
        let raw = self.required(key)?;
        let parts: Vec<&str> = raw.split(',').collect();
        if parts.len() != N {
            return Err(FontError::malformed(
                &self.keyword,
                key,
                self.line,
                format!("expected {} comma-separated numbers, got {:?}", N, raw),
            ));
        }
        let mut out = [0.0f32; N];
        for (slot, part) in out.iter_mut().zip(parts) {
            *slot = self.number_f32(key, part)?;
        }
        Ok(out)
    }

    /// String value with surrounding quotes and escapes resolved
    fn literal(&self, key: &str) -> Result<String> {
        let raw = self.required(key)?;
        unescape_literal(raw)
            .map_err(|e| FontError::malformed(&self.keyword, key, self.line, e.to_string()))
    }
}

/// Parse descriptor text into commands.
///
/// Never fails: blank lines are skipped, unknown keywords are captured.
/// Validation of required keys happens in [`FontDefinition::from_commands`].
pub fn parse(text: &str) -> Vec<Command> {
    let mut commands = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let mut tokens = tokenize(line).into_iter();
        let keyword = match tokens.next() {
            Some(k) => k,
            None => continue,
        };

        let attributes = tokens
            .map(|token| match token.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                // Flag without value
                None => (token, String::new()),
            })
            .collect();

        commands.push(Command {
            line: idx + 1,
            keyword,
            attributes,
        });
    }

    trace!("Parsed {} descriptor commands", commands.len());
    commands
}

/// Split a line on whitespace outside quotes (`"` or `'`).
/// Quotes and backslashes are kept verbatim in the tokens.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Opening quote of the value being read
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
        } else if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            if c == '"' || c == '\'' {
                quote = Some(c);
            }
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Font-wide metadata
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Typeface name
    pub face: String,
    /// Line height in pixels (> 0)
    pub line_height: f32,
    /// Padding: top, right, bottom, left
    pub padding: [f32; 4],
    /// Spacing: x, y
    pub spacing: [f32; 2],
    /// Rendered size from `info size=` (if present)
    pub size: Option<f32>,
    /// Baseline distance from the line top (if present)
    pub base: Option<f32>,
    /// Declared page width (if present)
    pub scale_w: Option<f32>,
    /// Declared page height (if present)
    pub scale_h: Option<f32>,
}

/// Reference to one atlas page image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasPageRef {
    pub id: u32,
    /// Page path resolved against the descriptor's directory
    pub source_path: PathBuf,
}

/// Everything a descriptor declares, validated
#[derive(Debug, Clone)]
pub struct FontDefinition {
    pub descriptor: FontDescriptor,
    pub pages: Vec<AtlasPageRef>,
    pub glyphs: GlyphRegistry,
}

impl FontDefinition {
    /// Parse descriptor text located at `descriptor_path`
    pub fn parse(text: &str, descriptor_path: &Path) -> Result<Self> {
        let base_dir = descriptor_path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_commands(&parse(text), base_dir)
    }

    /// Build the definition from parsed commands.
    ///
    /// Page paths are resolved against `base_dir`.
    pub fn from_commands(commands: &[Command], base_dir: &Path) -> Result<Self> {
        let mut info: Option<(String, [f32; 4], [f32; 2], Option<f32>)> = None;
        let mut common: Option<(f32, Option<f32>, Option<f32>, Option<f32>)> = None;
        let mut pages: Vec<AtlasPageRef> = Vec::new();
        let mut page_ids = HashSet::new();
        let mut glyphs = GlyphRegistry::new();
        // Line of each char command, for page validation errors
        let mut glyph_lines = Vec::new();

        for cmd in commands {
            match cmd.keyword.as_str() {
                CMD_INFO => {
                    let face = cmd.literal("face")?;
                    let padding = cmd.number_list::<4>("padding")?;
                    let spacing = cmd.number_list::<2>("spacing")?;
                    let size = cmd.optional_number("size")?;
                    info = Some((face, padding, spacing, size));
                }
                CMD_COMMON => {
                    let line_height = cmd.number("lineHeight")?;
                    if line_height <= 0.0 {
                        return Err(FontError::malformed(
                            CMD_COMMON,
                            "lineHeight",
                            cmd.line,
                            format!("must be positive, got {}", line_height),
                        ));
                    }
                    let base = cmd.optional_number("base")?;
                    let scale_w = cmd.optional_number("scaleW")?;
                    let scale_h = cmd.optional_number("scaleH")?;
                    common = Some((line_height, base, scale_w, scale_h));
                }
                CMD_PAGE => {
                    let id = cmd.integer("id")?;
                    let file = cmd.literal("file")?;
                    if !page_ids.insert(id) {
                        return Err(FontError::malformed(
                            CMD_PAGE,
                            "id",
                            cmd.line,
                            format!("duplicate page id {}", id),
                        ));
                    }
                    let source_path = base_dir.join(&file);
                    debug!("Page {}: {}", id, source_path.display());
                    pages.push(AtlasPageRef { id, source_path });
                }
                CMD_CHAR => {
                    let glyph = Glyph {
                        id: cmd.integer("id")?,
                        x: cmd.number("x")?,
                        y: cmd.number("y")?,
                        width: cmd.extent("width")?,
                        height: cmd.extent("height")?,
                        x_offset: cmd.number("xoffset")?,
                        y_offset: cmd.number("yoffset")?,
                        x_advance: cmd.number("xadvance")?,
                        page_id: cmd.integer("page")?,
                    };
                    if glyphs.insert(glyph).is_some() {
                        trace!("Glyph {} redefined on line {}", glyph.id, cmd.line);
                    }
                    glyph_lines.push((glyph.id, cmd.line));
                }
                other => trace!("Ignoring descriptor command '{}' (line {})", other, cmd.line),
            }
        }

        let (face, padding, spacing, size) = info.ok_or_else(|| {
            FontError::malformed(CMD_INFO, "face", 0, "descriptor has no info line")
        })?;
        let (line_height, base, scale_w, scale_h) = common.ok_or_else(|| {
            FontError::malformed(CMD_COMMON, "lineHeight", 0, "descriptor has no common line")
        })?;

        // Every glyph must point at a declared page
        for (code, line) in glyph_lines {
            if let Some(glyph) = glyphs.get(code) {
                if !page_ids.contains(&glyph.page_id) {
                    return Err(FontError::malformed(
                        CMD_CHAR,
                        "page",
                        line,
                        format!("glyph {} references undeclared page {}", code, glyph.page_id),
                    ));
                }
            }
        }

        if pages.is_empty() {
            warn!("Descriptor declares no pages");
        }

        Ok(Self {
            descriptor: FontDescriptor {
                face,
                line_height,
                padding,
                spacing,
                size,
                base,
                scale_w,
                scale_h,
            },
            pages,
            glyphs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
info face=\"Pixel Sans\" size=16 bold=0 padding=1,2,3,4 spacing=1,1
common lineHeight=18 base=14 scaleW=64 scaleH=32 pages=2
page id=0 file=\"pixel_0.png\"
page id=1 file=\"sub dir/pixel_1.png\"
chars count=3
char id=65 x=0 y=0 width=8 height=10 xoffset=0 yoffset=1 xadvance=9 page=0
char id=66 x=8 y=0 width=8 height=10 xoffset=1 yoffset=1 xadvance=9 page=0
char id=32 x=0 y=0 width=0 height=0 xoffset=0 yoffset=0 xadvance=4 page=1
kerning first=65 second=66 amount=-2
";

    fn definition(text: &str) -> Result<FontDefinition> {
        FontDefinition::parse(text, Path::new("fonts/pixel.fnt"))
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize("info face=\"Times New Roman\"  size=12"),
            vec!["info", "face=\"Times New Roman\"", "size=12"]
        );
        assert_eq!(
            tokenize("page file=\"a \\\"b\\\" c.png\""),
            vec!["page", "file=\"a \\\"b\\\" c.png\""]
        );
        assert_eq!(
            tokenize("page id=0 file='a \"b\" c.png' x=1"),
            vec!["page", "id=0", "file='a \"b\" c.png'", "x=1"]
        );
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_split_on_first_equals() {
        let cmds = parse("meta url=http://x/?a=b flag");
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].get("url"), Some("http://x/?a=b"));
        assert_eq!(cmds[0].get("flag"), Some(""));
    }

    #[test]
    fn test_parse_sample() {
        let def = definition(SAMPLE).unwrap();
        assert_eq!(def.descriptor.face, "Pixel Sans");
        assert_eq!(def.descriptor.line_height, 18.0);
        assert_eq!(def.descriptor.padding, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(def.descriptor.spacing, [1.0, 1.0]);
        assert_eq!(def.descriptor.size, Some(16.0));
        assert_eq!(def.descriptor.base, Some(14.0));
        assert_eq!(def.descriptor.scale_w, Some(64.0));

        assert_eq!(def.pages.len(), 2);
        assert_eq!(def.pages[0].source_path, Path::new("fonts/pixel_0.png"));
        assert_eq!(def.pages[1].source_path, Path::new("fonts/sub dir/pixel_1.png"));

        assert_eq!(def.glyphs.len(), 3);
        for code in [65, 66, 32] {
            assert!(def.glyphs.contains(code));
        }
        assert_eq!(
            def.glyphs.get(65),
            Some(&Glyph {
                id: 65,
                x: 0.0,
                y: 0.0,
                width: 8.0,
                height: 10.0,
                x_offset: 0.0,
                y_offset: 1.0,
                x_advance: 9.0,
                page_id: 0,
            })
        );
    }

    #[test]
    fn test_unknown_commands_do_not_alter_fields() {
        let with_kerning = definition(SAMPLE).unwrap();
        let without: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with("kerning") && !l.starts_with("chars"))
            .map(|l| format!("{}\n", l))
            .collect();
        let plain = definition(&without).unwrap();
        assert_eq!(with_kerning.descriptor, plain.descriptor);
        assert_eq!(with_kerning.pages, plain.pages);
        assert_eq!(with_kerning.glyphs.len(), plain.glyphs.len());
    }

    #[test]
    fn test_non_numeric_fails_loudly() {
        let text = SAMPLE.replace("xadvance=9 page=0\nchar id=66", "xadvance=abc page=0\nchar id=66");
        match definition(&text) {
            Err(FontError::MalformedDescriptor { command, key, line, .. }) => {
                assert_eq!(command, "char");
                assert_eq!(key, "xadvance");
                assert_eq!(line, 6);
            }
            other => panic!("expected malformed descriptor, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let text = SAMPLE.replace("lineHeight=18", "lineHeight=inf");
        assert!(matches!(
            definition(&text),
            Err(FontError::MalformedDescriptor { ref key, .. }) if key == "lineHeight"
        ));
    }

    #[test]
    fn test_out_of_range_number_rejected() {
        let cases = [
            ("x=0 y=0 width=8 height=10 xoffset=0", "x=1e300 y=0 width=8 height=10 xoffset=0", "char", "x"),
            ("padding=1,2,3,4", "padding=0,0,0,1e39", "info", "padding"),
            ("base=14", "base=1e300", "common", "base"),
            ("width=8 height=10 xoffset=1", "width=1e39 height=10 xoffset=1", "char", "width"),
        ];
        for (from, to, want_command, want_key) in cases {
            let text = SAMPLE.replacen(from, to, 1);
            match definition(&text) {
                Err(FontError::MalformedDescriptor { command, key, .. }) => {
                    assert_eq!(command, want_command, "{}", to);
                    assert_eq!(key, want_key, "{}", to);
                }
                other => panic!("expected malformed descriptor for {}, got {:?}", to, other),
            }
        }
    }

    #[test]
    fn test_large_number_within_range() {
        let text = SAMPLE.replace("scaleW=64", "scaleW=1e38");
        let def = definition(&text).unwrap();
        assert_eq!(def.descriptor.scale_w, Some(1e38_f64 as f32));
    }

    #[test]
    fn test_missing_key() {
        let text = SAMPLE.replace(" yoffset=1 xadvance=9 page=0\nchar id=66", " xadvance=9 page=0\nchar id=66");
        assert!(matches!(
            definition(&text),
            Err(FontError::MalformedDescriptor { ref key, .. }) if key == "yoffset"
        ));
    }

    #[test]
    fn test_bad_padding_count() {
        let text = SAMPLE.replace("padding=1,2,3,4", "padding=1,2,3");
        assert!(matches!(
            definition(&text),
            Err(FontError::MalformedDescriptor { ref key, .. }) if key == "padding"
        ));
    }

    #[test]
    fn test_undeclared_page() {
        let text = SAMPLE.replace("xadvance=4 page=1", "xadvance=4 page=7");
        assert!(matches!(
            definition(&text),
            Err(FontError::MalformedDescriptor { ref key, .. }) if key == "page"
        ));
    }

    #[test]
    fn test_duplicate_page_id() {
        let text = SAMPLE.replace("page id=1", "page id=0");
        assert!(matches!(
            definition(&text),
            Err(FontError::MalformedDescriptor { ref key, .. }) if key == "id"
        ));
    }

    #[test]
    fn test_negative_width_rejected() {
        let text = SAMPLE.replace("width=8 height=10 xoffset=1", "width=-8 height=10 xoffset=1");
        assert!(matches!(
            definition(&text),
            Err(FontError::MalformedDescriptor { ref key, .. }) if key == "width"
        ));
    }

    #[test]
    fn test_missing_common() {
        let text: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with("common"))
            .map(|l| format!("{}\n", l))
            .collect();
        assert!(matches!(
            definition(&text),
            Err(FontError::MalformedDescriptor { ref command, .. }) if command == "common"
        ));
    }

    #[test]
    fn test_single_quoted_file_with_space() {
        let text = SAMPLE.replace("file=\"pixel_0.png\"", "file='a b.png'");
        let def = definition(&text).unwrap();
        assert_eq!(def.pages[0].source_path, Path::new("fonts/a b.png"));
    }

    #[test]
    fn test_escaped_file_path() {
        let text = SAMPLE.replace("file=\"pixel_0.png\"", r#"file="odd\\name.png""#);
        let def = definition(&text).unwrap();
        assert_eq!(def.pages[0].source_path, Path::new("fonts").join("odd\\name.png"));
    }
}
