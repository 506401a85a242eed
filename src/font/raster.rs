//! Atlas page pixels
//!
//! Holds the decoded RGBA pixels of one atlas page. Pages are recolored in
//! place: the glyph shape lives entirely in which pixels are non-transparent,
//! so flooding keeps the alpha mask and replaces everything else.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::trace;

use crate::constants::{BYTES_PER_PIXEL, MAX_PAGE_DIMENSION, PNG_DATA_URI_PREFIX};
use crate::error::{FontError, Result};
use crate::utils::Rgba;

/// Decoded RGBA pixels of one atlas page
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    /// RGBA pixel data (row-major, 4 bytes/pixel)
    pixels: Vec<u8>,
    /// Incremented by every flood_color call
    revision: u64,
}

impl RasterBuffer {
    /// Decode an image (any format the `image` crate was built with) to RGBA
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        use image::io::Reader as ImageReader;
        use std::io::Cursor;

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| FontError::Decode(format!("format error: {}", e)))?;

        let img = reader
            .decode()
            .map_err(|e| FontError::Decode(e.to_string()))?;

        let rgba = img.to_rgba8();
        let width = rgba.width();
        let height = rgba.height();
        trace!("Decoded atlas page {}x{}", width, height);

        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Build from raw RGBA pixels
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width > MAX_PAGE_DIMENSION || height > MAX_PAGE_DIMENSION {
            return Err(FontError::Decode(format!(
                "page too large: {}x{} (max {})",
                width, height, MAX_PAGE_DIMENSION
            )));
        }
        // Use checked arithmetic to prevent overflow
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|wh| wh.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| FontError::Decode("page dimensions too large".to_string()))?;
        if pixels.len() != expected {
            return Err(FontError::Decode(format!(
                "RGBA size mismatch: expected {}, got {}",
                expected,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
            revision: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixels
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y), None when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Number of flood_color calls applied to this buffer
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Overwrite every pixel with non-zero alpha by `color`.
    ///
    /// Pixels with alpha exactly 0 are left untouched. Idempotent.
    pub fn flood_color(&mut self, color: impl Into<Rgba>) {
        let color = color.into();
        let mut painted = 0usize;
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            if px[3] != 0 {
                px.copy_from_slice(&color.0);
                painted += 1;
            }
        }
        self.revision += 1;
        trace!(
            "Flooded {} of {} pixels with {}",
            painted,
            self.width as usize * self.height as usize,
            color
        );
    }

    /// Encode the current pixels as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| FontError::Encode(e.to_string()))?;
            writer
                .write_image_data(&self.pixels)
                .map_err(|e| FontError::Encode(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| FontError::Encode(e.to_string()))?;
        }
        Ok(out)
    }

    /// Encode the current pixels as a self-contained `data:image/png` URI
    ///
    /// Always reflects the latest flood_color.
    pub fn encode(&self) -> Result<String> {
        let png = self.encode_png()?;
        Ok(format!("{}{}", PNG_DATA_URI_PREFIX, BASE64.encode(png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x2 page with mixed alpha: 0, 1, 128, 255
    fn mixed_alpha() -> RasterBuffer {
        #[rustfmt::skip]
        let pixels = vec![
            10, 20, 30, 0,     40, 50, 60, 1,     70, 80, 90, 128,   1, 2, 3, 255,
            0, 0, 0, 0,        255, 255, 255, 0,  9, 9, 9, 200,      0, 0, 0, 255,
        ];
        RasterBuffer::from_rgba(4, 2, pixels).unwrap()
    }

    #[test]
    fn test_flood_preserves_transparent_mask() {
        let before = mixed_alpha();
        let mut after = before.clone();
        let color = Rgba([255, 0, 0, 255]);
        after.flood_color(color);

        for y in 0..2 {
            for x in 0..4 {
                let old = before.pixel(x, y).unwrap();
                let new = after.pixel(x, y).unwrap();
                if old[3] == 0 {
                    assert_eq!(new, old, "transparent pixel ({}, {}) changed", x, y);
                } else {
                    assert_eq!(new, color.0, "opaque pixel ({}, {}) not flooded", x, y);
                }
            }
        }
    }

    #[test]
    fn test_flood_idempotent() {
        let mut once = mixed_alpha();
        once.flood_color([12, 34, 56]);
        let mut twice = mixed_alpha();
        twice.flood_color([12, 34, 56]);
        twice.flood_color([12, 34, 56]);
        assert_eq!(once.pixels(), twice.pixels());
        assert_eq!(twice.revision(), 2);
    }

    #[test]
    fn test_three_component_color_is_opaque() {
        let mut buf = mixed_alpha();
        buf.flood_color([1, 2, 3]);
        assert_eq!(buf.pixel(1, 0), Some([1, 2, 3, 255]));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(matches!(
            RasterBuffer::from_rgba(2, 2, vec![0; 15]),
            Err(FontError::Decode(_))
        ));
        assert!(matches!(
            RasterBuffer::from_rgba(MAX_PAGE_DIMENSION + 1, 1, vec![]),
            Err(FontError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            RasterBuffer::decode(b"definitely not an image"),
            Err(FontError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_reflects_flood() {
        let mut buf = mixed_alpha();
        let before = buf.encode().unwrap();
        assert!(before.starts_with(PNG_DATA_URI_PREFIX));

        buf.flood_color([0, 255, 0]);
        let after = buf.encode().unwrap();
        assert_ne!(before, after);

        // PNG written by encode decodes back to the flooded pixels
        let decoded = RasterBuffer::decode(&buf.encode_png().unwrap()).unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.pixels(), buf.pixels());
    }
}
