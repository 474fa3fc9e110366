use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;

use crate::bitmap_font::{self, GLYPH_COLS, GLYPH_ROWS};
use crate::config::{FONT_SIZE, GlyphGeometry};
use crate::error::{Error, Result};

const INK: Rgb<u8> = Rgb([255, 255, 255]);

/// Renders a single character into a fixed-size bitmap
///
/// The bitmap is always exactly `geometry()` in size, black background with
/// white strokes. Implementations must be deterministic for a given code.
pub trait GlyphRasterizer: Send + Sync {
    fn geometry(&self) -> GlyphGeometry;

    /// Render `code` or report that it cannot be drawn
    fn rasterize(&self, code: u32) -> Result<RgbImage>;
}

/// Density of a rendered glyph: the share of channel samples that are not
/// pure background
///
/// Every channel of every pixel counts, so a bitmap with any partially lit
/// antialiasing sample still counts that sample as ink.
pub fn glyph_density(bitmap: &RgbImage) -> f64 {
    let samples = bitmap.as_raw();
    if samples.is_empty() {
        return 0.0;
    }
    let background = samples.iter().filter(|&&s| s == 0).count();
    (samples.len() - background) as f64 / samples.len() as f64
}

/// Rasterizer drawing glyphs from a TrueType/OpenType font file
pub struct FontRasterizer {
    font: FontVec,
    scale: PxScale,
    geometry: GlyphGeometry,
}

impl FontRasterizer {
    /// Load a font from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data).map_err(|_| Error::Font {
            path: path.to_path_buf(),
        })?;
        Ok(Self::new(font))
    }

    /// Wrap an already loaded font
    pub fn new(font: FontVec) -> Self {
        // PxScale is the ascent-to-descent height; size it so the em square
        // is FONT_SIZE pixels tall
        let scale = font
            .units_per_em()
            .map(|units_per_em| PxScale::from(FONT_SIZE * font.height_unscaled() / units_per_em))
            .unwrap_or_else(|| PxScale::from(FONT_SIZE));
        Self {
            font,
            scale,
            geometry: GlyphGeometry::FONT,
        }
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn geometry(&self) -> GlyphGeometry {
        self.geometry
    }

    fn rasterize(&self, code: u32) -> Result<RgbImage> {
        // Missing glyphs fall back to the font's notdef box, so only codes
        // that are not chars at all fail here.
        let ch = char::from_u32(code).ok_or(Error::Rasterization { code })?;
        let mut buf = [0u8; 4];

        let mut bitmap = RgbImage::new(self.geometry.width, self.geometry.height);
        draw_text_mut(
            &mut bitmap,
            INK,
            0,
            0,
            self.scale,
            &self.font,
            ch.encode_utf8(&mut buf),
        );
        Ok(bitmap)
    }
}

/// Rasterizer using the embedded bitmap font, no font file needed
///
/// Each 5x7 glyph is scaled 4x horizontally and 5x vertically, which puts a
/// 20x35 glyph inside the 23x40 box with a one pixel left margin and a two
/// pixel top margin.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinRasterizer;

impl BuiltinRasterizer {
    const SCALE_X: u32 = 4;
    const SCALE_Y: u32 = 5;
    const OFFSET_X: u32 = 1;
    const OFFSET_Y: u32 = 2;
}

impl GlyphRasterizer for BuiltinRasterizer {
    fn geometry(&self) -> GlyphGeometry {
        GlyphGeometry::BUILTIN
    }

    fn rasterize(&self, code: u32) -> Result<RgbImage> {
        let rows = bitmap_font::glyph(code).ok_or(Error::Rasterization { code })?;
        let geometry = self.geometry();
        let mut bitmap = RgbImage::new(geometry.width, geometry.height);

        for row in 0..GLYPH_ROWS {
            for col in 0..GLYPH_COLS {
                if !bitmap_font::is_set(rows, col, row) {
                    continue;
                }
                let x0 = Self::OFFSET_X + col * Self::SCALE_X;
                let y0 = Self::OFFSET_Y + row * Self::SCALE_Y;
                for y in y0..y0 + Self::SCALE_Y {
                    for x in x0..x0 + Self::SCALE_X {
                        bitmap.put_pixel(x, y, INK);
                    }
                }
            }
        }

        Ok(bitmap)
    }
}
