use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Point size used when rasterizing glyphs from a font file
pub const FONT_SIZE: f32 = 40.0;

/// Font looked up when no explicit font path is given
pub const DEFAULT_FONT_PATH: &str = "fonts/DejaVuSansMono.ttf";

/// Fixed pixel box a single glyph is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphGeometry {
    pub width: u32,
    pub height: u32,
}

impl GlyphGeometry {
    /// Box for the font-based rasterizer. A monospace glyph at 40pt fits 25x40.
    pub const FONT: GlyphGeometry = GlyphGeometry { width: 25, height: 40 };

    /// Box for the built-in bitmap font
    pub const BUILTIN: GlyphGeometry = GlyphGeometry { width: 23, height: 40 };

    /// Number of channel samples in an RGB bitmap of this geometry
    pub fn channel_samples(&self) -> u64 {
        self.width as u64 * self.height as u64 * 3
    }
}

/// How a query score is matched against the sorted density index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Halve the sorted table until one entry is left. Converges near the
    /// query but may miss the closest entry by one position.
    #[default]
    Bisect,
    /// Entry with the smallest absolute score difference
    Nearest,
}

/// Cell density policy used during conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Mean cell intensity rescaled onto the glyph density band
    Mean,
    /// Share of white samples after binarizing the whole image
    Relative,
}

impl ScoringPolicy {
    /// Table file this policy reads when none is given explicitly
    pub fn default_table_path(&self) -> &'static Path {
        match self {
            ScoringPolicy::Mean => Path::new("density_mean.txt"),
            ScoringPolicy::Relative => Path::new("density_rel.txt"),
        }
    }

    /// Code range the default table for this policy is built from.
    /// A few hundred characters suit the mean policy; the binarized
    /// policy benefits from the whole basic multilingual plane.
    pub fn default_code_range(&self) -> Range<u32> {
        match self {
            ScoringPolicy::Mean => 32..300,
            ScoringPolicy::Relative => 32..0xFFFF,
        }
    }
}

impl FromStr for ScoringPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(ScoringPolicy::Mean),
            "rel" => Ok(ScoringPolicy::Relative),
            other => Err(Error::InvalidConfig(format!(
                "unknown mode {other:?}, expected \"mean\" or \"rel\""
            ))),
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringPolicy::Mean => f.write_str("mean"),
            ScoringPolicy::Relative => f.write_str("rel"),
        }
    }
}

/// Configuration for image to text conversion
#[derive(Debug, Clone)]
pub struct AsciiConfig {
    /// Cell geometry
    pub cell_width: u32,  // samples per cell horizontally, default 2
    pub cell_height: u32, // samples per cell vertically, default 4

    /// Resize
    pub target_height: Option<u32>, // None keeps the source size, default Some(400)

    /// Scoring
    pub mean_scale: f64,        // mean policy divisor is 255 / mean_scale, default 0.45
    pub binarize_threshold: u8, // relative policy cutoff, default 127

    /// Lookup
    pub search: SearchStrategy, // default Bisect

    /// Output
    pub substitute: char,  // default '.'
    pub denylist: Vec<u32>, // code points replaced by `substitute`
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            cell_width: 2,
            cell_height: 4,

            target_height: Some(400),

            mean_scale: 0.45,
            binarize_threshold: 127,

            search: SearchStrategy::Bisect,

            substitute: '.',
            // DEL, APC, right-to-left mark, right-to-left override
            denylist: vec![0x7F, 0x9F, 0x200F, 0x202E],
        }
    }
}

impl AsciiConfig {
    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.cell_width < 1 || self.cell_height < 1 {
            return Err(Error::InvalidConfig(format!(
                "cell size must be at least 1x1, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        if !(self.mean_scale > 0.0 && self.mean_scale <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "mean_scale must be in (0, 1], got {}",
                self.mean_scale
            )));
        }
        if self.target_height == Some(0) {
            return Err(Error::InvalidConfig(
                "target_height must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Divisor turning a 0-255 mean intensity into a density score
    pub fn mean_divisor(&self) -> f64 {
        255.0 / self.mean_scale
    }
}
