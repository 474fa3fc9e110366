use image::GrayImage;
use imageproc::contrast::{ThresholdType, threshold_mut};

use crate::config::{AsciiConfig, ScoringPolicy};
use crate::error::{Error, Result};

/// Rectangular block of samples replaced by one output character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Cell {
    pub fn samples(&self) -> u32 {
        self.width * self.height
    }
}

/// Row-major tiling of an image into fixed-size cells
///
/// Cells on the right and bottom edges are cropped to the image instead of
/// padded, so every cell holds at least one sample.
#[derive(Debug, Clone, Copy)]
pub struct CellGrid {
    image_width: u32,
    image_height: u32,
    cell_width: u32,
    cell_height: u32,
}

impl CellGrid {
    pub fn new(
        image_width: u32,
        image_height: u32,
        cell_width: u32,
        cell_height: u32,
    ) -> Result<Self> {
        if cell_width == 0 || cell_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "cell size must be non-zero, got {cell_width}x{cell_height}"
            )));
        }
        Ok(Self {
            image_width,
            image_height,
            cell_width,
            cell_height,
        })
    }

    pub fn for_image(img: &GrayImage, config: &AsciiConfig) -> Result<Self> {
        Self::new(img.width(), img.height(), config.cell_width, config.cell_height)
    }

    /// Number of cells per output line
    pub fn columns(&self) -> u32 {
        self.image_width.div_ceil(self.cell_width)
    }

    /// Number of output lines
    pub fn rows(&self) -> u32 {
        self.image_height.div_ceil(self.cell_height)
    }

    /// Cells of one cell-row, left to right
    pub fn row(&self, row: u32) -> impl Iterator<Item = Cell> + use<> {
        let grid = *self;
        let y = row * grid.cell_height;
        let height = grid.cell_height.min(grid.image_height.saturating_sub(y));

        (0..grid.columns()).map(move |col| {
            let x = col * grid.cell_width;
            Cell {
                x,
                y,
                width: grid.cell_width.min(grid.image_width - x),
                height,
            }
        })
    }

    /// All cells in scan order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let grid = *self;
        (0..grid.rows()).flat_map(move |row| grid.row(row))
    }
}

/// Density estimate for a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellScore {
    /// Binarized cell without a single white sample. Rendered as the
    /// substitute character without consulting the index.
    Blank,
    Density(f64),
}

/// Threshold every pixel to 0 or 255
///
/// Samples at or below `threshold` become 0, everything else 255.
pub fn binarize(img: &mut GrayImage, threshold: u8) {
    threshold_mut(img, threshold, ThresholdType::Binary);
}

/// Mean intensity of a cell divided by `divisor`
///
/// # Arguments
/// * `img` - Grayscale intensity matrix
/// * `cell` - Cell inside `img`
/// * `divisor` - Intensity that maps to a score of 1.0
///
/// # Returns
/// The scaled mean. Not clamped: a bright cell can exceed 1.0.
pub fn mean_score(img: &GrayImage, cell: Cell, divisor: f64) -> f64 {
    let mut sum = 0u64;
    for y in cell.y..cell.y + cell.height {
        for x in cell.x..cell.x + cell.width {
            sum += img.get_pixel(x, y)[0] as u64;
        }
    }
    let mean = sum as f64 / cell.samples() as f64;
    mean / divisor
}

/// Share of samples in a cell that are exactly 255
///
/// # Arguments
/// * `img` - Binarized intensity matrix
/// * `cell` - Cell inside `img`
///
/// # Returns
/// A ratio in [0, 1]
pub fn relative_score(img: &GrayImage, cell: Cell) -> f64 {
    let mut white = 0u32;
    for y in cell.y..cell.y + cell.height {
        for x in cell.x..cell.x + cell.width {
            if img.get_pixel(x, y)[0] == 255 {
                white += 1;
            }
        }
    }
    white as f64 / cell.samples() as f64
}

/// Scores cells under one policy
#[derive(Debug, Clone, Copy)]
pub struct CellScorer {
    policy: ScoringPolicy,
    mean_divisor: f64,
    threshold: u8,
}

impl CellScorer {
    pub fn new(policy: ScoringPolicy, config: &AsciiConfig) -> Self {
        Self {
            policy,
            mean_divisor: config.mean_divisor(),
            threshold: config.binarize_threshold,
        }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    /// Whole-image pass required before scoring. Binarizes for the relative
    /// policy, leaves the image alone otherwise.
    pub fn prepare(&self, img: &mut GrayImage) {
        if self.policy == ScoringPolicy::Relative {
            binarize(img, self.threshold);
        }
    }

    /// Score one cell of an image already passed through [`CellScorer::prepare`]
    pub fn score(&self, img: &GrayImage, cell: Cell) -> CellScore {
        match self.policy {
            ScoringPolicy::Mean => CellScore::Density(mean_score(img, cell, self.mean_divisor)),
            ScoringPolicy::Relative => {
                let ratio = relative_score(img, cell);
                if ratio == 0.0 {
                    CellScore::Blank
                } else {
                    CellScore::Density(ratio)
                }
            }
        }
    }
}
