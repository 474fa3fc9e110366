use std::fmt;
use std::io::Write;

use image::GrayImage;
use rayon::prelude::*;

use crate::cells::{Cell, CellGrid, CellScore, CellScorer};
use crate::config::{AsciiConfig, ScoringPolicy};
use crate::error::Result;
use crate::index::DensityIndex;
use crate::lut::display_char;

/// Cell-rows scored in parallel before being written out in order
const ROWS_PER_BAND: u32 = 32;

/// Conversion pipeline stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Resized,
    Binarized,
    Scanning,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Turns an intensity matrix into text, one character per cell
pub struct AsciiRenderer {
    index: DensityIndex,
    scorer: CellScorer,
    config: AsciiConfig,
}

impl AsciiRenderer {
    /// Create a renderer, rejecting an invalid configuration up front
    pub fn new(index: DensityIndex, policy: ScoringPolicy, config: AsciiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            index,
            scorer: CellScorer::new(policy, &config),
            config,
        })
    }

    pub fn config(&self) -> &AsciiConfig {
        &self.config
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.scorer.policy()
    }

    pub fn index(&self) -> &DensityIndex {
        &self.index
    }

    /// Character for one cell of a prepared image
    pub fn cell_char(&self, img: &GrayImage, cell: Cell) -> char {
        match self.scorer.score(img, cell) {
            CellScore::Blank => self.config.substitute,
            CellScore::Density(score) => {
                let code = self.index.lookup(score, self.config.search);
                display_char(code, &self.config)
            }
        }
    }

    fn render_row(&self, img: &GrayImage, grid: &CellGrid, row: u32) -> String {
        grid.row(row).map(|cell| self.cell_char(img, cell)).collect()
    }

    /// Render `img` to `out`, one line per cell-row
    ///
    /// Binarizes the image first when the relative policy is in use. Rows
    /// are scored in parallel a band at a time and always written in scan
    /// order.
    pub fn render_to<W: Write>(&self, mut img: GrayImage, out: &mut W) -> Result<()> {
        if self.policy() == ScoringPolicy::Relative {
            self.scorer.prepare(&mut img);
            log::debug!("stage: {}", Stage::Binarized);
        }

        let grid = CellGrid::for_image(&img, &self.config)?;
        let total = grid.rows();
        log::debug!(
            "stage: {} ({}x{} cells)",
            Stage::Scanning,
            grid.columns(),
            total
        );

        let mut band_start = 0;
        while band_start < total {
            let band_end = (band_start + ROWS_PER_BAND).min(total);
            let lines: Vec<String> = (band_start..band_end)
                .into_par_iter()
                .map(|row| self.render_row(&img, &grid, row))
                .collect();

            for line in lines {
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
            }

            band_start = band_end;
            log::debug!("scanned {band_start}/{total} cell rows");
        }

        out.flush()?;
        log::debug!("stage: {}", Stage::Done);
        Ok(())
    }

    /// Render `img` into a string
    pub fn render_to_string(&self, img: GrayImage) -> Result<String> {
        let mut buf = Vec::new();
        self.render_to(img, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchStrategy;
    use crate::table::{DensityTable, TableEntry};
    use image::Luma;

    fn index(pairs: &[(u32, f64)]) -> DensityIndex {
        let entries = pairs
            .iter()
            .map(|&(code, score)| TableEntry { code, score })
            .collect();
        DensityIndex::from_table(DensityTable::new(entries)).unwrap()
    }

    fn ramp() -> DensityIndex {
        index(&[
            (' ' as u32, 0.0),
            ('.' as u32, 0.05),
            (':' as u32, 0.12),
            ('+' as u32, 0.225),
            ('*' as u32, 0.3),
            ('#' as u32, 0.4),
            ('@' as u32, 0.5),
        ])
    }

    fn renderer(policy: ScoringPolicy) -> AsciiRenderer {
        let config = AsciiConfig {
            target_height: None,
            ..Default::default()
        };
        AsciiRenderer::new(ramp(), policy, config).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AsciiConfig {
            cell_width: 0,
            ..Default::default()
        };
        assert!(AsciiRenderer::new(ramp(), ScoringPolicy::Mean, config).is_err());
    }

    #[test]
    fn test_single_row_two_cells() {
        let img = GrayImage::from_pixel(4, 4, Luma([90]));
        let text = renderer(ScoringPolicy::Mean).render_to_string(img).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.chars().count(), 3);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_two_rows() {
        let img = GrayImage::from_pixel(4, 8, Luma([90]));
        let text = renderer(ScoringPolicy::Mean).render_to_string(img).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 2));
    }

    #[test]
    fn test_partial_cells_cropped() {
        let img = GrayImage::from_pixel(5, 6, Luma([90]));
        let text = renderer(ScoringPolicy::Mean).render_to_string(img).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 3));
    }

    #[test]
    fn test_mean_half_lit_cell() {
        // Mean 127.5 scales to 0.225
        let img = GrayImage::from_raw(2, 4, vec![0, 0, 0, 0, 255, 255, 255, 255]).unwrap();
        let text = renderer(ScoringPolicy::Mean).render_to_string(img).unwrap();
        assert_eq!(text, "+\n");
    }

    #[test]
    fn test_relative_black_cell_skips_index() {
        // The index has no '.' near zero; the blank cell must still print '.'
        let idx = index(&[('A' as u32, 0.0), ('#' as u32, 0.9)]);
        let config = AsciiConfig {
            target_height: None,
            ..Default::default()
        };
        let renderer = AsciiRenderer::new(idx, ScoringPolicy::Relative, config).unwrap();

        let img = GrayImage::from_pixel(2, 4, Luma([127]));
        assert_eq!(renderer.render_to_string(img).unwrap(), ".\n");
    }

    #[test]
    fn test_relative_white_cell_picks_densest() {
        let img = GrayImage::from_pixel(2, 4, Luma([128]));
        let text = renderer(ScoringPolicy::Relative)
            .render_to_string(img)
            .unwrap();
        assert_eq!(text, "@\n");
    }

    #[test]
    fn test_denylisted_code_becomes_dot() {
        let idx = index(&[(0x7F, 0.3)]);
        let config = AsciiConfig {
            target_height: None,
            ..Default::default()
        };
        let renderer = AsciiRenderer::new(idx, ScoringPolicy::Mean, config).unwrap();

        let img = GrayImage::from_pixel(2, 4, Luma([200]));
        assert_eq!(renderer.render_to_string(img).unwrap(), ".\n");
    }

    #[test]
    fn test_nearest_search_strategy() {
        // Mean 160 scales to about 0.282: bisection keeps '+', nearest picks '*'
        let img = GrayImage::from_pixel(2, 4, Luma([160]));
        let bisect = renderer(ScoringPolicy::Mean)
            .render_to_string(img.clone())
            .unwrap();
        assert_eq!(bisect, "+\n");

        let config = AsciiConfig {
            target_height: None,
            search: SearchStrategy::Nearest,
            ..Default::default()
        };
        let nearest = AsciiRenderer::new(ramp(), ScoringPolicy::Mean, config)
            .unwrap()
            .render_to_string(img)
            .unwrap();
        assert_eq!(nearest, "*\n");
    }

    #[test]
    fn test_output_keeps_scan_order_across_bands() {
        // Each cell-row gets its own brightness so line order is checkable
        let rows = ROWS_PER_BAND * 2 + 3;
        let mut img = GrayImage::new(2, rows * 4);
        for y in 0..img.height() {
            let cell_row = y / 4;
            let value = if cell_row % 2 == 0 { 0 } else { 255 };
            img.put_pixel(0, y, Luma([value]));
            img.put_pixel(1, y, Luma([value]));
        }

        let text = renderer(ScoringPolicy::Mean).render_to_string(img).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), rows as usize);
        for (i, line) in lines.iter().enumerate() {
            let expected = if i % 2 == 0 { " " } else { "#" };
            assert_eq!(*line, expected, "line {i}");
        }
    }
}
