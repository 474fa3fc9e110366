//! Glyph density tables
//!
//! A table maps every renderable code in a range to the ink density of its
//! glyph. Tables are built once, offline, and stored as plain text with one
//! `<code> <score>` pair per line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::glyph::{GlyphRasterizer, glyph_density};

/// One (code, density) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableEntry {
    pub code: u32,
    pub score: f64,
}

/// Density scores in build (or file) order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityTable {
    entries: Vec<TableEntry>,
}

/// Outcome of building a table over a code range
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub table: DensityTable,
    /// Codes the rasterizer could not draw, ascending
    pub failures: Vec<u32>,
}

impl DensityTable {
    pub fn new(entries: Vec<TableEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<TableEntry> {
        self.entries
    }

    /// Rasterize every code in `range` and score it
    ///
    /// Glyphs are rendered in parallel but the table keeps ascending code
    /// order. Codes that fail to rasterize are logged and left out.
    pub fn build<R: GlyphRasterizer + ?Sized>(rasterizer: &R, range: Range<u32>) -> BuildReport {
        log::info!(
            "building density table for {:#x}..{:#x} ({} codes)",
            range.start,
            range.end,
            range.len()
        );

        let results: Vec<(u32, Result<f64>)> = range
            .into_par_iter()
            .map(|code| {
                let score = rasterizer.rasterize(code).map(|bitmap| glyph_density(&bitmap));
                (code, score)
            })
            .collect();

        let mut entries = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (code, score) in results {
            match score {
                Ok(score) => entries.push(TableEntry { code, score }),
                Err(err) => {
                    log::warn!("skipping code {code}: {err}");
                    failures.push(code);
                }
            }
        }

        log::info!(
            "density table built: {} entries, {} skipped",
            entries.len(),
            failures.len()
        );

        BuildReport {
            table: DensityTable { entries },
            failures,
        }
    }

    /// Write the table to `path`, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Serialize as `<code> <score>` lines
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        for entry in &self.entries {
            // f64 Display is the shortest string that parses back exactly
            writeln!(out, "{} {}", entry.code, entry.score)?;
        }
        Ok(())
    }

    /// Read a table previously written by [`DensityTable::write_to`]
    pub fn read_from(path: &Path) -> Result<Self> {
        Self::read(BufReader::new(File::open(path)?))
    }

    pub fn read<R: BufRead>(input: R) -> Result<Self> {
        let mut entries = Vec::new();

        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let lineno = idx + 1;
            let mut tokens = line.split_whitespace();

            let Some(code) = tokens.next() else {
                continue; // blank line
            };
            let score = tokens.next().ok_or_else(|| Error::MalformedTable {
                line: lineno,
                reason: "missing score".to_string(),
            })?;

            let code = code.parse::<u32>().map_err(|e| Error::MalformedTable {
                line: lineno,
                reason: format!("bad code {code:?}: {e}"),
            })?;
            let score = score.parse::<f64>().map_err(|e| Error::MalformedTable {
                line: lineno,
                reason: format!("bad score {score:?}: {e}"),
            })?;

            entries.push(TableEntry { code, score });
        }

        Ok(Self { entries })
    }
}

/// Build a table for `range` and write it to `path`
pub fn build_table_file<R: GlyphRasterizer + ?Sized>(
    rasterizer: &R,
    range: Range<u32>,
    path: &Path,
) -> Result<BuildReport> {
    let report = DensityTable::build(rasterizer, range);
    report.table.write_to(path)?;
    log::info!("wrote {} entries to {}", report.table.len(), path.display());
    Ok(report)
}
