use std::path::PathBuf;

use ascdraw::ScoringPolicy;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ascdraw")]
#[command(version, about = "Draw images with characters picked by glyph ink density", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Build the table for mean mode from a font
    ascdraw build-table density_mean.txt --mode mean --font fonts/DejaVuSansMono.ttf

    # Convert an image
    ascdraw convert ./flower.jpg ./ascii_flower.txt mean")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image into a text file
    Convert {
        /// Image to convert
        input: PathBuf,

        /// Text file to write
        output: PathBuf,

        /// Cell scoring mode: "mean" or "rel"
        #[arg(value_parser = str::parse::<ScoringPolicy>)]
        mode: ScoringPolicy,

        /// Density table (default depends on mode)
        #[arg(long)]
        table: Option<PathBuf>,

        /// Keep the source resolution
        #[arg(long, conflicts_with = "height")]
        no_resize: bool,

        /// Height the image is resized to before scanning
        #[arg(long, default_value = "400")]
        height: u32,

        /// Pick the entry with the truly closest score instead of bisecting
        #[arg(long)]
        nearest: bool,
    },

    /// Precompute a glyph density table
    BuildTable {
        /// Table file to write
        output: PathBuf,

        /// Mode whose default code range is used: "mean" or "rel"
        #[arg(long, default_value = "mean", value_parser = str::parse::<ScoringPolicy>)]
        mode: ScoringPolicy,

        /// First code point (inclusive)
        #[arg(long)]
        start: Option<u32>,

        /// Last code point (exclusive)
        #[arg(long)]
        end: Option<u32>,

        /// Font file to render glyphs with
        #[arg(long, default_value = ascdraw::config::DEFAULT_FONT_PATH, conflicts_with = "builtin")]
        font: PathBuf,

        /// Use the built-in bitmap font (printable ASCII only)
        #[arg(long)]
        builtin: bool,
    },
}
