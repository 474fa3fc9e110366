//! ascdraw - image to text-art converter driven by glyph ink density
//!
//! Every character in a chosen range is rendered once and scored by how much
//! of its box is inked. An image is then cut into small cells. Each cell is
//! scored the same way and replaced by the character with the closest score.
//!
//! # Example
//! ```no_run
//! use std::path::Path;
//! use ascdraw::{AsciiConfig, BuiltinRasterizer, ScoringPolicy, build_table_file, convert};
//!
//! let table = Path::new("density_mean.txt");
//! build_table_file(&BuiltinRasterizer, 32..127, table).unwrap();
//!
//! let config = AsciiConfig::default();
//! convert(
//!     Path::new("photo.jpg"),
//!     Path::new("photo.txt"),
//!     ScoringPolicy::Mean,
//!     table,
//!     &config,
//! )
//! .unwrap();
//! ```

pub mod bitmap_font;
pub mod cells;
pub mod config;
pub mod error;
pub mod glyph;
pub mod index;
pub mod lut;
pub mod processor;
pub mod render;
pub mod table;

// Re-export main types for convenience
pub use config::{AsciiConfig, GlyphGeometry, ScoringPolicy, SearchStrategy};
pub use error::{Error, Result};
pub use glyph::{BuiltinRasterizer, FontRasterizer, GlyphRasterizer};
pub use index::DensityIndex;
pub use processor::{convert, load_intensity_matrix, resize_to_height};
pub use render::AsciiRenderer;
pub use table::{BuildReport, DensityTable, TableEntry, build_table_file};
