use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building density tables or converting images
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),

    #[error("{} is not a usable font file", path.display())]
    Font { path: PathBuf },

    #[error("cannot rasterize code point {code:#x}")]
    Rasterization { code: u32 },

    #[error("density table {} has no entries", path.display())]
    EmptyTable { path: PathBuf },

    #[error("malformed density table line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
