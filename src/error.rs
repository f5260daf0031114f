//! Error types for grime-engine
//!
//! Only construction can fail. Stamping and queries clamp bad input instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("source image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("raster buffer has {actual} bytes, expected {expected}")]
    RasterBuffer { expected: usize, actual: usize },

    #[error("mask size must be non-zero")]
    InvalidMaskSize,

    #[error("dirt layer declared twice: {0}")]
    DuplicateLayer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
