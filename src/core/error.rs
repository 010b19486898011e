use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpriteError {
    #[error("Invalid dimension: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("Invalid anchor: {0:?}")]
    InvalidAnchor(String),

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Unknown animation: {0}")]
    UnknownAnimation(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Frame {index} out of range ({count} cells)")]
    InvalidFrame { index: usize, count: usize },

    #[error("Invalid animation: {0}")]
    InvalidAnimation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for SpriteError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => SpriteError::Io(io),
            other => SpriteError::DecodeError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpriteError>;
