pub mod config;
pub mod error;
pub mod types;

pub use config::{SpriteConfig, PIXEL_SCALE};
pub use error::{Result, SpriteError};
