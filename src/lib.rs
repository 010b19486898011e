//! Spritecard - sprite sheets on textured cards
//!
//! A base sheet is padded to power-of-two texture dimensions, overlay layers
//! are blended on top, and a single quad shows one grid cell at a time by
//! adjusting its texture scale and offset. Named animations step through
//! cells on a host-provided periodic tick.

pub mod core;
pub mod renderer;

pub use crate::core::config::SpriteConfig;
pub use crate::core::error::{Result, SpriteError};
pub use crate::core::types::{Cell, FlipState, HorizontalAnchor, TransparencyMode, VerticalAnchor};
pub use crate::renderer::sprites::Sprite2D;
