//! Sprite-sheet atlases, frame animation and the sprite card built on them.

pub mod animation;
pub mod atlas;
pub mod buffer;
pub mod layout;
pub mod loader;
pub mod sprite;

pub use animation::{AnimationClip, AnimationPlayer, PlaybackState, PlayerTick};
pub use atlas::{Layer, SpriteAtlas};
pub use buffer::ImageBuffer;
pub use layout::{next_power_of_two, SheetMetrics, UvTransform};
pub use loader::{FileDecoder, ImageDecoder, ImageLoader, PathResolver, SearchPath, SheetLoader};
pub use sprite::{Sprite2D, SpriteState};
