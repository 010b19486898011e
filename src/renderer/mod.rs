//! Sprite rendering on top of a host scene graph.
//!
//! Nothing here talks to a GPU. Sprites compute pixels and texture
//! transforms and hand them to the host through the traits in [`host`].

pub mod host;
pub mod sprites;

pub use host::{
    CardFrame, FilterMode, QuadDesc, QuadId, SceneHost, Scheduler, TaskHandle, TextureDesc,
    TickOutcome, WrapMode,
};
pub use sprites::{
    AnimationClip, AnimationPlayer, ImageBuffer, PlaybackState, SheetMetrics, Sprite2D,
    SpriteAtlas, SpriteState, UvTransform,
};
