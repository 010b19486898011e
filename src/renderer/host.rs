//! Capabilities the embedding engine provides to sprites.
//!
//! Sprites never construct scene objects themselves. They describe the quad
//! and texture they need and call through [`SceneHost`], and they ask a
//! [`Scheduler`] for periodic animation ticks.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use serde::Serialize;

use crate::core::types::TransparencyMode;

/// Opaque id for a quad created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadId(pub u64);

/// Opaque id for a scheduled periodic task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// Card extent in world units, relative to the sprite origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CardFrame {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl CardFrame {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Everything the host needs to build the sprite's card.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadDesc {
    pub name: String,
    pub frame: CardFrame,
    pub has_uvs: bool,
    pub two_sided: bool,
    pub transparency: TransparencyMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Point sampling, so sheet pixels stay crisp when magnified.
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Repeat,
}

impl WrapMode {
    /// Repeat wrapping is only needed when the cell tiles more than once.
    pub fn for_repeat(count: u32) -> Self {
        if count > 1 {
            WrapMode::Repeat
        } else {
            WrapMode::Clamp
        }
    }
}

/// A texture upload. `pixels` is tightly packed RGBA8.
#[derive(Debug, Clone, Copy)]
pub struct TextureDesc<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u8],
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

/// Scene-graph operations a sprite relies on.
pub trait SceneHost {
    fn create_quad(&mut self, desc: &QuadDesc) -> QuadId;

    /// Replace the texture bound to `quad`.
    fn set_texture(&mut self, quad: QuadId, texture: &TextureDesc<'_>);

    fn set_tex_scale(&mut self, quad: QuadId, scale: Vec2);

    fn set_tex_offset(&mut self, quad: QuadId, offset: Vec2);

    /// Release the quad and its texture.
    fn remove(&mut self, quad: QuadId);
}

/// What a tick asks of the scheduler afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Reschedule,
    Stop,
}

/// Periodic task primitive.
///
/// The host fires the task every `interval` by calling the owner's tick
/// handler with the returned handle, until the handler answers
/// [`TickOutcome::Stop`] or the handle is cancelled.
pub trait Scheduler {
    fn schedule(&mut self, interval: Duration, label: &str) -> TaskHandle;

    fn cancel(&mut self, handle: TaskHandle);
}

impl<T: SceneHost + ?Sized> SceneHost for Box<T> {
    fn create_quad(&mut self, desc: &QuadDesc) -> QuadId {
        (**self).create_quad(desc)
    }

    fn set_texture(&mut self, quad: QuadId, texture: &TextureDesc<'_>) {
        (**self).set_texture(quad, texture)
    }

    fn set_tex_scale(&mut self, quad: QuadId, scale: Vec2) {
        (**self).set_tex_scale(quad, scale)
    }

    fn set_tex_offset(&mut self, quad: QuadId, offset: Vec2) {
        (**self).set_tex_offset(quad, offset)
    }

    fn remove(&mut self, quad: QuadId) {
        (**self).remove(quad)
    }
}

// Shared hosts: many sprites can hold a clone of the same `Rc<RefCell<_>>`.
impl<T: SceneHost> SceneHost for Rc<RefCell<T>> {
    fn create_quad(&mut self, desc: &QuadDesc) -> QuadId {
        self.borrow_mut().create_quad(desc)
    }

    fn set_texture(&mut self, quad: QuadId, texture: &TextureDesc<'_>) {
        self.borrow_mut().set_texture(quad, texture)
    }

    fn set_tex_scale(&mut self, quad: QuadId, scale: Vec2) {
        self.borrow_mut().set_tex_scale(quad, scale)
    }

    fn set_tex_offset(&mut self, quad: QuadId, offset: Vec2) {
        self.borrow_mut().set_tex_offset(quad, offset)
    }

    fn remove(&mut self, quad: QuadId) {
        self.borrow_mut().remove(quad)
    }
}

impl<T: Scheduler + ?Sized> Scheduler for Box<T> {
    fn schedule(&mut self, interval: Duration, label: &str) -> TaskHandle {
        (**self).schedule(interval, label)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        (**self).cancel(handle)
    }
}

impl<T: Scheduler> Scheduler for Rc<RefCell<T>> {
    fn schedule(&mut self, interval: Duration, label: &str) -> TaskHandle {
        self.borrow_mut().schedule(interval, label)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.borrow_mut().cancel(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_mode_for_repeat() {
        assert_eq!(WrapMode::for_repeat(1), WrapMode::Clamp);
        assert_eq!(WrapMode::for_repeat(2), WrapMode::Repeat);
    }

    #[test]
    fn test_card_frame_extent() {
        let frame = CardFrame {
            left: -6.5,
            right: 6.5,
            bottom: 0.0,
            top: 10.0,
        };
        assert_eq!(frame.width(), 13.0);
        assert_eq!(frame.height(), 10.0);
    }
}
