//! Test doubles for the host capabilities.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;

use spritecard::renderer::host::{
    QuadDesc, QuadId, SceneHost, Scheduler, TaskHandle, TextureDesc, WrapMode,
};
use spritecard::renderer::sprites::{ImageBuffer, ImageLoader};
use spritecard::{Result, SpriteError};

/// Install a tracing subscriber that writes through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("spritecard=debug")
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadedTexture {
    pub quad: QuadId,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    CreateQuad(QuadDesc),
    SetTexture(QuadId),
    SetTexScale(QuadId, Vec2),
    SetTexOffset(QuadId, Vec2),
    Remove(QuadId),
}

/// Records every call instead of rendering.
#[derive(Default)]
pub struct RecordingHost {
    next_quad: u64,
    pub calls: Vec<HostCall>,
    pub textures: Vec<UploadedTexture>,
    pub live_quads: Vec<QuadId>,
}

impl RecordingHost {
    pub fn last_scale(&self) -> Option<Vec2> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::SetTexScale(_, scale) => Some(*scale),
            _ => None,
        })
    }

    pub fn last_offset(&self) -> Option<Vec2> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::SetTexOffset(_, offset) => Some(*offset),
            _ => None,
        })
    }

    pub fn last_texture(&self) -> Option<&UploadedTexture> {
        self.textures.last()
    }

    pub fn quads_created(&self) -> Vec<&QuadDesc> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::CreateQuad(desc) => Some(desc),
                _ => None,
            })
            .collect()
    }
}

impl SceneHost for RecordingHost {
    fn create_quad(&mut self, desc: &QuadDesc) -> QuadId {
        self.next_quad += 1;
        let quad = QuadId(self.next_quad);
        self.calls.push(HostCall::CreateQuad(desc.clone()));
        self.live_quads.push(quad);
        quad
    }

    fn set_texture(&mut self, quad: QuadId, texture: &TextureDesc<'_>) {
        self.calls.push(HostCall::SetTexture(quad));
        self.textures.push(UploadedTexture {
            quad,
            width: texture.width,
            height: texture.height,
            pixels: texture.pixels.to_vec(),
            wrap_u: texture.wrap_u,
            wrap_v: texture.wrap_v,
        });
    }

    fn set_tex_scale(&mut self, quad: QuadId, scale: Vec2) {
        self.calls.push(HostCall::SetTexScale(quad, scale));
    }

    fn set_tex_offset(&mut self, quad: QuadId, offset: Vec2) {
        self.calls.push(HostCall::SetTexOffset(quad, offset));
    }

    fn remove(&mut self, quad: QuadId) {
        self.calls.push(HostCall::Remove(quad));
        self.live_quads.retain(|q| *q != quad);
    }
}

/// A scheduler the test fires by hand.
#[derive(Default)]
pub struct ManualScheduler {
    next: u64,
    pub live: Vec<(TaskHandle, Duration, String)>,
    pub cancelled: Vec<TaskHandle>,
}

impl ManualScheduler {
    /// Handles that are still scheduled.
    pub fn live_handles(&self) -> Vec<TaskHandle> {
        self.live.iter().map(|(handle, _, _)| *handle).collect()
    }

    pub fn only_live(&self) -> TaskHandle {
        let live = self.live_handles();
        assert_eq!(live.len(), 1, "expected exactly one live schedule");
        live[0]
    }

    /// Forget a handle the owner told us to stop.
    pub fn stopped(&mut self, handle: TaskHandle) {
        self.live.retain(|(h, _, _)| *h != handle);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, interval: Duration, label: &str) -> TaskHandle {
        self.next += 1;
        let handle = TaskHandle(self.next);
        self.live.push((handle, interval, label.to_string()));
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.cancelled.push(handle);
        self.live.retain(|(h, _, _)| *h != handle);
    }
}

/// Serves images from memory by path.
#[derive(Default)]
pub struct MemoryLoader {
    images: HashMap<PathBuf, ImageBuffer>,
}

impl MemoryLoader {
    pub fn with(mut self, path: &str, image: ImageBuffer) -> Self {
        self.images.insert(PathBuf::from(path), image);
        self
    }
}

impl ImageLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<ImageBuffer> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| SpriteError::NotFound(path.to_path_buf()))
    }
}

/// A sheet where every cell is filled with a color derived from its index.
pub fn numbered_sheet(width: u32, height: u32, rows: u32, cols: u32) -> ImageBuffer {
    let mut image = ImageBuffer::new(width, height);
    let (cell_w, cell_h) = (width / cols, height / rows);
    for y in 0..height {
        for x in 0..width {
            let index = (y / cell_h) * cols + (x / cell_w);
            image.put_pixel(x, y, [index as u8 * 10, 0, 0, 255]);
        }
    }
    image
}
