//! A textured card showing one cell of a sprite sheet at a time.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::config::SpriteConfig;
use crate::core::error::{Result, SpriteError};
use crate::core::types::{Cell, FlipState};
use crate::renderer::host::{
    CardFrame, FilterMode, QuadDesc, QuadId, SceneHost, Scheduler, TaskHandle, TextureDesc,
    TickOutcome, WrapMode,
};

use super::animation::{AnimationClip, AnimationPlayer, PlaybackState};
use super::atlas::SpriteAtlas;
use super::buffer::ImageBuffer;
use super::layout::{SheetMetrics, UvTransform};
use super::loader::ImageLoader;

/// Read-only view of a sprite's state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpriteState {
    pub name: String,
    pub metrics: SheetMetrics,
    pub card: CardFrame,
    pub uv: UvTransform,
    pub flip: FlipState,
    pub display_scale: f32,
    pub repeat_x: u32,
    pub repeat_y: u32,
    pub current_frame: usize,
    pub current_cell: Cell,
    pub animation: Option<String>,
    /// Lags a `set_frame` interrupt by one tick; see [`Sprite2D::set_frame`].
    pub playback: PlaybackState,
    pub looping: bool,
    pub playhead: Option<usize>,
    pub layers: Vec<String>,
}

/// A sprite node: one quad whose texture transform selects the visible cell.
///
/// Every change to the frame, flip or repeat state recomputes the UV
/// transform and pushes it to the host.
pub struct Sprite2D<H: SceneHost, S: Scheduler> {
    name: String,
    config: SpriteConfig,
    atlas: SpriteAtlas,
    player: AnimationPlayer,
    flip: FlipState,
    current_frame: usize,
    card: CardFrame,
    uv: UvTransform,
    quad: QuadId,
    host: H,
    scheduler: S,
}

impl<H: SceneHost, S: Scheduler> Sprite2D<H, S> {
    /// Load the base sheet and every configured layer through `loader`.
    ///
    /// Without a configured name the node is named after the base file's stem.
    pub fn new<L: ImageLoader>(
        base_path: &Path,
        config: SpriteConfig,
        loader: &L,
        host: H,
        scheduler: S,
    ) -> Result<Self> {
        config.validate()?;

        let base = loader.load(base_path)?;
        let layers = config
            .layers
            .iter()
            .map(|layer| -> Result<(String, ImageBuffer)> {
                Ok((layer.name.clone(), loader.load(&layer.path)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let suffix = match &config.name {
            Some(name) => name.clone(),
            None => base_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "sprite".to_string()),
        };

        Self::build(suffix, base, layers, config, host, scheduler)
    }

    /// Build from already decoded images. `config.layers` is ignored in
    /// favour of `layers`, which are painted in order.
    pub fn from_images(
        base: ImageBuffer,
        layers: Vec<(String, ImageBuffer)>,
        config: SpriteConfig,
        host: H,
        scheduler: S,
    ) -> Result<Self> {
        config.validate()?;
        let suffix = config.name.clone().unwrap_or_else(|| "sprite".to_string());
        Self::build(suffix, base, layers, config, host, scheduler)
    }

    fn build(
        suffix: String,
        base: ImageBuffer,
        layers: Vec<(String, ImageBuffer)>,
        config: SpriteConfig,
        mut host: H,
        scheduler: S,
    ) -> Result<Self> {
        let mut atlas = SpriteAtlas::from_base(base, config.rows, config.cols)?;
        for (name, image) in layers {
            atlas.add_layer(name, image)?;
        }

        let mut player = AnimationPlayer::new();
        for anim in &config.animations {
            let clip = Self::make_clip(&atlas, anim.cells.clone(), anim.fps)?;
            player.define(anim.name.clone(), clip);
        }

        // Everything fallible is done; only now touch the host.
        let name = format!("Sprite2D:{}", suffix);
        let card = Self::card_for(&config, atlas.metrics());
        let quad = host.create_quad(&Self::quad_desc(&name, &config, card));
        debug!("Created sprite {} ({} layers)", name, atlas.layers().len());

        let mut sprite = Self {
            name,
            config,
            atlas,
            player,
            flip: FlipState::default(),
            current_frame: 0,
            card,
            uv: UvTransform::default(),
            quad,
            host,
            scheduler,
        };
        sprite.upload_texture();
        sprite.apply_uv();
        Ok(sprite)
    }

    fn card_for(config: &SpriteConfig, metrics: &SheetMetrics) -> CardFrame {
        metrics.card_frame(
            config.display_scale(),
            config.repeat_x,
            config.repeat_y,
            config.anchor_x,
            config.anchor_y,
        )
    }

    fn quad_desc(name: &str, config: &SpriteConfig, frame: CardFrame) -> QuadDesc {
        QuadDesc {
            name: name.to_string(),
            frame,
            has_uvs: true,
            two_sided: config.two_sided,
            transparency: config.transparency,
        }
    }

    fn make_clip(atlas: &SpriteAtlas, cells: Vec<usize>, fps: f32) -> Result<AnimationClip> {
        let count = atlas.cells().len();
        if let Some(&index) = cells.iter().find(|&&index| index >= count) {
            return Err(SpriteError::InvalidFrame { index, count });
        }
        AnimationClip::new(cells, fps)
    }

    fn upload_texture(&mut self) {
        let image = self.atlas.final_image();
        let texture = TextureDesc {
            width: image.width(),
            height: image.height(),
            pixels: image.as_raw(),
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
            wrap_u: WrapMode::for_repeat(self.config.repeat_x),
            wrap_v: WrapMode::for_repeat(self.config.repeat_y),
        };
        self.host.set_texture(self.quad, &texture);
    }

    fn apply_uv(&mut self) {
        let cell = self.atlas.cells()[self.current_frame];
        self.uv = self.atlas.metrics().uv_transform(
            cell,
            self.flip,
            self.config.repeat_x,
            self.config.repeat_y,
        );
        self.host.set_tex_scale(self.quad, self.uv.scale);
        self.host.set_tex_offset(self.quad, self.uv.offset);
    }

    /// Replace the base sheet. The new sheet must have the same pixel size.
    pub fn swap_base_sheet<L: ImageLoader>(&mut self, loader: &L, path: &Path) -> Result<()> {
        let image = loader.load(path)?;
        self.swap_base_image(image)
    }

    pub fn swap_base_image(&mut self, image: ImageBuffer) -> Result<()> {
        self.atlas.load_base(image)?;
        self.upload_texture();
        self.apply_uv();
        Ok(())
    }

    /// Load an overlay sheet and paint it over the existing layers.
    pub fn add_layer<L: ImageLoader>(&mut self, loader: &L, name: &str, path: &Path) -> Result<()> {
        let image = loader.load(path)?;
        self.add_layer_image(name, image)
    }

    pub fn add_layer_image(&mut self, name: &str, image: ImageBuffer) -> Result<()> {
        self.atlas.add_layer(name, image)?;
        self.upload_texture();
        self.apply_uv();
        Ok(())
    }

    /// Remove a layer. Returns false, with a warning, if no such layer exists.
    pub fn remove_layer(&mut self, name: &str) -> bool {
        if let Err(err) = self.atlas.remove_layer(name) {
            warn!("Failed to remove layer: {}", err);
            return false;
        }
        self.upload_texture();
        self.apply_uv();
        true
    }

    /// Show cell `index`, interrupting any running animation.
    ///
    /// The interrupt is cooperative: [`SpriteState::playback`] keeps reading
    /// `Playing` until the next scheduled tick observes it and goes `Idle`.
    /// Use [`Sprite2D::stop_animation`] to cancel the schedule at once.
    pub fn set_frame(&mut self, index: usize) -> Result<()> {
        let count = self.atlas.cells().len();
        if index >= count {
            return Err(SpriteError::InvalidFrame { index, count });
        }

        self.player.interrupt();
        self.current_frame = index;
        self.apply_uv();
        Ok(())
    }

    /// Register a named clip of cell indices.
    ///
    /// Redefining the clip that is currently playing interrupts it.
    pub fn define_animation(
        &mut self,
        name: &str,
        cells: Vec<usize>,
        fps: f32,
    ) -> Result<&AnimationClip> {
        let clip = Self::make_clip(&self.atlas, cells, fps)?;
        Ok(self.player.define(name, clip))
    }

    pub fn play_animation(&mut self, name: &str, looping: bool) -> Result<()> {
        let label = format!("{}-animation", self.name);
        self.player.play(name, looping, &mut self.scheduler, &label)
    }

    pub fn stop_animation(&mut self) {
        self.player.stop(&mut self.scheduler);
    }

    /// Handle a scheduler tick for `handle`.
    pub fn tick(&mut self, handle: TaskHandle) -> TickOutcome {
        let tick = self.player.tick(handle);
        if let Some(frame) = tick.frame {
            self.current_frame = frame;
            self.apply_uv();
        }
        tick.outcome
    }

    /// Set the X flip, or toggle it when `value` is `None`. Returns the new state.
    pub fn flip_x(&mut self, value: Option<bool>) -> bool {
        self.flip.x = value.unwrap_or(!self.flip.x);
        self.apply_uv();
        self.flip.x
    }

    /// See [`Sprite2D::flip_x`].
    pub fn flip_y(&mut self, value: Option<bool>) -> bool {
        self.flip.y = value.unwrap_or(!self.flip.y);
        self.apply_uv();
        self.flip.y
    }

    /// Change how often the cell tiles across the card.
    ///
    /// Rebuilds the card, since its extent grows with the repeat count.
    pub fn set_repeat(&mut self, repeat_x: u32, repeat_y: u32) -> Result<()> {
        if repeat_x == 0 || repeat_y == 0 {
            return Err(SpriteError::Config(format!(
                "repeat counts must be at least 1, got {}x{}",
                repeat_x, repeat_y
            )));
        }

        self.config.repeat_x = repeat_x;
        self.config.repeat_y = repeat_y;

        self.host.remove(self.quad);
        self.card = Self::card_for(&self.config, self.atlas.metrics());
        self.quad = self
            .host
            .create_quad(&Self::quad_desc(&self.name, &self.config, self.card));
        self.upload_texture();
        self.apply_uv();
        Ok(())
    }

    pub fn state(&self) -> SpriteState {
        SpriteState {
            name: self.name.clone(),
            metrics: *self.atlas.metrics(),
            card: self.card,
            uv: self.uv,
            flip: self.flip,
            display_scale: self.config.display_scale(),
            repeat_x: self.config.repeat_x,
            repeat_y: self.config.repeat_y,
            current_frame: self.current_frame,
            current_cell: self.atlas.cells()[self.current_frame],
            animation: self.player.current().map(str::to_string),
            playback: self.player.state(),
            looping: self.player.is_looping(),
            playhead: self.player.playhead(),
            layers: self
                .atlas
                .layer_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quad(&self) -> QuadId {
        self.quad
    }

    pub fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Cancel playback and free the quad and texture. Hands back the host
    /// and scheduler.
    pub fn release(mut self) -> (H, S) {
        self.player.stop(&mut self.scheduler);
        self.host.remove(self.quad);
        debug!("Released sprite {}", self.name);
        (self.host, self.scheduler)
    }
}
