//! Animation state machine for sprites.

use std::time::Duration;

use ahash::AHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::error::{Result, SpriteError};
use crate::renderer::host::{Scheduler, TaskHandle, TickOutcome};

/// An ordered run of cell indices played at a fixed rate.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    cells: Vec<usize>,
    fps: f32,
    interval: Duration,
    /// Index into `cells` of the next frame to show.
    pub playhead: usize,
}

impl AnimationClip {
    pub fn new(cells: Vec<usize>, fps: f32) -> Result<Self> {
        if cells.is_empty() {
            return Err(SpriteError::InvalidAnimation(
                "animation has no cells".to_string(),
            ));
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SpriteError::InvalidAnimation(format!(
                "fps must be positive, got {}",
                fps
            )));
        }
        let interval = Duration::try_from_secs_f64(1.0 / f64::from(fps)).map_err(|_| {
            SpriteError::InvalidAnimation(format!("fps {} gives an unrepresentable frame interval", fps))
        })?;

        Ok(Self {
            cells,
            fps,
            interval,
            playhead: 0,
        })
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Time between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Playback states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PlaybackState {
    /// Nothing playing, or playback was interrupted.
    #[default]
    Idle,
    Playing,
    /// A non-looping clip ran to its end.
    Stopped,
}

/// Result of one animation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerTick {
    /// Cell index to display, if the tick advanced.
    pub frame: Option<usize>,
    pub outcome: TickOutcome,
}

impl PlayerTick {
    const fn stop() -> Self {
        Self {
            frame: None,
            outcome: TickOutcome::Stop,
        }
    }
}

/// Holds a sprite's named clips and drives the one currently playing.
///
/// At most one scheduled tick is live at a time: starting playback cancels
/// the previous handle before scheduling a new one, and ticks arriving with
/// any other handle are ignored.
#[derive(Debug, Default)]
pub struct AnimationPlayer {
    clips: AHashMap<String, AnimationClip>,
    current: Option<String>,
    looping: bool,
    interrupted: bool,
    state: PlaybackState,
    handle: Option<TaskHandle>,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip, replacing any clip with the same name.
    pub fn define(&mut self, name: impl Into<String>, clip: AnimationClip) -> &AnimationClip {
        let name = name.into();
        if self.current.as_deref() == Some(name.as_str()) {
            // The running clip's cells are about to change under it.
            self.interrupted = true;
        }
        self.clips.insert(name.clone(), clip);
        &self.clips[&name]
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    /// Start `name` from its first cell.
    ///
    /// An unknown name leaves the current playback untouched.
    pub fn play<S: Scheduler>(
        &mut self,
        name: &str,
        looping: bool,
        scheduler: &mut S,
        label: &str,
    ) -> Result<()> {
        let Some(clip) = self.clips.get_mut(name) else {
            warn!("Failed to play animation: {}; not defined", name);
            return Err(SpriteError::UnknownAnimation(name.to_string()));
        };

        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }

        clip.playhead = 0;
        let interval = clip.interval();

        self.interrupted = false;
        self.looping = looping;
        self.current = Some(name.to_string());
        self.state = PlaybackState::Playing;
        self.handle = Some(scheduler.schedule(interval, label));

        debug!(
            "Playing animation {} ({} cells, looping: {})",
            name,
            self.clips[name].len(),
            looping
        );
        Ok(())
    }

    /// Ask the running clip to halt at its next tick.
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    /// Halt playback now and cancel the scheduled tick.
    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
        self.interrupted = true;
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Idle;
        }
    }

    /// Advance one frame for the tick scheduled as `handle`.
    pub fn tick(&mut self, handle: TaskHandle) -> PlayerTick {
        if self.handle != Some(handle) {
            return PlayerTick::stop();
        }

        if self.interrupted {
            self.finish(PlaybackState::Idle);
            return PlayerTick::stop();
        }

        let Some(clip) = self.current.as_ref().and_then(|name| self.clips.get_mut(name)) else {
            self.finish(PlaybackState::Idle);
            return PlayerTick::stop();
        };

        let frame = clip.cells[clip.playhead];

        if clip.playhead + 1 < clip.cells.len() {
            clip.playhead += 1;
        } else if self.looping {
            clip.playhead = 0;
        } else {
            self.finish(PlaybackState::Stopped);
            return PlayerTick {
                frame: Some(frame),
                outcome: TickOutcome::Stop,
            };
        }

        PlayerTick {
            frame: Some(frame),
            outcome: TickOutcome::Reschedule,
        }
    }

    fn finish(&mut self, state: PlaybackState) {
        self.state = state;
        self.handle = None;
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// The live schedule, if any.
    pub fn handle(&self) -> Option<TaskHandle> {
        self.handle
    }

    /// Playhead of the current clip.
    pub fn playhead(&self) -> Option<usize> {
        self.current
            .as_ref()
            .and_then(|name| self.clips.get(name))
            .map(|clip| clip.playhead)
    }
}
