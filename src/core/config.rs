//! Sprite configuration with documented constants
//!
//! A `SpriteConfig` describes everything needed to build a sprite besides the
//! base sheet itself. It can be built in code or loaded from TOML/JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SpriteError};
use crate::core::types::{HorizontalAnchor, TransparencyMode, VerticalAnchor};

/// World units per sheet pixel are `1 / (scale * PIXEL_SCALE)`.
///
/// A 100x50 cell with `scale = 2.0` yields a card 10 units wide and 5 high.
pub const PIXEL_SCALE: f32 = 5.0;

/// Playback rate used when an animation entry omits `fps`.
pub const DEFAULT_FPS: f32 = 12.0;

/// An overlay sheet blended on top of the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    pub path: PathBuf,
}

/// A named animation defined up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub name: String,
    /// Indices into the row-major cell list.
    pub cells: Vec<usize>,
    #[serde(default = "default_fps")]
    pub fps: f32,
}

fn default_fps() -> f32 {
    DEFAULT_FPS
}

/// Parse anchor strings up front so a bad value surfaces as
/// [`SpriteError::InvalidAnchor`] instead of a generic parse error.
fn check_anchors(anchor_x: Option<&str>, anchor_y: Option<&str>) -> Result<()> {
    if let Some(anchor) = anchor_x {
        anchor.parse::<HorizontalAnchor>()?;
    }
    if let Some(anchor) = anchor_y {
        anchor.parse::<VerticalAnchor>()?;
    }
    Ok(())
}

/// Configuration for a single sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Node name suffix. Falls back to the base sheet's file stem.
    pub name: Option<String>,

    /// Overlay sheets, composited in list order (later entries paint over earlier ones).
    pub layers: Vec<LayerConfig>,

    /// Grid rows in the sheet
    pub rows: u32,

    /// Grid columns in the sheet
    pub cols: u32,

    /// Display scale, multiplied by [`PIXEL_SCALE`].
    pub scale: f32,

    pub two_sided: bool,

    pub transparency: TransparencyMode,

    /// How many times the cell tiles across the card horizontally.
    ///
    /// Values above 1 switch the texture to repeat wrapping on that axis.
    pub repeat_x: u32,

    /// See `repeat_x`.
    pub repeat_y: u32,

    pub anchor_x: HorizontalAnchor,

    pub anchor_y: VerticalAnchor,

    pub animations: Vec<AnimationConfig>,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            name: None,
            layers: Vec::new(),
            rows: 1,
            cols: 1,
            scale: 1.0,
            two_sided: true,
            transparency: TransparencyMode::Alpha,
            repeat_x: 1,
            repeat_y: 1,
            anchor_x: HorizontalAnchor::Left,
            anchor_y: VerticalAnchor::Bottom,
            animations: Vec::new(),
        }
    }
}

impl SpriteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid dimensions.
    pub fn with_grid(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a layer. Later layers paint over earlier ones.
    pub fn with_layer(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.layers.push(LayerConfig {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn with_animation(mut self, name: impl Into<String>, cells: Vec<usize>, fps: f32) -> Self {
        self.animations.push(AnimationConfig {
            name: name.into(),
            cells,
            fps,
        });
        self
    }

    /// Effective divisor from sheet pixels to world units.
    pub fn display_scale(&self) -> f32 {
        self.scale * PIXEL_SCALE
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SpriteError::InvalidDimension {
                width: self.cols,
                height: self.rows,
            });
        }

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SpriteError::Config(format!(
                "scale must be positive and finite, got {}",
                self.scale
            )));
        }

        if self.repeat_x == 0 || self.repeat_y == 0 {
            return Err(SpriteError::Config(format!(
                "repeat counts must be at least 1, got {}x{}",
                self.repeat_x, self.repeat_y
            )));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if self.layers[..i].iter().any(|l| l.name == layer.name) {
                return Err(SpriteError::Config(format!(
                    "duplicate layer name {:?}",
                    layer.name
                )));
            }
        }

        for anim in &self.animations {
            if !anim.fps.is_finite() || anim.fps <= 0.0 {
                return Err(SpriteError::InvalidAnimation(format!(
                    "{}: fps must be positive, got {}",
                    anim.name, anim.fps
                )));
            }
        }

        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: toml::Value =
            toml::from_str(content).map_err(|e| SpriteError::Config(e.to_string()))?;
        check_anchors(
            value.get("anchor_x").and_then(toml::Value::as_str),
            value.get("anchor_y").and_then(toml::Value::as_str),
        )?;

        let config: SpriteConfig = value
            .try_into()
            .map_err(|e: toml::de::Error| SpriteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| SpriteError::Config(e.to_string()))?;
        check_anchors(
            value.get("anchor_x").and_then(serde_json::Value::as_str),
            value.get("anchor_y").and_then(serde_json::Value::as_str),
        )?;

        let config: SpriteConfig =
            serde_json::from_value(value).map_err(|e| SpriteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(SpriteError::Config(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plain_sprite() {
        let config = SpriteConfig::default();
        assert_eq!(config.rows, 1);
        assert_eq!(config.cols, 1);
        assert_eq!(config.scale, 1.0);
        assert!(config.two_sided);
        assert_eq!(config.transparency, TransparencyMode::Alpha);
        assert_eq!(config.anchor_x, HorizontalAnchor::Left);
        assert_eq!(config.anchor_y, VerticalAnchor::Bottom);
        assert_eq!(config.display_scale(), 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            name = "knight"
            rows = 4
            cols = 8
            scale = 2.0
            transparency = "dual"
            anchor_x = "Center"
            anchor_y = "bottom"

            [[layers]]
            name = "armor"
            path = "knight_armor.png"

            [[layers]]
            name = "helmet"
            path = "knight_helmet.png"

            [[animations]]
            name = "walk"
            cells = [0, 1, 2, 3]
            fps = 8.0

            [[animations]]
            name = "idle"
            cells = [4, 5]
        "#;

        let config = SpriteConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.name.as_deref(), Some("knight"));
        assert_eq!(config.rows, 4);
        assert_eq!(config.cols, 8);
        assert_eq!(config.transparency, TransparencyMode::Dual);
        assert_eq!(config.anchor_x, HorizontalAnchor::Center);
        assert_eq!(config.layers.len(), 2);
        assert_eq!(config.layers[0].name, "armor");
        assert_eq!(config.layers[1].name, "helmet");
        assert_eq!(config.animations[0].fps, 8.0);
        assert_eq!(config.animations[1].fps, DEFAULT_FPS);
        // Unspecified fields keep their defaults
        assert_eq!(config.repeat_x, 1);
        assert!(config.two_sided);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{ "rows": 2, "cols": 2, "anchor_y": "top" }"#;
        let config = SpriteConfig::from_json_str(json).unwrap();
        assert_eq!(config.rows, 2);
        assert_eq!(config.anchor_y, VerticalAnchor::Top);
    }

    #[test]
    fn test_bad_anchor_is_rejected() {
        let result = SpriteConfig::from_toml_str(r#"anchor_x = "middle""#);
        assert!(matches!(result, Err(SpriteError::InvalidAnchor(ref a)) if a == "middle"));

        let result = SpriteConfig::from_json_str(r#"{ "anchor_y": "upward" }"#);
        assert!(matches!(result, Err(SpriteError::InvalidAnchor(ref a)) if a == "upward"));
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        assert!(matches!(
            SpriteConfig::from_toml_str("rows = "),
            Err(SpriteError::Config(_))
        ));
        assert!(matches!(
            SpriteConfig::from_json_str(r#"{ "rows": "two" }"#),
            Err(SpriteError::Config(_))
        ));
    }

    #[test]
    fn test_zero_grid_is_invalid() {
        let config = SpriteConfig::new().with_grid(0, 4);
        assert!(matches!(
            config.validate(),
            Err(SpriteError::InvalidDimension { width: 4, height: 0 })
        ));
    }

    #[test]
    fn test_zero_repeat_is_invalid() {
        let config = SpriteConfig {
            repeat_y: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SpriteError::Config(_))));
    }

    #[test]
    fn test_duplicate_layers_rejected() {
        let config = SpriteConfig::new()
            .with_layer("hat", "a.png")
            .with_layer("hat", "b.png");
        assert!(matches!(config.validate(), Err(SpriteError::Config(_))));
    }

    #[test]
    fn test_non_positive_fps_rejected() {
        let config = SpriteConfig::new().with_animation("walk", vec![0], 0.0);
        assert!(matches!(
            config.validate(),
            Err(SpriteError::InvalidAnimation(_))
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.toml");
        fs::write(&path, "rows = 3\ncols = 5\n").unwrap();

        let config = SpriteConfig::load(&path).unwrap();
        assert_eq!((config.rows, config.cols), (3, 5));

        let bogus = dir.path().join("hero.yaml");
        fs::write(&bogus, "rows: 3").unwrap();
        assert!(matches!(SpriteConfig::load(&bogus), Err(SpriteError::Config(_))));
    }
}
