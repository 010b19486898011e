//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::SpriteError;

/// One grid position within a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
}

impl Cell {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Every cell of a `rows x cols` grid in row-major order.
    pub fn grid(rows: u32, cols: u32) -> Vec<Cell> {
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(col, row)))
            .collect()
    }
}

/// Where the card's origin sits along the X axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HorizontalAnchor {
    #[default]
    Left,
    Center,
    Right,
}

/// Where the card's origin sits along the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VerticalAnchor {
    #[default]
    Bottom,
    Center,
    Top,
}

impl FromStr for HorizontalAnchor {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(SpriteError::InvalidAnchor(s.to_string())),
        }
    }
}

impl FromStr for VerticalAnchor {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bottom" => Ok(Self::Bottom),
            "center" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            _ => Err(SpriteError::InvalidAnchor(s.to_string())),
        }
    }
}

impl TryFrom<String> for HorizontalAnchor {
    type Error = SpriteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for VerticalAnchor {
    type Error = SpriteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for HorizontalAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

impl fmt::Display for VerticalAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bottom => "bottom",
            Self::Center => "center",
            Self::Top => "top",
        };
        f.write_str(name)
    }
}

impl From<HorizontalAnchor> for String {
    fn from(anchor: HorizontalAnchor) -> Self {
        anchor.to_string()
    }
}

impl From<VerticalAnchor> for String {
    fn from(anchor: VerticalAnchor) -> Self {
        anchor.to_string()
    }
}

/// How the host blends the card with what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransparencyMode {
    None,
    #[default]
    Alpha,
    Dual,
}

/// Mirroring applied through the UV transform only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FlipState {
    pub x: bool,
    pub y: bool,
}
