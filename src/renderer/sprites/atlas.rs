//! Sprite-sheet atlas: a padded base sheet plus ordered overlay layers.

use tracing::debug;

use crate::core::error::{Result, SpriteError};
use crate::core::types::Cell;

use super::buffer::ImageBuffer;
use super::layout::SheetMetrics;

/// A named overlay the same size as the base sheet.
#[derive(Clone, Debug)]
pub struct Layer {
    pub name: String,
    pub image: ImageBuffer,
}

/// Owns the base sheet, its layers and the composited result.
///
/// Layers are painted in list order, so later layers cover earlier ones.
#[derive(Clone, Debug)]
pub struct SpriteAtlas {
    metrics: SheetMetrics,
    cells: Vec<Cell>,
    /// Base sheet copied into the top-left of a power-of-two canvas.
    padded: ImageBuffer,
    layers: Vec<Layer>,
    /// `padded` with every layer blended on top.
    composited: ImageBuffer,
}

impl SpriteAtlas {
    /// Build an atlas from a base sheet laid out as `rows x cols`.
    pub fn from_base(image: ImageBuffer, rows: u32, cols: u32) -> Result<Self> {
        let (metrics, padded) = Self::prepare_base(image, rows, cols)?;
        let composited = padded.clone();

        Ok(Self {
            cells: Cell::grid(rows, cols),
            metrics,
            padded,
            layers: Vec::new(),
            composited,
        })
    }

    /// Swap in a new base sheet.
    ///
    /// The replacement must match the current sheet's pixel size exactly.
    /// On error the atlas is unchanged.
    pub fn load_base(&mut self, image: ImageBuffer) -> Result<SheetMetrics> {
        let expected = (self.metrics.sheet_width, self.metrics.sheet_height);
        if image.dimensions() != expected {
            return Err(SpriteError::DimensionMismatch {
                expected,
                actual: image.dimensions(),
            });
        }

        let (metrics, padded) = Self::prepare_base(image, self.metrics.rows, self.metrics.cols)?;
        self.cells = Cell::grid(metrics.rows, metrics.cols);
        self.metrics = metrics;
        self.padded = padded;
        self.refresh();

        Ok(metrics)
    }

    fn prepare_base(image: ImageBuffer, rows: u32, cols: u32) -> Result<(SheetMetrics, ImageBuffer)> {
        let (width, height) = image.dimensions();
        let metrics = SheetMetrics::compute(width, height, rows, cols)?;
        let padded = image.padded(metrics.texture_width, metrics.texture_height)?;

        debug!(
            "Loaded {}x{} sheet as {}x{} grid, padded to {}x{}",
            width, height, rows, cols, metrics.texture_width, metrics.texture_height
        );

        Ok((metrics, padded))
    }

    /// Add a layer on top of the existing ones.
    ///
    /// Re-adding an existing name replaces that layer in place. A layer whose
    /// size differs from the base sheet is rejected and nothing changes.
    pub fn add_layer(&mut self, name: impl Into<String>, image: ImageBuffer) -> Result<()> {
        let name = name.into();
        let expected = (self.metrics.sheet_width, self.metrics.sheet_height);
        if image.dimensions() != expected {
            return Err(SpriteError::DimensionMismatch {
                expected,
                actual: image.dimensions(),
            });
        }

        match self.layers.iter_mut().find(|layer| layer.name == name) {
            Some(layer) => layer.image = image,
            None => {
                debug!("Adding sheet layer {:?}", name);
                self.layers.push(Layer { name, image });
            }
        }
        self.refresh();
        Ok(())
    }

    /// Remove a layer by name.
    pub fn remove_layer(&mut self, name: &str) -> Result<Layer> {
        let index = self
            .layers
            .iter()
            .position(|layer| layer.name == name)
            .ok_or_else(|| SpriteError::UnknownLayer(name.to_string()))?;

        let layer = self.layers.remove(index);
        self.refresh();
        Ok(layer)
    }

    /// Blend every layer over the padded base, in order.
    pub fn composite(&self) -> ImageBuffer {
        let mut out = self.padded.clone();
        for layer in &self.layers {
            out.blend_sub_image(&layer.image, 0, 0);
        }
        out
    }

    fn refresh(&mut self) {
        self.composited = self.composite();
    }

    /// The composited texture image, ready for upload.
    pub fn final_image(&self) -> &ImageBuffer {
        &self.composited
    }

    pub fn metrics(&self) -> &SheetMetrics {
        &self.metrics
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name.as_str()).collect()
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.name == name)
    }
}
