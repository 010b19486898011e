//! Sprite-sheet grid math: power-of-two padding, per-cell UVs and card extents.

use glam::Vec2;
use serde::Serialize;

use crate::core::error::{Result, SpriteError};
use crate::core::types::{Cell, FlipState, HorizontalAnchor, VerticalAnchor};
use crate::renderer::host::CardFrame;

/// Derived measurements for a sheet laid out as a `rows x cols` grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SheetMetrics {
    pub rows: u32,
    pub cols: u32,
    /// Source sheet size in pixels.
    pub sheet_width: u32,
    pub sheet_height: u32,
    /// Power-of-two texture size the sheet is padded to.
    pub texture_width: u32,
    pub texture_height: u32,
    /// Cell size in pixels. Fractional if the grid does not divide the sheet.
    pub cell_width: f32,
    pub cell_height: f32,
    /// Fraction of the texture taken by padding on each axis.
    pub u_pad: f32,
    pub v_pad: f32,
    /// UV stride between neighbouring cells.
    pub u_size: f32,
    pub v_size: f32,
}

impl SheetMetrics {
    /// Lay out a `sheet_width x sheet_height` sheet as a `rows x cols` grid.
    pub fn compute(sheet_width: u32, sheet_height: u32, rows: u32, cols: u32) -> Result<Self> {
        if sheet_width == 0 || sheet_height == 0 {
            return Err(SpriteError::InvalidDimension {
                width: sheet_width,
                height: sheet_height,
            });
        }
        if rows == 0 || cols == 0 {
            return Err(SpriteError::InvalidDimension {
                width: cols,
                height: rows,
            });
        }

        let texture_width = next_power_of_two(sheet_width)?;
        let texture_height = next_power_of_two(sheet_height)?;

        let u_pad = (texture_width - sheet_width) as f32 / texture_width as f32;
        let v_pad = (texture_height - sheet_height) as f32 / texture_height as f32;

        Ok(Self {
            rows,
            cols,
            sheet_width,
            sheet_height,
            texture_width,
            texture_height,
            cell_width: sheet_width as f32 / cols as f32,
            cell_height: sheet_height as f32 / rows as f32,
            u_pad,
            v_pad,
            u_size: (1.0 - u_pad) / cols as f32,
            v_size: (1.0 - v_pad) / rows as f32,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// UV extent of one cell in the padded texture.
    pub fn cell_uv_extent(&self) -> Vec2 {
        Vec2::new(
            self.cell_width / self.texture_width as f32,
            self.cell_height / self.texture_height as f32,
        )
    }

    /// Card edges in world units for the given anchors.
    ///
    /// `display_scale` is pixels per world unit; the extent on each axis is
    /// one cell times the repeat count.
    pub fn card_frame(
        &self,
        display_scale: f32,
        repeat_x: u32,
        repeat_y: u32,
        anchor_x: HorizontalAnchor,
        anchor_y: VerticalAnchor,
    ) -> CardFrame {
        let width = self.cell_width / display_scale * repeat_x as f32;
        let height = self.cell_height / display_scale * repeat_y as f32;

        let (left, right) = match anchor_x {
            HorizontalAnchor::Left => (0.0, width),
            HorizontalAnchor::Center => (-width / 2.0, width / 2.0),
            HorizontalAnchor::Right => (-width, 0.0),
        };
        let (bottom, top) = match anchor_y {
            VerticalAnchor::Bottom => (0.0, height),
            VerticalAnchor::Center => (-height / 2.0, height / 2.0),
            VerticalAnchor::Top => (-height, 0.0),
        };

        CardFrame {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Texture scale and offset that show `cell` on the card.
    ///
    /// V runs bottom-up in texture space while rows count top-down, so the
    /// offset is measured down from 1.0. A negative scale mirrors the axis,
    /// which moves the origin to the cell's opposite edge.
    pub fn uv_transform(
        &self,
        cell: Cell,
        flip: FlipState,
        repeat_x: u32,
        repeat_y: u32,
    ) -> UvTransform {
        let extent = self.cell_uv_extent();
        let col = cell.col as f32;
        let row = cell.row as f32;

        let mut scale = Vec2::new(extent.x * repeat_x as f32, extent.y * repeat_y as f32);
        let mut offset = Vec2::new(col * self.u_size, 1.0 - row * self.v_size - extent.y);

        if flip.x {
            scale.x = -scale.x;
            offset.x = self.u_size + col * self.u_size;
        }
        if flip.y {
            scale.y = -scale.y;
            offset.y = 1.0 - row * self.v_size;
        }

        UvTransform { scale, offset }
    }
}

/// Texture-space transform pushed to the host quad.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct UvTransform {
    pub scale: Vec2,
    pub offset: Vec2,
}

/// Smallest power of two `>= n`.
pub fn next_power_of_two(n: u32) -> Result<u32> {
    if n == 0 {
        return Err(SpriteError::InvalidDimension {
            width: n,
            height: n,
        });
    }
    n.checked_next_power_of_two()
        .ok_or(SpriteError::InvalidDimension {
            width: n,
            height: n,
        })
}
