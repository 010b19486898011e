//! Decoded RGBA pixel buffers.

use image::{DynamicImage, Pixel, Rgba, RgbaImage};

use crate::core::error::{Result, SpriteError};

/// Bytes per pixel for RGBA buffers.
const BYTES_PER_PIXEL: usize = 4;

/// A decoded image, always stored as RGBA8.
///
/// `has_alpha` records whether the source carried an alpha channel; images
/// without one are treated as fully opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    pixels: RgbaImage,
    has_alpha: bool,
}

impl ImageBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            has_alpha: true,
        }
    }

    /// A buffer filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(rgba)),
            has_alpha: rgba[3] != u8::MAX,
        }
    }

    /// Wrap raw RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or(SpriteError::InvalidDimension { width, height })?;

        if rgba.len() != expected {
            return Err(SpriteError::DecodeError(format!(
                "buffer size mismatch: expected {} bytes, got {}",
                expected,
                rgba.len()
            )));
        }

        let pixels = RgbaImage::from_raw(width, height, rgba)
            .ok_or(SpriteError::InvalidDimension { width, height })?;

        Ok(Self {
            pixels,
            has_alpha: true,
        })
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        let has_alpha = img.color().has_alpha();
        Self {
            pixels: img.to_rgba8(),
            has_alpha,
        }
    }

    /// Decode an encoded image (PNG etc.) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(img))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.pixels.put_pixel(x, y, Rgba(rgba));
    }

    /// Tightly packed RGBA8 bytes, row by row from the top.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Alpha-composite `src` over this buffer with its top-left corner at `(x, y)`.
    ///
    /// Pixels of `src` falling outside this buffer are clipped.
    pub fn blend_sub_image(&mut self, src: &ImageBuffer, x: u32, y: u32) {
        let (width, height) = self.dimensions();

        for (sx, sy, px) in src.pixels.enumerate_pixels() {
            let (Some(dx), Some(dy)) = (x.checked_add(sx), y.checked_add(sy)) else {
                continue;
            };
            if dx >= width || dy >= height {
                continue;
            }

            // Exact copy for opaque pixels, skip fully transparent ones.
            match px.0[3] {
                0 => {}
                u8::MAX => self.pixels.put_pixel(dx, dy, *px),
                _ => self.pixels.get_pixel_mut(dx, dy).blend(px),
            }
        }
    }

    /// Copy into a larger `width x height` canvas at the top-left origin.
    ///
    /// The extra area is transparent when the source has alpha and opaque
    /// black otherwise.
    pub fn padded(&self, width: u32, height: u32) -> Result<ImageBuffer> {
        let (src_w, src_h) = self.dimensions();
        if width < src_w || height < src_h {
            return Err(SpriteError::DimensionMismatch {
                expected: (src_w, src_h),
                actual: (width, height),
            });
        }

        let mut canvas = if self.has_alpha {
            ImageBuffer::new(width, height)
        } else {
            ImageBuffer::filled(width, height, [0, 0, 0, u8::MAX])
        };
        for (x, y, px) in self.pixels.enumerate_pixels() {
            canvas.pixels.put_pixel(x, y, *px);
        }
        canvas.has_alpha = self.has_alpha;
        Ok(canvas)
    }

}
