// Sprite sheets split into a uniform grid of animation cells

use super::{AssetError, TextureHandle};
use glam::Vec2;
use image::{imageops, RgbaImage};
use std::sync::Arc;

/// The source rectangle of one cell, in pixels and normalized UVs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRegion {
    /// Position in the sheet (pixels)
    pub x: u32,
    pub y: u32,

    /// Size of the cell (pixels)
    pub width: u32,
    pub height: u32,

    /// UV coordinates (0.0 to 1.0)
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

impl CellRegion {
    /// Create a new region with calculated UV coordinates
    pub fn new(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        sheet_width: u32,
        sheet_height: u32,
    ) -> Self {
        let uv_min = Vec2::new(
            x as f32 / sheet_width as f32,
            y as f32 / sheet_height as f32,
        );
        let uv_max = Vec2::new(
            (x + width) as f32 / sheet_width as f32,
            (y + height) as f32 / sheet_height as f32,
        );

        Self {
            x,
            y,
            width,
            height,
            uv_min,
            uv_max,
        }
    }
}

/// A decoded RGBA sprite sheet laid out as a row-major grid of equal cells
///
/// The pixel data is shared, so cloning a sheet is cheap.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    texture: TextureHandle,
    pixels: Arc<RgbaImage>,
    frame_width: u32,
    frame_height: u32,
    columns: u32,
    frame_count: usize,
}

impl SpriteSheet {
    /// Wrap an already decoded image
    ///
    /// Every full cell in the grid counts as a frame unless `frame_count`
    /// limits it.
    pub fn new(
        texture: TextureHandle,
        pixels: RgbaImage,
        frame_width: u32,
        frame_height: u32,
        frame_count: Option<usize>,
    ) -> Result<Self, AssetError> {
        if frame_width == 0
            || frame_height == 0
            || pixels.width() < frame_width
            || pixels.height() < frame_height
        {
            return Err(AssetError::InvalidFrameSize {
                frame_width,
                frame_height,
                sheet_width: pixels.width(),
                sheet_height: pixels.height(),
            });
        }

        let columns = pixels.width() / frame_width;
        let rows = pixels.height() / frame_height;
        let capacity = (columns * rows) as usize;
        let frame_count = frame_count.unwrap_or(capacity);
        if frame_count == 0 || frame_count > capacity {
            return Err(AssetError::FrameCountOutOfRange {
                requested: frame_count,
                capacity,
            });
        }

        Ok(Self {
            texture,
            pixels: Arc::new(pixels),
            frame_width,
            frame_height,
            columns,
            frame_count,
        })
    }

    /// Decode a sheet from encoded image bytes (PNG/JPEG)
    pub fn from_bytes(
        texture: TextureHandle,
        bytes: &[u8],
        frame_width: u32,
        frame_height: u32,
        frame_count: Option<usize>,
    ) -> Result<Self, AssetError> {
        let pixels = image::load_from_memory(bytes)
            .map_err(|e| AssetError::LoadError(format!("Failed to decode sprite sheet: {}", e)))?
            .to_rgba8();
        Self::new(texture, pixels, frame_width, frame_height, frame_count)
    }

    /// Handle of the texture the renderer draws this sheet from
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Number of animation frames in the sheet
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Size of one cell in pixels
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    /// Source rectangle of a frame; out-of-range indices clamp to the last frame
    pub fn region(&self, frame: usize) -> CellRegion {
        let frame = frame.min(self.frame_count - 1) as u32;
        let col = frame % self.columns;
        let row = frame / self.columns;

        CellRegion::new(
            col * self.frame_width,
            row * self.frame_height,
            self.frame_width,
            self.frame_height,
            self.pixels.width(),
            self.pixels.height(),
        )
    }

    /// Copy out the pixels of one cell
    pub fn cell(&self, frame: usize) -> RgbaImage {
        let region = self.region(frame);
        imageops::crop_imm(
            self.pixels.as_ref(),
            region.x,
            region.y,
            region.width,
            region.height,
        )
        .to_image()
    }

    /// Iterate over every cell in frame order
    pub fn cells(&self) -> impl Iterator<Item = RgbaImage> + '_ {
        (0..self.frame_count).map(move |frame| self.cell(frame))
    }
}
