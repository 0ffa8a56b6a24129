// Draw submission seam
//
// Rendering lives outside the move engine. Characters describe what to draw
// for the current tick as `SpriteDraw` commands and hand them to whatever
// implements `SpriteCanvas`.

use crate::engine::assets::{CellRegion, TextureHandle};
use glam::Vec2;

/// One sprite cell to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    /// Sheet texture the cell comes from
    pub texture: TextureHandle,
    /// Source rectangle within the sheet
    pub region: CellRegion,
    /// Center of the sprite in world space
    pub position: Vec2,
    /// Size in world units
    pub size: Vec2,
    /// Whether the sprite should be mirrored horizontally
    pub flip_horizontal: bool,
}

/// Anything that can accept sprite draw commands
pub trait SpriteCanvas {
    fn draw_sprite(&mut self, sprite: SpriteDraw);
}

/// Canvas that records draw commands, used by headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub sprites: Vec<SpriteDraw>,
}

impl SpriteCanvas for RecordingCanvas {
    fn draw_sprite(&mut self, sprite: SpriteDraw) {
        self.sprites.push(sprite);
    }
}
