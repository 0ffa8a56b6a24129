// Asset management system
//
// Provides loading of sprite sheets and typed handles to textures and sounds.

mod handle;
mod loader;
mod sprite_sheet;

pub use handle::{AssetHandle, AssetId, SoundAsset, SoundHandle, TextureAsset, TextureHandle};
pub use loader::{AssetLoader, AssetType};
pub use sprite_sheet::{CellRegion, SpriteSheet};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error(
        "Frame size {frame_width}x{frame_height} does not fit a {sheet_width}x{sheet_height} sheet"
    )]
    InvalidFrameSize {
        frame_width: u32,
        frame_height: u32,
        sheet_width: u32,
        sheet_height: u32,
    },

    #[error("Sheet holds {capacity} frames, {requested} requested")]
    FrameCountOutOfRange { requested: usize, capacity: usize },

    /// A cell produced no collision geometry; the frame's hitbox stays empty
    #[error("Frame {frame} of '{sheet}' has no opaque pixels")]
    EmptyGeometry { sheet: String, frame: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
