// Typed handles to textures and sounds owned by external collaborators

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Stable identifier derived from an asset path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(u64);

impl AssetId {
    /// Hash an asset path into an ID; equal paths give equal IDs
    pub fn from_path(path: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Handle to an asset the engine references but does not own
///
/// The renderer and the audio device resolve handles to their own
/// resources; the move engine only passes them along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle<T> {
    id: AssetId,
    _kind: PhantomData<T>,
}

impl<T> AssetHandle<T> {
    pub fn new(id: AssetId) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    /// Handle for the asset stored under `path`
    pub fn named(path: &str) -> Self {
        Self::new(AssetId::from_path(path))
    }

    pub fn id(&self) -> AssetId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureAsset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundAsset;

pub type TextureHandle = AssetHandle<TextureAsset>;
pub type SoundHandle = AssetHandle<SoundAsset>;
