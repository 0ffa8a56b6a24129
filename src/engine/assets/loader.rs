// Asset loading functionality

use super::{AssetError, SoundHandle, SpriteSheet, TextureHandle};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Texture,
    Sound,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Texture => "textures",
            AssetType::Sound => "sounds",
        }
    }

    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Texture => &["png", "jpg", "jpeg"],
            AssetType::Sound => &["wav", "ogg", "mp3"],
        }
    }
}

/// Asset loader responsible for finding and loading asset files
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, asset_type: AssetType, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve_path(asset_type, name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }

        std::fs::read(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", name, e)).into())
    }

    /// Load and decode a sprite sheet laid out as a grid of `frame_width` x `frame_height` cells
    pub fn load_sprite_sheet(
        &self,
        name: &str,
        frame_width: u32,
        frame_height: u32,
        frame_count: Option<usize>,
    ) -> Result<SpriteSheet> {
        let bytes = self.load_bytes(AssetType::Texture, name)?;
        let sheet = SpriteSheet::from_bytes(
            TextureHandle::named(name),
            &bytes,
            frame_width,
            frame_height,
            frame_count,
        )?;
        log::debug!("Loaded sprite sheet '{}' ({} frames)", name, sheet.frame_count());
        Ok(sheet)
    }

    /// Handles for every sound whose file name starts with `prefix`, sorted by name
    ///
    /// Variants such as `punch_1.wav`, `punch_2.wav` form one sound set.
    pub fn sound_variants(&self, prefix: &str) -> Result<Vec<SoundHandle>> {
        let mut names: Vec<String> = self
            .list_assets(AssetType::Sound)?
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort();

        Ok(names.iter().map(|name| SoundHandle::named(name)).collect())
    }

    /// List all assets of a given type
    pub fn list_assets(&self, asset_type: AssetType) -> Result<Vec<String>> {
        let dir = self.base_path.join(asset_type.default_directory());

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        let extensions = asset_type.extensions();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let known = path
                .extension()
                .map_or(false, |ext| extensions.contains(&ext.to_string_lossy().as_ref()));
            if let (true, Some(name)) = (known, path.file_name()) {
                assets.push(name.to_string_lossy().to_string());
            }
        }

        Ok(assets)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_directories() {
        assert_eq!(AssetType::Texture.default_directory(), "textures");
        assert_eq!(AssetType::Sound.default_directory(), "sounds");
    }

    #[test]
    fn test_asset_type_extensions() {
        assert!(AssetType::Texture.extensions().contains(&"png"));
        assert!(AssetType::Sound.extensions().contains(&"wav"));
    }

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/game/assets");
        let path = loader.resolve_path(AssetType::Texture, "blob_idle.png");

        assert_eq!(path, PathBuf::from("/game/assets/textures/blob_idle.png"));
    }

    #[test]
    fn test_missing_sheet_is_not_found() {
        let loader = AssetLoader::new("/definitely/not/here");
        let err = loader.load_sprite_sheet("ghost.png", 32, 32, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssetError>(),
            Some(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_sound_variants_without_directory() {
        let loader = AssetLoader::new("/definitely/not/here");
        assert!(loader.sound_variants("punch").unwrap().is_empty());
    }
}
