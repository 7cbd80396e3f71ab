//! Texture decoding for material maps.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

/// Decoded RGBA8 image ready for upload
#[derive(Debug)]
pub struct TextureData {
    id: TextureId,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            id: TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            pixels,
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }
}

/// Loads image files relative to an asset directory
#[derive(Debug, Clone)]
pub struct TextureLoader {
    base_dir: PathBuf,
}

impl TextureLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn load(&self, path: &Path) -> Result<TextureData> {
        let full_path = self.resolve(path);
        let img = image::open(&full_path)
            .with_context(|| format!("Failed to load texture: {}", full_path.display()))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(TextureData::new(width, height, rgba.into_raw()))
    }

    /// Load a map, leaving the slot empty when the file is missing or unreadable
    pub fn load_or_missing(&self, path: &Path) -> Option<Arc<TextureData>> {
        match self.load(path) {
            Ok(texture) => {
                log::info!(
                    "Loaded texture {} ({}x{})",
                    path.display(),
                    texture.width,
                    texture.height
                );
                Some(Arc::new(texture))
            }
            Err(e) => {
                log::warn!("{:#}", e);
                None
            }
        }
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mesh-viewer-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_png() {
        let dir = scratch_dir("texture-load");
        let mut img = image::RgbaImage::new(4, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.save(dir.join("red.png")).unwrap();

        let loader = TextureLoader::new(&dir);
        let texture = loader.load(Path::new("red.png")).unwrap();
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.pixels.len(), 4 * 2 * 4);
        assert_eq!(&texture.pixels[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_file_leaves_slot_empty() {
        let loader = TextureLoader::new(scratch_dir("texture-missing"));
        assert!(loader.load(Path::new("nope.png")).is_err());
        assert!(loader.load_or_missing(Path::new("nope.png")).is_none());
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let loader = TextureLoader::new("assets");
        let abs = std::env::temp_dir().join("x.png");
        assert_eq!(loader.resolve(&abs), abs);
        assert_eq!(loader.resolve(Path::new("x.png")), PathBuf::from("assets").join("x.png"));
    }

    #[test]
    fn test_texture_ids_are_unique() {
        let a = TextureData::new(1, 1, vec![0; 4]);
        let b = TextureData::new(1, 1, vec![0; 4]);
        assert_ne!(a.id(), b.id());
    }
}
