use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::math::Color;
use crate::texture::TextureData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Flat, unlit color
    Basic,
    /// Lit by the light rig with metalness/roughness
    Standard,
}

/// Which faces are rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Front,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapSlot {
    Color,
    Roughness,
    Metalness,
}

impl MapSlot {
    pub fn label(&self) -> &'static str {
        match self {
            MapSlot::Color => "Color Map",
            MapSlot::Roughness => "Roughness Map",
            MapSlot::Metalness => "Metalness Map",
        }
    }
}

/// A material map: where it came from, the decoded image if loading
/// succeeded, and whether shading should sample it.
#[derive(Debug, Clone, Default)]
pub struct TextureSlot {
    pub source: Option<PathBuf>,
    pub texture: Option<Arc<TextureData>>,
    pub enabled: bool,
}

impl TextureSlot {
    pub fn loaded(source: PathBuf, texture: Option<Arc<TextureData>>) -> Self {
        let enabled = texture.is_some();
        Self {
            source: Some(source),
            texture,
            enabled,
        }
    }

    /// Texture to sample, if any
    pub fn active(&self) -> Option<&Arc<TextureData>> {
        self.texture.as_ref().filter(|_| self.enabled)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextureMaps {
    pub color: TextureSlot,
    pub roughness: TextureSlot,
    pub metalness: TextureSlot,
}

impl TextureMaps {
    pub fn slot(&self, slot: MapSlot) -> &TextureSlot {
        match slot {
            MapSlot::Color => &self.color,
            MapSlot::Roughness => &self.roughness,
            MapSlot::Metalness => &self.metalness,
        }
    }

    pub fn slot_mut(&mut self, slot: MapSlot) -> &mut TextureSlot {
        match slot {
            MapSlot::Color => &mut self.color,
            MapSlot::Roughness => &mut self.roughness,
            MapSlot::Metalness => &mut self.metalness,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub wireframe: bool,
    pub side: Side,
    pub metalness: f32,
    pub roughness: f32,
    pub maps: TextureMaps,
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color,
            wireframe: false,
            side: Side::Front,
            metalness: 0.0,
            roughness: 1.0,
            maps: TextureMaps::default(),
        }
    }

    pub fn standard(color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            kind: MaterialKind::Standard,
            color,
            wireframe: false,
            side: Side::Front,
            metalness,
            roughness,
            maps: TextureMaps::default(),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.kind == MaterialKind::Standard
    }
}
