//! Demo configuration: which primitive, material and lights the viewer builds.
//!
//! Both built-in demos are expressed as presets of the same [`DemoConfig`];
//! a JSON file with the same shape can be passed on the command line instead.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{
    BoxShape, CylinderShape, Geometry, CYLINDER_HEIGHT_SEGMENTS, CYLINDER_RADIAL_SEGMENTS,
};
use crate::math::Color;
use crate::scene::{AmbientLight, DirectionalLight, LightRig, Material, MaterialKind, Side};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown preset '{0}' (expected one of: cylinder, textured-box)")]
    UnknownPreset(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Open-ended cylinder with a flat-colored material
    Cylinder,
    /// Lit box with a metal/roughness material and texture maps
    TexturedBox,
}

impl std::str::FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Preset as ValueEnum>::from_str(s, true).map_err(|_| ConfigError::UnknownPreset(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Cylinder,
    Box,
}

impl GeometryKind {
    pub fn label(&self) -> &'static str {
        match self {
            GeometryKind::Cylinder => "Cylinder",
            GeometryKind::Box => "Box",
        }
    }

    /// Build the primitive at the given size with the fixed segment counts
    pub fn build(&self, size: &SizeParams) -> Geometry {
        match self {
            GeometryKind::Cylinder => Geometry::cylinder(CylinderShape {
                radius_top: size.radius,
                radius_bottom: size.radius,
                height: size.height,
                radial_segments: CYLINDER_RADIAL_SEGMENTS,
                height_segments: CYLINDER_HEIGHT_SEGMENTS,
                open_ended: true,
            }),
            GeometryKind::Box => Geometry::cuboid(BoxShape {
                width: size.width,
                height: size.height,
                depth: size.depth,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Primitive dimensions edited from the size controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeParams {
    pub radius: f32,
    pub height: f32,
    pub width: f32,
    pub depth: f32,
}

impl Default for SizeParams {
    fn default() -> Self {
        Self {
            radius: 5.0,
            height: 20.0,
            width: 1.0,
            depth: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub kind: MaterialKind,
    pub color: Color,
    pub wireframe: bool,
    pub side: Side,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Basic,
            color: Color::rgb(0x00, 0x66, 0xff),
            wireframe: false,
            side: Side::Double,
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

impl MaterialConfig {
    pub fn build(&self) -> Material {
        let mut material = match self.kind {
            MaterialKind::Basic => Material::basic(self.color),
            MaterialKind::Standard => Material::standard(self.color, self.metalness, self.roughness),
        };
        material.wireframe = self.wireframe;
        material.side = self.side;
        material
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRigConfig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub directional_color: Color,
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
}

impl Default for LightRigConfig {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: 0.5,
            directional_color: Color::WHITE,
            directional_intensity: 1.0,
            directional_position: [2.0, 2.0, 5.0],
        }
    }
}

impl LightRigConfig {
    pub fn build(&self) -> LightRig {
        LightRig {
            ambient: Some(AmbientLight {
                color: self.ambient_color,
                intensity: self.ambient_intensity,
            }),
            directional: Some(DirectionalLight {
                color: self.directional_color,
                intensity: self.directional_intensity,
                position: Vec3::from_array(self.directional_position),
            }),
        }
    }
}

/// Image files for the material maps, relative to `asset_dir`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub color_map: Option<PathBuf>,
    pub roughness_map: Option<PathBuf>,
    pub metalness_map: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub name: String,
    pub geometry: GeometryKind,
    pub size: SizeParams,
    pub material: MaterialConfig,
    /// Ambient + directional rig; `None` leaves the scene unlit
    pub lights: Option<LightRigConfig>,
    /// Rotation axes exposed on the control panel
    pub rotation_axes: Vec<Axis>,
    pub camera_distance: f32,
    pub damping_factor: f32,
    pub background: Color,
    pub asset_dir: PathBuf,
    pub textures: TextureConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::preset(Preset::Cylinder)
    }
}

impl DemoConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Cylinder => Self {
                name: "Cylinder".to_string(),
                geometry: GeometryKind::Cylinder,
                size: SizeParams::default(),
                material: MaterialConfig::default(),
                lights: None,
                rotation_axes: vec![Axis::X, Axis::Y],
                camera_distance: 30.0,
                damping_factor: 0.05,
                background: Color::BLACK,
                asset_dir: PathBuf::from("assets"),
                textures: TextureConfig::default(),
            },
            Preset::TexturedBox => Self {
                name: "Textured Box".to_string(),
                geometry: GeometryKind::Box,
                size: SizeParams {
                    height: 1.0,
                    ..SizeParams::default()
                },
                material: MaterialConfig {
                    kind: MaterialKind::Standard,
                    color: Color::WHITE,
                    side: Side::Front,
                    metalness: 0.0,
                    roughness: 0.5,
                    ..MaterialConfig::default()
                },
                lights: Some(LightRigConfig::default()),
                rotation_axes: vec![Axis::X, Axis::Y, Axis::Z],
                camera_distance: 5.0,
                damping_factor: 0.05,
                background: Color::BLACK,
                asset_dir: PathBuf::from("assets"),
                textures: TextureConfig {
                    color_map: Some(PathBuf::from("textures/color.jpg")),
                    roughness_map: Some(PathBuf::from("textures/roughness.jpg")),
                    metalness_map: Some(PathBuf::from("textures/metalness.jpg")),
                },
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                })
            }
        };

        match self.geometry {
            GeometryKind::Cylinder => {
                positive("size.radius", self.size.radius)?;
                positive("size.height", self.size.height)?;
            }
            GeometryKind::Box => {
                positive("size.width", self.size.width)?;
                positive("size.height", self.size.height)?;
                positive("size.depth", self.size.depth)?;
            }
        }
        positive("camera_distance", self.camera_distance)?;

        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "damping_factor",
                reason: format!("must be in (0, 1], got {}", self.damping_factor),
            });
        }

        for (field, value) in [
            ("material.metalness", self.material.metalness),
            ("material.roughness", self.material.roughness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be in [0, 1], got {}", value),
                });
            }
        }

        Ok(())
    }

    pub fn exposes(&self, axis: Axis) -> bool {
        self.rotation_axes.contains(&axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_preset_matches_demo() {
        let config = DemoConfig::preset(Preset::Cylinder);
        assert_eq!(config.geometry, GeometryKind::Cylinder);
        assert_eq!(config.size.radius, 5.0);
        assert_eq!(config.size.height, 20.0);
        assert_eq!(config.material.kind, MaterialKind::Basic);
        assert_eq!(config.material.color.to_hex(), "#0066ff");
        assert_eq!(config.material.side, Side::Double);
        assert!(config.lights.is_none());
        assert!(config.exposes(Axis::X) && config.exposes(Axis::Y));
        assert!(!config.exposes(Axis::Z));
        assert_eq!(config.camera_distance, 30.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_textured_box_preset_has_lights_and_maps() {
        let config = DemoConfig::preset(Preset::TexturedBox);
        assert_eq!(config.geometry, GeometryKind::Box);
        assert_eq!(config.material.kind, MaterialKind::Standard);
        assert!(config.lights.is_some());
        assert!(config.textures.color_map.is_some());
        assert!(config.exposes(Axis::Z));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cylinder_build_uses_fixed_segments() {
        let size = SizeParams {
            radius: 8.0,
            height: 30.0,
            ..SizeParams::default()
        };
        let geometry = GeometryKind::Cylinder.build(&size);
        match geometry.shape() {
            crate::geometry::Shape::Cylinder(shape) => {
                assert_eq!(shape.radius_top, 8.0);
                assert_eq!(shape.radius_bottom, 8.0);
                assert_eq!(shape.height, 30.0);
                assert_eq!(shape.radial_segments, 16);
                assert_eq!(shape.height_segments, 1);
                assert!(shape.open_ended);
            }
            other => panic!("expected a cylinder, got {:?}", other),
        }
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("cylinder".parse::<Preset>().unwrap(), Preset::Cylinder);
        assert_eq!("textured-box".parse::<Preset>().unwrap(), Preset::TexturedBox);
        assert!(matches!(
            "sphere".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(name)) if name == "sphere"
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DemoConfig::from_json(
            r##"{ "geometry": "box", "size": { "width": 2.0, "height": 3.0 },
                 "material": { "kind": "standard", "color": "#ff0000", "roughness": 0.25 } }"##,
        )
        .unwrap();
        assert_eq!(config.geometry, GeometryKind::Box);
        assert_eq!(config.size.width, 2.0);
        assert_eq!(config.size.depth, 1.0);
        assert_eq!(config.material.color, Color::rgb(255, 0, 0));
        assert_eq!(config.material.roughness, 0.25);
        assert_eq!(config.camera_distance, 30.0);
    }

    #[test]
    fn test_json_rejects_bad_values() {
        let err = DemoConfig::from_json(r#"{ "size": { "radius": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "size.radius", .. }));

        let err = DemoConfig::from_json(r#"{ "damping_factor": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "damping_factor", .. }));

        let err = DemoConfig::from_json(r#"{ "material": { "color": "blue" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = DemoConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_config_serializes_back_to_json() {
        let config = DemoConfig::preset(Preset::TexturedBox);
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(DemoConfig::from_json(&json).unwrap(), config);
    }
}
