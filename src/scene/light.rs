use glam::Vec3;

use crate::math::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Light arriving from `position` towards the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface towards the light
    pub fn direction(&self) -> Vec3 {
        self.position.try_normalize().unwrap_or(Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightRig {
    pub ambient: Option<AmbientLight>,
    pub directional: Option<DirectionalLight>,
}

impl LightRig {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ambient.is_none() && self.directional.is_none()
    }

    /// Linear ambient radiance
    pub fn ambient_radiance(&self) -> [f32; 3] {
        self.ambient
            .map(|a| scale(a.color.to_linear(), a.intensity))
            .unwrap_or([0.0; 3])
    }

    /// Linear directional radiance
    pub fn directional_radiance(&self) -> [f32; 3] {
        self.directional
            .map(|d| scale(d.color.to_linear(), d.intensity))
            .unwrap_or([0.0; 3])
    }
}

fn scale(rgb: [f32; 3], k: f32) -> [f32; 3] {
    [rgb[0] * k, rgb[1] * k, rgb[2] * k]
}
