use glam::{Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::scene::{LightRig, MapSlot, Material};

/// Per-frame camera and lighting data, bind group 0
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub _pad0: f32,
    pub ambient: [f32; 3],
    pub _pad1: f32,
    pub light_color: [f32; 3],
    pub _pad2: f32,
    /// Unit vector pointing towards the light; w is 1 when the light exists
    pub light_direction: [f32; 4],
}

impl FrameUniform {
    pub fn new(camera: &PerspectiveCamera, lights: &LightRig) -> Self {
        let (light_color, light_direction) = match &lights.directional {
            Some(light) => (lights.directional_radiance(), light.direction().extend(1.0)),
            None => ([0.0; 3], Vec3::Y.extend(0.0)),
        };

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.to_array(),
            _pad0: 0.0,
            ambient: lights.ambient_radiance(),
            _pad1: 0.0,
            light_color,
            _pad2: 0.0,
            light_direction: light_direction.to_array(),
        }
    }
}

/// Per-mesh transform and material data, bind group 1
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear base color, alpha 1
    pub color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    /// 1 for lit materials, 0 for unlit
    pub lit: f32,
    pub _pad0: f32,
    /// 1 per enabled map: color, roughness, metalness
    pub maps: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, material: &Material) -> Self {
        let normal_matrix = model.inverse().transpose();
        let [r, g, b] = material.color.to_linear();
        let enabled = |slot| if material.maps.slot(slot).active().is_some() { 1.0 } else { 0.0 };

        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color: [r, g, b, 1.0],
            metalness: material.metalness,
            roughness: material.roughness,
            lit: if material.is_lit() { 1.0 } else { 0.0 },
            _pad0: 0.0,
            maps: [
                enabled(MapSlot::Color),
                enabled(MapSlot::Roughness),
                enabled(MapSlot::Metalness),
                0.0,
            ],
        }
    }
}
