//! Scene graph: one mesh, its material and an optional light rig.

mod light;
mod material;
mod mesh;

pub use light::{AmbientLight, DirectionalLight, LightRig};
pub use material::{MapSlot, Material, MaterialKind, Side, TextureMaps, TextureSlot};
pub use mesh::Mesh;

use glam::Mat4;

use crate::geometry::Geometry;
use crate::math::Color;

pub struct Scene {
    pub mesh: Mesh,
    pub lights: LightRig,
    pub background: Color,
}

/// One mesh submitted to a render pass
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub geometry: &'a Geometry,
    pub material: &'a Material,
    pub model: Mat4,
}

impl Scene {
    pub fn new(mesh: Mesh, lights: LightRig) -> Self {
        Self {
            mesh,
            lights,
            background: Color::BLACK,
        }
    }

    /// Meshes that take part in the next render pass
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        if !self.mesh.visible {
            return Vec::new();
        }

        vec![DrawItem {
            geometry: self.mesh.geometry(),
            material: &self.mesh.material,
            model: self.mesh.model_matrix(),
        }]
    }
}
