use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::Geometry;

use super::material::Material;

/// A geometry paired with a material, plus its transform and visibility
#[derive(Debug)]
pub struct Mesh {
    geometry: Geometry,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
    pub visible: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            visible: true,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Swap in a new geometry and hand back the previous one so its GPU
    /// resources can be released by the caller.
    #[must_use = "the previous geometry must be disposed"]
    pub fn replace_geometry(&mut self, geometry: Geometry) -> Geometry {
        std::mem::replace(&mut self.geometry, geometry)
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_rotation_translation(rotation, self.position)
    }
}
