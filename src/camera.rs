use glam::{Mat4, Vec3};

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Perspective camera looking at a target point.
///
/// `aspect`, `fov`, `near` and `far` are plain fields; call
/// [`PerspectiveCamera::update_projection_matrix`] after changing any of them.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Camera with the viewer's fixed lens for a viewport of the given size
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self::new(
            DEFAULT_FOV_DEGREES,
            aspect_ratio(width, height),
            DEFAULT_NEAR,
            DEFAULT_FAR,
        )
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_camera_uses_fixed_lens() {
        let camera = PerspectiveCamera::for_viewport(800, 600);
        assert_eq!(camera.fov, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_tracks_aspect_after_update() {
        let mut camera = PerspectiveCamera::for_viewport(800, 600);
        let before = camera.projection_matrix();

        camera.aspect = 1.5;
        assert_eq!(camera.projection_matrix(), before, "matrix is cached until refreshed");

        camera.update_projection_matrix();
        let expected = Mat4::perspective_rh(75f32.to_radians(), 1.5, 0.1, 1000.0);
        assert_eq!(camera.projection_matrix(), expected);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut camera = PerspectiveCamera::for_viewport(1200, 800);
        camera.position = Vec3::new(0.0, 0.0, 30.0);
        camera.look_at(Vec3::ZERO);

        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        assert_eq!(aspect_ratio(1200, 800), 1.5);
        assert_eq!(aspect_ratio(10, 0), 10.0);
    }
}
