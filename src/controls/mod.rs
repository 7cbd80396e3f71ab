//! Orbit-style camera controls with damping.
//!
//! Dragging with the primary button orbits the camera around a target and
//! dragging with the secondary button pans the target across the view plane.
//! The wheel dollies in and out. With damping enabled the accumulated rotation
//! and pan are applied a fraction at a time over the following frames, so
//! motion eases out after the pointer stops.

mod input;

pub use input::{PointerButton, PointerInput};

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;
const MIN_POLAR: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SphericalDelta {
    theta: f32,
    phi: f32,
}

/// Orbit controller; call [`OrbitControls::update`] once per frame
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta: SphericalDelta,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta: SphericalDelta::default(),
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor;
        self
    }

    /// Orbit around the vertical axis; positive swings the camera left
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    /// Orbit over the target; positive swings the camera up
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// Move the target against the camera's right vector
    pub fn pan_left(&mut self, distance: f32, camera: &PerspectiveCamera) {
        self.pan_offset -= camera_right(camera) * distance;
    }

    /// Move the target along the camera's up vector
    pub fn pan_up(&mut self, distance: f32, camera: &PerspectiveCamera) {
        let up = camera_right(camera).cross(camera.forward());
        self.pan_offset += up * distance;
    }

    /// Scale the distance to the target by `factor` (< 1 moves closer)
    pub fn dolly_in(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale *= factor;
        }
    }

    pub fn dolly_out(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale /= factor;
        }
    }

    /// Turn drag and wheel input into pending rotation, pan and zoom
    pub fn apply_input(
        &mut self,
        input: &mut PointerInput,
        camera: &PerspectiveCamera,
        viewport_height: u32,
    ) {
        let height = viewport_height.max(1) as f32;

        let (dx, dy) = input.take_drag();
        if dx != 0.0 || dy != 0.0 {
            self.rotate_left(TAU * dx / height * self.rotate_speed);
            self.rotate_up(TAU * dy / height * self.rotate_speed);
        }

        let (px, py) = input.take_pan();
        if px != 0.0 || py != 0.0 {
            // Half the visible height at the target's depth spans half the viewport
            let half_fov = (camera.fov * 0.5).to_radians();
            let visible = (camera.position - self.target).length() * half_fov.tan();
            self.pan_left(2.0 * px * visible / height * self.pan_speed, camera);
            self.pan_up(2.0 * py * visible / height * self.pan_speed, camera);
        }

        let notches = input.take_scroll();
        if notches != 0.0 {
            let factor = self.zoom_scale().powf(notches.abs());
            if notches > 0.0 {
                self.dolly_in(factor);
            } else {
                self.dolly_out(factor);
            }
        }
    }

    /// Whether any rotation or pan is still being eased in
    pub fn is_settling(&self) -> bool {
        self.delta.theta.abs() > EPS
            || self.delta.phi.abs() > EPS
            || self.pan_offset.length_squared() > EPS * EPS
    }

    /// Apply pending motion to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;
        let offset = camera.position - self.target;

        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > EPS {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        if self.enable_damping {
            theta += self.delta.theta * self.damping_factor;
            phi += self.delta.phi * self.damping_factor;
        } else {
            theta += self.delta.theta;
            phi += self.delta.phi;
        }

        phi = phi.clamp(MIN_POLAR, PI - MIN_POLAR);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + offset;
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta = SphericalDelta::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(before) > EPS
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }
}

fn camera_right(camera: &PerspectiveCamera) -> Vec3 {
    camera.forward().cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X)
}
