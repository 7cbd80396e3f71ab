//! Drawing the scene.
//!
//! [`SceneRenderer`] is what the demo runner talks to. [`WgpuRenderer`] is
//! the window-backed implementation; tests substitute a recording renderer.

mod gpu;
mod ui;
mod uniforms;
mod wgpu_renderer;

pub use gpu::GpuContext;
pub use ui::UiOverlay;
pub use uniforms::{FrameUniform, ObjectUniform};
pub use wgpu_renderer::WgpuRenderer;

use crate::camera::PerspectiveCamera;
use crate::geometry::GeometryId;
use crate::scene::Scene;

pub trait SceneRenderer {
    /// Resize the render target. Callers never pass a zero dimension.
    fn resize(&mut self, width: u32, height: u32);

    /// Current render target size in physical pixels
    fn size(&self) -> (u32, u32);

    /// Draw one frame of `scene` as seen from `camera`
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()>;

    /// Release GPU resources held for a geometry that is no longer in use
    fn dispose_geometry(&mut self, id: GeometryId);
}
