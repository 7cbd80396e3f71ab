use std::collections::HashSet;

use mesh_viewer::camera::PerspectiveCamera;
use mesh_viewer::geometry::GeometryId;
use mesh_viewer::scene::Scene;
use mesh_viewer::SceneRenderer;

/// What the mock saw in one render call
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub drawn: Vec<GeometryId>,
    pub aspect: f32,
    pub size: (u32, u32),
}

/// Renderer that records calls instead of touching a GPU
#[derive(Debug, Default)]
pub struct MockRenderer {
    pub size: (u32, u32),
    pub frames: Vec<RenderedFrame>,
    pub disposed: Vec<GeometryId>,
    pub resident: HashSet<GeometryId>,
}

impl MockRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> &RenderedFrame {
        self.frames.last().expect("no frame rendered")
    }
}

impl SceneRenderer for MockRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()> {
        let drawn: Vec<_> = scene.draw_list().iter().map(|item| item.geometry.id()).collect();
        for id in &drawn {
            assert!(
                !self.disposed.contains(id),
                "rendered a geometry that was already disposed"
            );
            self.resident.insert(*id);
        }
        self.frames.push(RenderedFrame {
            drawn,
            aspect: camera.aspect,
            size: self.size,
        });
        Ok(())
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        self.resident.remove(&id);
        self.disposed.push(id);
    }
}
