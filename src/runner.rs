//! The demo runner: owns the scene, camera and panel, and drives one frame
//! at a time against a [`SceneRenderer`].

use glam::Vec3;
use winit::event::WindowEvent;

use crate::camera::{aspect_ratio, PerspectiveCamera};
use crate::config::{Axis, DemoConfig, GeometryKind, SizeParams};
use crate::controls::{OrbitControls, PointerInput};
use crate::frame::FrameIterator;
use crate::panel::{
    Bindable, ControlPanel, Effect, Field, PanelError, PanelStats, SizeField, Value,
};
use crate::renderer::SceneRenderer;
use crate::scene::{MapSlot, Mesh, Scene, TextureSlot};
use crate::texture::TextureLoader;

/// Geometry lifecycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryStats {
    pub created: u64,
    pub disposed: u64,
}

impl GeometryStats {
    pub fn live(&self) -> u64 {
        self.created - self.disposed
    }
}

/// Everything the control panel can edit
pub struct DemoState {
    pub scene: Scene,
    pub size: SizeParams,
    kind: GeometryKind,
}

impl DemoState {
    fn size_value(&mut self, field: SizeField) -> &mut f32 {
        match field {
            SizeField::Radius => &mut self.size.radius,
            SizeField::Height => &mut self.size.height,
            SizeField::Width => &mut self.size.width,
            SizeField::Depth => &mut self.size.depth,
        }
    }
}

impl Bindable for DemoState {
    fn read(&self, field: Field) -> Option<Value> {
        let mesh = &self.scene.mesh;
        let value = match field {
            Field::Rotation(Axis::X) => Value::Number(mesh.rotation.x),
            Field::Rotation(Axis::Y) => Value::Number(mesh.rotation.y),
            Field::Rotation(Axis::Z) => Value::Number(mesh.rotation.z),
            Field::Visible => Value::Toggle(mesh.visible),
            Field::Color => Value::Color(mesh.material.color),
            Field::Wireframe => Value::Toggle(mesh.material.wireframe),
            Field::Metalness => Value::Number(mesh.material.metalness),
            Field::Roughness => Value::Number(mesh.material.roughness),
            Field::MapEnabled(slot) => {
                let slot = mesh.material.maps.slot(slot);
                slot.texture.as_ref()?;
                Value::Toggle(slot.enabled)
            }
            Field::Size(SizeField::Radius) => Value::Number(self.size.radius),
            Field::Size(SizeField::Height) => Value::Number(self.size.height),
            Field::Size(SizeField::Width) => Value::Number(self.size.width),
            Field::Size(SizeField::Depth) => Value::Number(self.size.depth),
        };
        Some(value)
    }

    fn write(&mut self, field: Field, value: Value) -> Effect {
        let mesh = &mut self.scene.mesh;
        match (field, value) {
            (Field::Rotation(Axis::X), Value::Number(v)) => mesh.rotation.x = v,
            (Field::Rotation(Axis::Y), Value::Number(v)) => mesh.rotation.y = v,
            (Field::Rotation(Axis::Z), Value::Number(v)) => mesh.rotation.z = v,
            (Field::Visible, Value::Toggle(on)) => mesh.visible = on,
            (Field::Color, Value::Color(color)) => mesh.material.color = color,
            (Field::Wireframe, Value::Toggle(on)) => mesh.material.wireframe = on,
            (Field::Metalness, Value::Number(v)) => mesh.material.metalness = v,
            (Field::Roughness, Value::Number(v)) => mesh.material.roughness = v,
            (Field::MapEnabled(slot), Value::Toggle(on)) => {
                mesh.material.maps.slot_mut(slot).enabled = on
            }
            (Field::Size(field), Value::Number(v)) => {
                let current = self.size_value(field);
                if *current != v {
                    *current = v;
                    return Effect::RegenerateGeometry;
                }
            }
            (field, value) => {
                log::warn!("ignoring {:?} written to {:?}", value, field);
            }
        }
        Effect::None
    }
}

/// Drives the demo: panel edits, geometry regeneration, resize and the
/// per-frame tick.
pub struct DemoRunner {
    state: DemoState,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    input: PointerInput,
    panel: ControlPanel,
    stats: GeometryStats,
    frames: FrameIterator,
    frames_rendered: u64,
    viewport: (u32, u32),
}

impl DemoRunner {
    /// Build the scene, camera, controls and panel for `config`
    pub fn new(config: DemoConfig, width: u32, height: u32, textures: &TextureLoader) -> Self {
        let mut material = config.material.build();
        if material.is_lit() {
            let sources = &config.textures;
            for (slot, source) in [
                (MapSlot::Color, &sources.color_map),
                (MapSlot::Roughness, &sources.roughness_map),
                (MapSlot::Metalness, &sources.metalness_map),
            ] {
                if let Some(path) = source {
                    *material.maps.slot_mut(slot) =
                        TextureSlot::loaded(path.clone(), textures.load_or_missing(path));
                }
            }
        }

        let geometry = config.geometry.build(&config.size);
        let lights = config
            .lights
            .as_ref()
            .map(|rig| rig.build())
            .unwrap_or_default();
        let mut scene = Scene::new(Mesh::new(geometry, material), lights);
        scene.background = config.background;

        let mut camera = PerspectiveCamera::for_viewport(width, height);
        camera.position = Vec3::new(0.0, 0.0, config.camera_distance);
        camera.look_at(Vec3::ZERO);

        let controls = OrbitControls::new(Vec3::ZERO).with_damping(config.damping_factor);
        let panel = ControlPanel::for_config(&config);

        let mut state = DemoState {
            scene,
            size: config.size,
            kind: config.geometry,
        };
        let mut stats = GeometryStats {
            created: 1,
            disposed: 0,
        };

        // Sizes outside the panel's domains are pulled in before anything is uploaded
        if panel
            .normalize(&mut state)
            .contains(&Effect::RegenerateGeometry)
        {
            let _discarded = state
                .scene
                .mesh
                .replace_geometry(state.kind.build(&state.size));
            stats.created += 1;
            stats.disposed += 1;
        }

        log::info!(
            "Initialized '{}': {} with {} triangles, camera at distance {}",
            config.name,
            state.kind.label(),
            state.scene.mesh.geometry().triangle_count(),
            config.camera_distance
        );

        Self {
            state,
            camera,
            controls,
            input: PointerInput::new(),
            panel,
            stats,
            frames: FrameIterator::new(),
            frames_rendered: 0,
            viewport: (width, height),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    pub fn state(&self) -> &DemoState {
        &self.state
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn input_mut(&mut self) -> &mut PointerInput {
        &mut self.input
    }

    pub fn stats(&self) -> GeometryStats {
        self.stats
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Edit a bound field as the panel would, applying any follow-up work
    pub fn set_field(
        &mut self,
        renderer: &mut impl SceneRenderer,
        field: Field,
        value: Value,
    ) -> Result<(), PanelError> {
        let effect = self.panel.set(&mut self.state, field, value)?;
        self.apply_effects(renderer, &[effect]);
        Ok(())
    }

    /// Rebuild the primitive at the current size and release the old one
    pub fn apply_size(&mut self, renderer: &mut impl SceneRenderer) {
        let geometry = self.state.kind.build(&self.state.size);
        let new_id = geometry.id();
        self.stats.created += 1;

        let old = self.state.scene.mesh.replace_geometry(geometry);
        renderer.dispose_geometry(old.id());
        self.stats.disposed += 1;

        log::debug!(
            "regenerated {} geometry {} -> {} ({:?})",
            self.state.kind.label(),
            old.id().get(),
            new_id.get(),
            self.state.size
        );
    }

    /// Run the follow-up work for a batch of panel writes
    pub fn apply_effects(&mut self, renderer: &mut impl SceneRenderer, effects: &[Effect]) {
        if effects.contains(&Effect::RegenerateGeometry) {
            self.apply_size(renderer);
        }
    }

    /// Match the camera and render target to a new viewport size
    pub fn resize(&mut self, renderer: &mut impl SceneRenderer, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring zero-area resize {}x{}", width, height);
            return;
        }

        self.camera.aspect = aspect_ratio(width, height);
        self.camera.update_projection_matrix();
        renderer.resize(width, height);
        self.viewport = (width, height);

        log::debug!("resized to {}x{}, aspect {:.3}", width, height, self.camera.aspect);
    }

    /// Feed pointer input that the panel did not consume
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        self.input.process_event(event);
    }

    /// Draw the control panel; returns the effects of this pass's edits
    pub fn show_panel(&mut self, ctx: &egui::Context) -> Vec<Effect> {
        let stats = self.panel_stats();
        self.panel.show(ctx, &mut self.state, &stats)
    }

    pub fn panel_stats(&self) -> PanelStats {
        PanelStats {
            fps: self.frames.fps(),
            width: self.viewport.0,
            height: self.viewport.1,
            triangles: self.state.scene.mesh.geometry().triangle_count(),
            geometries_created: self.stats.created,
            geometries_disposed: self.stats.disposed,
        }
    }

    /// Advance the controls and render exactly one frame
    pub fn tick(&mut self, renderer: &mut impl SceneRenderer) -> anyhow::Result<()> {
        if let Some(frame) = self.frames.next() {
            log::trace!("frame {} dt {:.4}", frame.number, frame.delta);
        }

        self.controls
            .apply_input(&mut self.input, &self.camera, self.viewport.1);
        self.controls.update(&mut self.camera);

        renderer.render(&self.state.scene, &self.camera)?;
        self.frames_rendered += 1;
        Ok(())
    }
}
