mod common;

use common::MockRenderer;
use mesh_viewer::config::{Axis, DemoConfig, Preset};
use mesh_viewer::geometry::Shape;
use mesh_viewer::panel::{Field, SizeField, Value};
use mesh_viewer::texture::TextureLoader;
use mesh_viewer::DemoRunner;

fn cylinder_runner() -> (DemoRunner, MockRenderer) {
    let runner = DemoRunner::new(
        DemoConfig::preset(Preset::Cylinder),
        800,
        600,
        &TextureLoader::default(),
    );
    (runner, MockRenderer::new(800, 600))
}

#[cfg(test)]
mod initialization_tests {
    use super::*;
    use mesh_viewer::scene::MaterialKind;

    #[test]
    fn test_cylinder_scene_defaults() {
        let (runner, _) = cylinder_runner();

        let camera = runner.camera();
        assert_eq!(camera.fov, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.position.z, 30.0);

        let mesh = &runner.scene().mesh;
        assert!(mesh.visible);
        assert_eq!(mesh.material.kind, MaterialKind::Basic);
        assert_eq!(mesh.material.color.to_hex(), "#0066ff");
        assert!(!mesh.material.wireframe);
        assert!(runner.scene().lights.is_empty());
        assert_eq!(runner.stats().live(), 1);
    }

    #[test]
    fn test_textured_box_with_missing_maps_still_builds() {
        let missing = std::env::temp_dir().join("mesh_viewer_no_such_assets");
        let runner = DemoRunner::new(
            DemoConfig::preset(Preset::TexturedBox),
            800,
            600,
            &TextureLoader::new(missing),
        );

        let material = &runner.scene().mesh.material;
        assert_eq!(material.kind, MaterialKind::Standard);
        assert_eq!(material.metalness, 0.0);
        assert_eq!(material.roughness, 0.5);
        let color = &material.maps.color;
        assert!(color.source.is_some());
        assert!(color.texture.is_none());
        assert!(color.active().is_none());

        assert!(runner.scene().lights.ambient.is_some());
        assert!(runner.scene().lights.directional.is_some());
        assert_eq!(runner.camera().position.z, 5.0);
    }

    #[test]
    fn test_out_of_range_config_size_is_clamped() {
        let mut config = DemoConfig::preset(Preset::Cylinder);
        config.size.radius = 25.0;
        let runner = DemoRunner::new(config, 800, 600, &TextureLoader::default());

        assert_eq!(runner.state().size.radius, 10.0);
        assert!((runner.scene().mesh.geometry().bounds().size().x - 20.0).abs() < 1e-4);
        assert_eq!(runner.stats().live(), 1);
    }
}

#[cfg(test)]
mod regeneration_tests {
    use super::*;

    #[test]
    fn test_resize_cylinder_to_radius_8_height_30() {
        let (mut runner, mut renderer) = cylinder_runner();
        runner.tick(&mut renderer).unwrap();
        let original = runner.scene().mesh.geometry().id();

        runner
            .set_field(&mut renderer, Field::Size(SizeField::Radius), Value::Number(8.0))
            .unwrap();
        assert_eq!(renderer.disposed, vec![original]);

        let after_radius = runner.scene().mesh.geometry().id();
        runner
            .set_field(&mut renderer, Field::Size(SizeField::Height), Value::Number(30.0))
            .unwrap();
        assert_eq!(renderer.disposed, vec![original, after_radius]);

        let geometry = runner.scene().mesh.geometry();
        let id = geometry.id();
        match geometry.shape() {
            Shape::Cylinder(shape) => {
                assert_eq!(shape.radius_top, 8.0);
                assert_eq!(shape.radius_bottom, 8.0);
                assert_eq!(shape.height, 30.0);
                assert_eq!(shape.radial_segments, 16);
                assert_eq!(shape.height_segments, 1);
                assert!(shape.open_ended);
            }
            other => panic!("expected a cylinder, got {:?}", other),
        }

        let size = geometry.bounds().size();
        assert!((size.x - 16.0).abs() < 1e-4);
        assert!((size.y - 30.0).abs() < 1e-4);
        assert!((size.z - 16.0).abs() < 1e-4);

        runner.tick(&mut renderer).unwrap();
        assert_eq!(renderer.last_frame().drawn, vec![id]);
    }

    #[test]
    fn test_fifty_radius_edits_keep_one_live_geometry() {
        let (mut runner, mut renderer) = cylinder_runner();
        let before = runner.stats();

        for i in 0..50 {
            let radius = 1.0 + (i % 9) as f32 + 0.5;
            runner
                .set_field(&mut renderer, Field::Size(SizeField::Radius), Value::Number(radius))
                .unwrap();
            runner.tick(&mut renderer).unwrap();
        }

        let after = runner.stats();
        assert_eq!(after.disposed - before.disposed, 50);
        assert_eq!(after.live(), 1);
        assert_eq!(renderer.disposed.len(), 50);
        assert_eq!(renderer.resident.len(), 1);
        assert!(renderer
            .resident
            .contains(&runner.scene().mesh.geometry().id()));
    }

    #[test]
    fn test_unchanged_size_does_not_regenerate() {
        let (mut runner, mut renderer) = cylinder_runner();
        runner
            .set_field(&mut renderer, Field::Size(SizeField::Radius), Value::Number(5.0))
            .unwrap();
        assert!(renderer.disposed.is_empty());
        assert_eq!(runner.stats().created, 1);
    }

    #[test]
    fn test_box_size_edit_rebuilds_box() {
        let mut runner = DemoRunner::new(
            DemoConfig::preset(Preset::TexturedBox),
            800,
            600,
            &TextureLoader::new(std::env::temp_dir().join("mesh_viewer_no_such_assets")),
        );
        let mut renderer = MockRenderer::new(800, 600);

        runner
            .set_field(&mut renderer, Field::Size(SizeField::Depth), Value::Number(9.0))
            .unwrap();

        let size = runner.scene().mesh.geometry().bounds().size();
        assert!((size.x - 1.0).abs() < 1e-5);
        assert!((size.y - 1.0).abs() < 1e-5);
        assert!((size.z - 5.0).abs() < 1e-5, "depth is clamped to the panel maximum");
        assert_eq!(renderer.disposed.len(), 1);
    }
}

#[cfg(test)]
mod resize_tests {
    use super::*;

    #[test]
    fn test_resize_updates_aspect_and_target() {
        let (mut runner, mut renderer) = cylinder_runner();

        runner.resize(&mut renderer, 1200, 800);
        assert_eq!(runner.camera().aspect, 1.5);
        assert_eq!(renderer.size, (1200, 800));

        runner.tick(&mut renderer).unwrap();
        let frame = renderer.last_frame();
        assert_eq!(frame.aspect, 1.5);
        assert_eq!(frame.size, (1200, 800));
    }

    #[test]
    fn test_every_resize_is_applied() {
        let (mut runner, mut renderer) = cylinder_runner();
        for (w, h) in [(640, 480), (1920, 1080), (300, 900)] {
            runner.resize(&mut renderer, w, h);
            assert!((runner.camera().aspect - w as f32 / h as f32).abs() < 1e-6);
            assert_eq!(renderer.size, (w, h));
        }
    }

    #[test]
    fn test_zero_area_resize_is_ignored() {
        let (mut runner, mut renderer) = cylinder_runner();
        runner.resize(&mut renderer, 0, 0);
        runner.resize(&mut renderer, 1024, 0);
        assert_eq!(renderer.size, (800, 600));
        assert!((runner.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}

#[cfg(test)]
mod binding_tests {
    use super::*;
    use mesh_viewer::math::Color;

    #[test]
    fn test_visibility_toggle_controls_draw_list() {
        let (mut runner, mut renderer) = cylinder_runner();

        runner
            .set_field(&mut renderer, Field::Visible, Value::Toggle(false))
            .unwrap();
        runner.tick(&mut renderer).unwrap();
        assert!(renderer.last_frame().drawn.is_empty());

        runner
            .set_field(&mut renderer, Field::Visible, Value::Toggle(true))
            .unwrap();
        runner.tick(&mut renderer).unwrap();
        assert_eq!(
            renderer.last_frame().drawn,
            vec![runner.scene().mesh.geometry().id()]
        );
    }

    #[test]
    fn test_rotation_reaches_mesh_before_render() {
        let (mut runner, mut renderer) = cylinder_runner();

        runner
            .set_field(&mut renderer, Field::Rotation(Axis::X), Value::Number(1.25))
            .unwrap();
        runner
            .set_field(&mut renderer, Field::Rotation(Axis::Y), Value::Number(std::f32::consts::TAU))
            .unwrap();

        let rotation = runner.scene().mesh.rotation;
        assert_eq!(rotation.x, 1.25);
        assert_eq!(rotation.y, std::f32::consts::TAU);
        assert!(
            runner
                .set_field(&mut renderer, Field::Rotation(Axis::Z), Value::Number(1.0))
                .is_err(),
            "the cylinder demo exposes no z rotation"
        );
    }

    #[test]
    fn test_color_and_wireframe_edits() {
        let (mut runner, mut renderer) = cylinder_runner();

        runner
            .set_field(&mut renderer, Field::Color, Value::Color(Color::rgb(255, 0, 0)))
            .unwrap();
        runner
            .set_field(&mut renderer, Field::Wireframe, Value::Toggle(true))
            .unwrap();

        let material = &runner.scene().mesh.material;
        assert_eq!(material.color.to_hex(), "#ff0000");
        assert!(material.wireframe);
        assert!(renderer.disposed.is_empty());
    }

    #[test]
    fn test_out_of_domain_radius_is_clamped() {
        let (mut runner, mut renderer) = cylinder_runner();

        runner
            .set_field(&mut renderer, Field::Size(SizeField::Radius), Value::Number(0.0))
            .unwrap();
        assert_eq!(runner.state().size.radius, 1.0);

        runner
            .set_field(&mut renderer, Field::Size(SizeField::Height), Value::Number(100.0))
            .unwrap();
        assert_eq!(runner.state().size.height, 40.0);
    }
}

#[cfg(test)]
mod tick_tests {
    use super::*;
    use mesh_viewer::controls::PointerButton;

    #[test]
    fn test_each_tick_renders_once() {
        let (mut runner, mut renderer) = cylinder_runner();
        for _ in 0..3 {
            runner.tick(&mut renderer).unwrap();
        }
        assert_eq!(renderer.frames.len(), 3);
        assert_eq!(runner.frames_rendered(), 3);
    }

    #[test]
    fn test_drag_orbits_camera_over_several_ticks() {
        let (mut runner, mut renderer) = cylinder_runner();
        let input = runner.input_mut();
        input.move_to(400.0, 300.0);
        input.press(PointerButton::Primary);
        input.move_to(500.0, 300.0);
        input.release(PointerButton::Primary);

        runner.tick(&mut renderer).unwrap();
        let first = runner.camera().position;
        assert!(first.x != 0.0, "camera starts moving on the first tick");

        for _ in 0..10 {
            runner.tick(&mut renderer).unwrap();
        }
        let later = runner.camera().position;
        assert!(later.x.abs() > first.x.abs(), "damping keeps easing the orbit");
        assert!((later.length() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_secondary_drag_pans_view_over_several_ticks() {
        let (mut runner, mut renderer) = cylinder_runner();
        let input = runner.input_mut();
        input.move_to(400.0, 300.0);
        input.press(PointerButton::Secondary);
        input.move_to(400.0, 360.0);
        input.release(PointerButton::Secondary);

        runner.tick(&mut renderer).unwrap();
        let first = runner.camera().target();
        assert!(first.y > 0.0, "dragging down moves the view target up");

        for _ in 0..10 {
            runner.tick(&mut renderer).unwrap();
        }
        let later = runner.camera().target();
        assert!(later.y > first.y, "damping keeps easing the pan");
        assert!(later.x.abs() < 1e-4);
        assert!((runner.camera().position - later - glam::Vec3::new(0.0, 0.0, 30.0)).length() < 1e-3);
    }
}

#[cfg(test)]
mod panel_display_tests {
    use super::*;

    fn show_panel_idle(runner: &mut DemoRunner, renderer: &mut MockRenderer, frames: usize) {
        let ctx = egui::Context::default();
        for _ in 0..frames {
            let mut effects = Vec::new();
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                effects.extend(runner.show_panel(ctx));
            });
            runner.apply_effects(renderer, &effects);
            runner.tick(renderer).unwrap();
        }
    }

    #[test]
    fn test_displaying_panel_keeps_full_turn_rotation() {
        let (mut runner, mut renderer) = cylinder_runner();
        runner
            .set_field(&mut renderer, Field::Rotation(Axis::Y), Value::Number(std::f32::consts::TAU))
            .unwrap();

        show_panel_idle(&mut runner, &mut renderer, 3);

        assert_eq!(runner.scene().mesh.rotation.y, std::f32::consts::TAU);
        assert_eq!(renderer.frames.len(), 3);
    }

    #[test]
    fn test_displaying_panel_does_not_regenerate_off_grid_size() {
        let mut config = DemoConfig::preset(Preset::Cylinder);
        config.size.radius = 5.005;
        config.size.height = 20.003;
        let mut runner = DemoRunner::new(config, 800, 600, &TextureLoader::default());
        let mut renderer = MockRenderer::new(800, 600);

        show_panel_idle(&mut runner, &mut renderer, 3);

        assert_eq!(runner.state().size.radius, 5.005);
        assert_eq!(runner.state().size.height, 20.003);
        assert!(renderer.disposed.is_empty());
        assert_eq!(runner.stats().created, 1);
    }
}
