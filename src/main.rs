use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use mesh_viewer::cli::Cli;
use mesh_viewer::config::DemoConfig;
use mesh_viewer::renderer::{SceneRenderer, WgpuRenderer};
use mesh_viewer::runner::DemoRunner;
use mesh_viewer::texture::TextureLoader;

struct App {
    cli: Cli,
    config: DemoConfig,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    runner: Option<DemoRunner>,
    failed: bool,
}

impl App {
    fn new(cli: Cli, config: DemoConfig) -> Self {
        Self {
            cli,
            config,
            window: None,
            renderer: None,
            runner: None,
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: impl std::fmt::Display) {
        log::error!("{}", message);
        self.failed = true;
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(window), Some(renderer), Some(runner)) =
            (&self.window, &mut self.renderer, &mut self.runner)
        else {
            return Ok(());
        };

        let mut effects = Vec::new();
        if let Some(ui) = renderer.ui_mut() {
            ui.run(window, |ctx| effects.extend(runner.show_panel(ctx)));
        }
        runner.apply_effects(renderer, &effects);

        runner.tick(renderer)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let title = format!("Mesh Viewer - {}", self.config.name);
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(title)
                .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, format!("Failed to create window: {}", e));
                return;
            }
        };

        let renderer = match pollster::block_on(WgpuRenderer::new(window.clone(), !self.cli.no_ui)) {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(event_loop, format!("Failed to initialize renderer: {:#}", e));
                return;
            }
        };

        let (width, height) = renderer.size();
        let textures = TextureLoader::new(&self.config.asset_dir);
        let runner = DemoRunner::new(self.config.clone(), width, height, &textures);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.runner = Some(runner);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let the panel handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if let Some(ui) = renderer.ui_mut() {
                if ui.handle_event(window, &event) {
                    // A drag that ends over the panel still has to release the orbit
                    if let (WindowEvent::MouseInput { state: ElementState::Released, .. }, Some(runner)) =
                        (&event, &mut self.runner)
                    {
                        runner.handle_window_event(&event);
                    }
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(renderer), Some(runner)) = (&mut self.renderer, &mut self.runner) {
                    runner.resize(renderer, size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, format!("Render error: {:#}", e));
                }
            }
            other => {
                if let Some(runner) = &mut self.runner {
                    runner.handle_window_event(&other);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.demo_config()?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    log::info!("Mesh Viewer - drag to orbit, scroll to zoom, Escape to quit");
    event_loop.run_app(&mut app)?;

    if app.failed {
        anyhow::bail!("mesh viewer exited after an error");
    }
    Ok(())
}
