use winit::event::WindowEvent;
use winit::window::Window;

/// Tessellated panel output waiting for the next rendered frame
struct PendingFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// egui context, winit glue and wgpu painter for the control panel
pub struct UiOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pending: Option<PendingFrame>,
}

impl UiOverlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
            pending: None,
        }
    }

    /// Feed a window event to egui. Returns true if the panel consumed it.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run one UI pass; its output is painted by the next render.
    ///
    /// `build` may be called more than once if egui requests another pass.
    pub fn run(&mut self, window: &Window, mut build: impl FnMut(&egui::Context)) {
        let raw_input = self.state.take_egui_input(window);
        let output = self.ctx.run(raw_input, |ctx| build(ctx));
        self.state
            .handle_platform_output(window, output.platform_output);

        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);

        // Texture deltas of a frame that was never painted still have to be applied
        let mut textures = self
            .pending
            .take()
            .map(|frame| frame.textures)
            .unwrap_or_default();
        textures.append(output.textures_delta);

        self.pending = Some(PendingFrame {
            primitives,
            textures,
            pixels_per_point: output.pixels_per_point,
        });
    }

    /// Draw the pending panel on top of `view`.
    ///
    /// Returns egui's own command buffers, which must be submitted before
    /// `encoder`.
    pub(super) fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(frame) = self.pending.take() else {
            return Vec::new();
        };

        for (id, delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };
        let command_buffers = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // egui-wgpu takes a RenderPass<'static>
            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &frame.primitives, &screen_descriptor);
        }

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }

        command_buffers
    }
}
