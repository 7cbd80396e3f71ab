use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, Sampler, Surface,
    SurfaceConfiguration, TextureFormat, TextureView,
};
use winit::window::Window;

use super::gpu::GpuContext;
use super::ui::UiOverlay;
use super::uniforms::{FrameUniform, ObjectUniform};
use super::SceneRenderer;
use crate::camera::PerspectiveCamera;
use crate::geometry::{Geometry, GeometryId, Vertex};
use crate::scene::{MapSlot, Material, Scene, Side};
use crate::texture::{TextureData, TextureId};

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// Buffers uploaded for one geometry
struct GpuMesh {
    vertices: Buffer,
    triangles: Buffer,
    triangle_count: u32,
    edges: Buffer,
    edge_count: u32,
    uniform: Buffer,
}

impl GpuMesh {
    fn upload(device: &Device, geometry: &Geometry) -> Self {
        let label = format!("Geometry {}", geometry.id().get());
        let buffer = |suffix: &str, contents: &[u8], usage| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} {}", label, suffix)),
                contents,
                usage,
            })
        };

        Self {
            vertices: buffer(
                "Vertices",
                bytemuck::cast_slice(geometry.vertices()),
                wgpu::BufferUsages::VERTEX,
            ),
            triangles: buffer(
                "Triangles",
                bytemuck::cast_slice(geometry.indices()),
                wgpu::BufferUsages::INDEX,
            ),
            triangle_count: geometry.indices().len() as u32,
            edges: buffer(
                "Edges",
                bytemuck::cast_slice(geometry.edges()),
                wgpu::BufferUsages::INDEX,
            ),
            edge_count: geometry.edges().len() as u32,
            uniform: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{} Uniform", label)),
                size: std::mem::size_of::<ObjectUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        }
    }

    fn destroy(&self) {
        self.vertices.destroy();
        self.triangles.destroy();
        self.edges.destroy();
        self.uniform.destroy();
    }
}

#[derive(Debug, Clone, Copy)]
enum PipelineKind {
    FillFront,
    FillDouble,
    Lines,
}

impl PipelineKind {
    fn for_material(material: &Material) -> Self {
        if material.wireframe {
            PipelineKind::Lines
        } else {
            match material.side {
                Side::Front => PipelineKind::FillFront,
                Side::Double => PipelineKind::FillDouble,
            }
        }
    }
}

struct Draw {
    geometry: GeometryId,
    pipeline: PipelineKind,
    bind_group: BindGroup,
}

/// Window-backed renderer: draws the scene, then the panel overlay
pub struct WgpuRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    sample_count: u32,
    msaa_view: Option<TextureView>,
    depth_view: TextureView,
    frame_buffer: Buffer,
    frame_bind_group: BindGroup,
    object_layout: BindGroupLayout,
    sampler: Sampler,
    fill_front: RenderPipeline,
    fill_double: RenderPipeline,
    lines: RenderPipeline,
    meshes: HashMap<GeometryId, GpuMesh>,
    textures: HashMap<(TextureId, bool), TextureView>,
    blank_texture: TextureView,
    ui: Option<UiOverlay>,
}

impl WgpuRenderer {
    /// Create a renderer for a window; `with_ui` adds the panel overlay
    pub async fn new(window: Arc<Window>, with_ui: bool) -> Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no supported formats"))?;

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let sample_count = msaa_sample_count(
            gpu.adapter()
                .get_texture_format_features(surface_format)
                .flags,
        );
        let device = gpu.device();
        let msaa_view = Self::create_msaa_view(device, &surface_config, sample_count);
        let depth_view = Self::create_depth_view(device, width, height, sample_count);

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                texture_entry(2),
                texture_entry(3),
                texture_entry(4),
            ],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Map Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label, topology, cull_mode| {
            Self::create_pipeline(
                device,
                &pipeline_layout,
                &shader,
                surface_format,
                sample_count,
                label,
                topology,
                cull_mode,
            )
        };
        let fill_front = pipeline(
            "Mesh Fill Pipeline (front)",
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::Face::Back),
        );
        let fill_double = pipeline(
            "Mesh Fill Pipeline (double)",
            wgpu::PrimitiveTopology::TriangleList,
            None,
        );
        let lines = pipeline("Mesh Wireframe Pipeline", wgpu::PrimitiveTopology::LineList, None);

        let blank_texture = upload_texture(
            device,
            gpu.queue(),
            &TextureData::new(1, 1, vec![255; 4]),
            false,
        );

        let ui = with_ui.then(|| UiOverlay::new(&window, device, surface_format));

        log::info!(
            "renderer ready: {}x{} surface, format {:?}, {}x MSAA",
            width,
            height,
            surface_format,
            sample_count
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            sample_count,
            msaa_view,
            depth_view,
            frame_buffer,
            frame_bind_group,
            object_layout,
            sampler,
            fill_front,
            fill_double,
            lines,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            blank_texture,
            ui,
        })
    }

    /// The panel overlay, if this renderer was created with one
    pub fn ui_mut(&mut self) -> Option<&mut UiOverlay> {
        self.ui.as_mut()
    }

    /// Multisampled color target resolved into the surface, if MSAA is on
    fn create_msaa_view(
        device: &Device,
        config: &SurfaceConfiguration,
        sample_count: u32,
    ) -> Option<TextureView> {
        if sample_count <= 1 {
            return None;
        }
        let view = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("MSAA Color Texture"),
                size: wgpu::Extent3d {
                    width: config.width,
                    height: config.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: config.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default());
        Some(view)
    }

    fn create_depth_view(device: &Device, width: u32, height: u32, sample_count: u32) -> TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: TextureFormat,
        sample_count: u32,
        label: &str,
        topology: wgpu::PrimitiveTopology,
        cull_mode: Option<wgpu::Face>,
    ) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
    }

    fn reconfigure(&mut self) {
        self.surface
            .configure(self.gpu.device(), &self.surface_config);
    }

    /// View for one material map, uploading it on first use
    fn map_view(&mut self, material: &Material, slot: MapSlot) -> TextureView {
        let Some(data) = material.maps.slot(slot).active() else {
            return self.blank_texture.clone();
        };

        // Color maps hold sRGB-encoded color; the others hold linear data
        let srgb = slot == MapSlot::Color;
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let blank = &self.blank_texture;
        self.textures
            .entry((data.id(), srgb))
            .or_insert_with(|| {
                let max = device.limits().max_texture_dimension_2d;
                if fits_texture_limit(data, max) {
                    upload_texture(device, queue, data, srgb)
                } else {
                    log::warn!(
                        "{} is {}x{}, larger than the GPU limit of {}; leaving it unmapped",
                        slot.label(),
                        data.width,
                        data.height,
                        max
                    );
                    blank.clone()
                }
            })
            .clone()
    }

    fn prepare(&mut self, scene: &Scene) -> Vec<Draw> {
        let mut draws = Vec::new();

        for item in scene.draw_list() {
            let id = item.geometry.id();
            if !self.meshes.contains_key(&id) {
                log::debug!(
                    "uploading geometry {} ({} triangles)",
                    id.get(),
                    item.geometry.triangle_count()
                );
                self.meshes
                    .insert(id, GpuMesh::upload(self.gpu.device(), item.geometry));
            }

            let color = self.map_view(item.material, MapSlot::Color);
            let roughness = self.map_view(item.material, MapSlot::Roughness);
            let metalness = self.map_view(item.material, MapSlot::Metalness);

            let Some(mesh) = self.meshes.get(&id) else {
                continue;
            };
            self.gpu.queue().write_buffer(
                &mesh.uniform,
                0,
                bytemuck::bytes_of(&ObjectUniform::new(item.model, item.material)),
            );

            let bind_group = self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object Bind Group"),
                layout: &self.object_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: mesh.uniform.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&color),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(&roughness),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::TextureView(&metalness),
                    },
                ],
            });

            draws.push(Draw {
                geometry: id,
                pipeline: PipelineKind::for_material(item.material),
                bind_group,
            });
        }

        draws
    }
}

impl SceneRenderer for WgpuRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
        let device = self.gpu.device();
        self.msaa_view = Self::create_msaa_view(device, &self.surface_config, self.sample_count);
        self.depth_view = Self::create_depth_view(device, width, height, self.sample_count);
    }

    fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring the next frame, skipping it");
                return Ok(());
            }
            Err(e) => return Err(anyhow!("failed to acquire surface texture: {}", e)),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.gpu.queue().write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform::new(camera, &scene.lights)),
        );
        let draws = self.prepare(scene);

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Render Encoder"),
            });

        {
            let [r, g, b] = scene.background.to_linear();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.msaa_view.as_ref().unwrap_or(&view),
                    resolve_target: self.msaa_view.as_ref().map(|_| &view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for draw in &draws {
                let Some(mesh) = self.meshes.get(&draw.geometry) else {
                    continue;
                };
                let pipeline = match draw.pipeline {
                    PipelineKind::FillFront => &self.fill_front,
                    PipelineKind::FillDouble => &self.fill_double,
                    PipelineKind::Lines => &self.lines,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &draw.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertices.slice(..));

                match draw.pipeline {
                    PipelineKind::Lines => {
                        render_pass.set_index_buffer(mesh.edges.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..mesh.edge_count, 0, 0..1);
                    }
                    _ => {
                        render_pass
                            .set_index_buffer(mesh.triangles.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..mesh.triangle_count, 0, 0..1);
                    }
                }
            }
        }

        let size = [self.surface_config.width, self.surface_config.height];
        let ui_commands = match &mut self.ui {
            Some(ui) => ui.paint(self.gpu.device(), self.gpu.queue(), &mut encoder, &view, size),
            None => Vec::new(),
        };

        self.gpu
            .queue()
            .submit(ui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        surface_texture.present();

        Ok(())
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        if let Some(mesh) = self.meshes.remove(&id) {
            mesh.destroy();
            log::debug!("released GPU buffers of geometry {}", id.get());
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// 4x MSAA when the surface format can render and resolve it, else none
fn msaa_sample_count(flags: wgpu::TextureFormatFeatureFlags) -> u32 {
    if flags.sample_count_supported(MSAA_SAMPLES)
        && flags.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE)
    {
        MSAA_SAMPLES
    } else {
        1
    }
}

fn fits_texture_limit(data: &TextureData, max_dimension: u32) -> bool {
    data.width <= max_dimension && data.height <= max_dimension
}

fn upload_texture(
    device: &Device,
    queue: &wgpu::Queue,
    data: &TextureData,
    srgb: bool,
) -> TextureView {
    let size = wgpu::Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Material Map"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: if srgb {
            TextureFormat::Rgba8UnormSrgb
        } else {
            TextureFormat::Rgba8Unorm
        },
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        texture.as_image_copy(),
        &data.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * data.width),
            rows_per_image: Some(data.height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
