use glam::Mat4;
use halo_core::{DrawRun, DrawRunKind, InstanceParams, MeshBuffers, RingSide};
use wgpu::util::DeviceExt;

use crate::constants::CLEAR_COLOR;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

/// One mesh's channels uploaded as separate vertex buffers.
struct GpuMesh {
    positions: wgpu::Buffer,
    normals: wgpu::Buffer,
    uv0: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &MeshBuffers) -> Self {
        let vertex = |suffix: &str, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_{suffix}")),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let [uv0, _, _] = mesh.uv_bytes();
        Self {
            positions: vertex("positions", mesh.position_bytes()),
            normals: vertex("normals", mesh.normal_bytes()),
            uv0: vertex("uv0", uv0),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_indices")),
                contents: &mesh.index_bytes_padded(),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: mesh.index_count() as u32,
        }
    }
}

/// CPU meshes the renderer uploads once at startup.
pub struct SceneMeshes {
    pub inside: MeshBuffers,
    pub outside: MeshBuffers,
    pub guides: Option<MeshBuffers>,
}

/// Everything one frame needs to draw.
pub struct FrameDraw<'a> {
    /// One row per draw-list entry, in composite order.
    pub rows: &'a [InstanceParams],
    pub runs: &'a [DrawRun],
    pub guide: Option<InstanceParams>,
    pub view_proj: Mat4,
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    inside: GpuMesh,
    outside: GpuMesh,
    guides: Option<GpuMesh>,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(
        window: &'w winit::window::Window,
        meshes: &SceneMeshes,
        instance_rows: usize,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ring_shader"),
            source: wgpu::ShaderSource::Wgsl(halo_core::RING_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // guide row sits after the cluster rows
        let instance_capacity = instance_rows + 1;
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<InstanceParams>() * instance_capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vec3_stride = std::mem::size_of::<[f32; 3]>() as u64;
        let vec2_stride = std::mem::size_of::<[f32; 2]>() as u64;
        let vertex_buffers = [
            // slot 0-2: mesh channels, one buffer each
            wgpu::VertexBufferLayout {
                array_stride: vec3_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: vec3_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: vec2_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 2,
                }],
            },
            // slot 3: instance parameters
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceParams>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 0,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 4,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 32,
                        shader_location: 5,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 48,
                        shader_location: 6,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 64,
                        shader_location: 7,
                    },
                ],
            },
        ];
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ring_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // Strips are split by 0xFFFF; outward strips wind counter-clockwise
            // seen from outside, inward ones the other way.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: Some(wgpu::IndexFormat::Uint16),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let inside = GpuMesh::upload(&device, "ring_inside", &meshes.inside);
        let outside = GpuMesh::upload(&device, "ring_outside", &meshes.outside);
        let guides = meshes
            .guides
            .as_ref()
            .map(|m| GpuMesh::upload(&device, "guides", m));
        log::info!(
            "[gpu] format={:?} size={}x{} ring_indices={} guide_indices={}",
            format,
            config.width,
            config.height,
            outside.index_count,
            guides.as_ref().map_or(0, |g| g.index_count)
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            width: config.width,
            height: config.height,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            instance_vb,
            instance_capacity,
            inside,
            outside,
            guides,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(&mut self, draw: &FrameDraw) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: draw.view_proj.to_cols_array_2d(),
            }),
        );

        let ring_rows = draw.rows.len().min(self.instance_capacity - 1);
        if ring_rows > 0 {
            self.queue.write_buffer(
                &self.instance_vb,
                0,
                bytemuck::cast_slice(&draw.rows[..ring_rows]),
            );
        }
        let guide_row = ring_rows as u32;
        if let Some(g) = &draw.guide {
            self.queue.write_buffer(
                &self.instance_vb,
                (ring_rows * std::mem::size_of::<InstanceParams>()) as u64,
                bytemuck::bytes_of(g),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(3, self.instance_vb.slice(..));

            // the whole guide batch is one draw
            if let (Some(mesh), Some(_)) = (&self.guides, &draw.guide) {
                bind_mesh(&mut rpass, mesh);
                rpass.draw_indexed(0..mesh.index_count, 0, guide_row..guide_row + 1);
            }

            for run in draw.runs {
                let mesh = match run.kind {
                    DrawRunKind::Ring(RingSide::Inside) => &self.inside,
                    DrawRunKind::Ring(RingSide::Outside) => &self.outside,
                    // no occluder mesh in the desktop viewer
                    DrawRunKind::Occluder => continue,
                };
                let start = run.start.min(ring_rows) as u32;
                let end = (run.start + run.len).min(ring_rows) as u32;
                if start == end {
                    continue;
                }
                bind_mesh(&mut rpass, mesh);
                rpass.draw_indexed(0..mesh.index_count, 0, start..end);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn bind_mesh(rpass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh) {
    rpass.set_vertex_buffer(0, mesh.positions.slice(..));
    rpass.set_vertex_buffer(1, mesh.normals.slice(..));
    rpass.set_vertex_buffer(2, mesh.uv0.slice(..));
    rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint16);
}
