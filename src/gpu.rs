//! wgpu implementation of the render pass backend.
//!
//! Backend calls made during a tick are recorded (uniform snapshots plus
//! vertex ranges) and replayed as a single render pass by `submit`.

use crate::texture::TextureImage;
use figure_core::{
    FigureError, GraphicsBackend, Matrix4, MatrixUniform, MeshVertex, TextureSelector, SCENE_WGSL,
};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32];
const INITIAL_DRAW_CAPACITY: usize = 16;

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    global_rotation: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    texture_selector: i32,
    _pad: [i32; 3],
}

struct DrawCommand {
    first_vertex: u32,
    vertex_count: u32,
}

/// Calls recorded during one tick.
struct FrameRecording {
    clear: Option<[f32; 4]>,
    frame: FrameUniforms,
    current: DrawUniforms,
    vertices: Vec<MeshVertex>,
    draws: Vec<DrawUniforms>,
    commands: Vec<DrawCommand>,
}

impl FrameRecording {
    fn new() -> Self {
        let identity = Matrix4::identity().to_cols_array_2d();
        Self {
            clear: None,
            frame: FrameUniforms {
                projection: identity,
                view: identity,
                global_rotation: identity,
            },
            current: DrawUniforms {
                model: identity,
                color: [1.0; 4],
                ..Default::default()
            },
            vertices: Vec::new(),
            draws: Vec::new(),
            commands: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.clear = None;
        self.vertices.clear();
        self.draws.clear();
        self.commands.clear();
    }
}

pub struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    draw_bgl: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,

    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,

    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    texture_bind_group: wgpu::BindGroup,

    depth_view: wgpu::TextureView,
    recording: FrameRecording,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| FigureError::ResourceUnavailable("no GPU adapter".into()))?;
        let info = adapter.get_info();
        log::info!("[gpu] adapter={} backend={:?}", info.name, info.backend);
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

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| {
                FigureError::ResourceUnavailable("surface reports no texture formats".into())
            })?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Frame-wide matrices
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Per-draw uniforms, one aligned slot per draw call
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let draw_stride = (std::mem::size_of::<DrawUniforms>() as u64).div_ceil(align) * align;
        let (draw_buffer, draw_bind_group) =
            create_draw_uniforms(&device, &draw_bgl, draw_stride, INITIAL_DRAW_CAPACITY);

        let vertex_capacity = INITIAL_DRAW_CAPACITY * figure_core::CUBE_VERTICES;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        // Sampled texture; a white texel stands in until the real image arrives
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let texture_bind_group = create_texture_bind_group(
            &device,
            &queue,
            &texture_bgl,
            &sampler,
            &TextureImage::solid([255, 255, 255, 255]),
        );

        // Shader or pipeline validation failures are fatal
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&frame_bgl, &draw_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRS,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        if let Some(err) = device.pop_error_scope().await {
            return Err(FigureError::PipelineCreation(err.to_string()).into());
        }

        let depth_view = create_depth_view(&device, width, height);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            frame_buffer,
            frame_bind_group,
            draw_bgl,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            vertex_buffer,
            vertex_capacity,
            texture_bgl,
            sampler,
            texture_bind_group,
            depth_view,
            recording: FrameRecording::new(),
        })
    }

    #[inline]
    pub fn window(&self) -> &'w winit::window::Window {
        self.window
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
    }

    /// Upload a decoded image and bind it for the textured shading path.
    /// An image the device cannot hold is rejected and the current texture
    /// stays bound.
    pub fn set_texture(&mut self, image: &TextureImage) -> Result<(), FigureError> {
        image.check_fits(self.device.limits().max_texture_dimension_2d)?;
        self.texture_bind_group = create_texture_bind_group(
            &self.device,
            &self.queue,
            &self.texture_bgl,
            &self.sampler,
            image,
        );
        log::info!("[gpu] texture bound {}x{}", image.width, image.height);
        Ok(())
    }

    /// Replay the recorded frame into the swapchain and present it.
    pub fn submit(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ensure_capacity();
        let result = self.encode_and_present();
        self.recording.reset();
        result
    }

    fn ensure_capacity(&mut self) {
        let draws = self.recording.draws.len();
        if draws > self.draw_capacity {
            self.draw_capacity = draws.next_power_of_two();
            let (buffer, bind_group) = create_draw_uniforms(
                &self.device,
                &self.draw_bgl,
                self.draw_stride,
                self.draw_capacity,
            );
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
        }
        let vertices = self.recording.vertices.len();
        if vertices > self.vertex_capacity {
            self.vertex_capacity = vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
    }

    fn encode_and_present(&self) -> Result<(), wgpu::SurfaceError> {
        let rec = &self.recording;
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&rec.frame));
        if !rec.draws.is_empty() {
            let stride = self.draw_stride as usize;
            let mut bytes = vec![0u8; rec.draws.len() * stride];
            for (i, draw) in rec.draws.iter().enumerate() {
                let raw = bytemuck::bytes_of(draw);
                bytes[i * stride..i * stride + raw.len()].copy_from_slice(raw);
            }
            self.queue.write_buffer(&self.draw_buffer, 0, &bytes);
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&rec.vertices));
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let load = match rec.clear {
            Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
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
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            rpass.set_bind_group(2, &self.texture_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for (i, cmd) in rec.commands.iter().enumerate() {
                let offset = (i as u64 * self.draw_stride) as wgpu::DynamicOffset;
                rpass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                rpass.draw(cmd.first_vertex..cmd.first_vertex + cmd.vertex_count, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl GraphicsBackend for GpuState<'_> {
    fn clear(&mut self, rgba: [f32; 4]) {
        self.recording.clear = Some(rgba);
    }

    fn set_uniform_matrix(&mut self, uniform: MatrixUniform, matrix: &Matrix4) {
        let cols = matrix.to_cols_array_2d();
        let rec = &mut self.recording;
        match uniform {
            MatrixUniform::Projection => rec.frame.projection = cols,
            MatrixUniform::View => rec.frame.view = cols,
            MatrixUniform::GlobalRotation => rec.frame.global_rotation = cols,
            MatrixUniform::Model => rec.current.model = cols,
        }
    }

    fn set_uniform_color(&mut self, rgba: [f32; 4]) {
        self.recording.current.color = rgba;
    }

    fn set_texture_selector(&mut self, selector: TextureSelector) {
        self.recording.current.texture_selector = selector.shader_index();
    }

    fn draw_triangles(&mut self, vertices: &[MeshVertex]) {
        let rec = &mut self.recording;
        rec.commands.push(DrawCommand {
            first_vertex: rec.vertices.len() as u32,
            vertex_count: vertices.len() as u32,
        });
        rec.vertices.extend_from_slice(vertices);
        rec.draws.push(rec.current);
    }
}

fn create_draw_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw_uniforms"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("mesh_vb"),
        size: (std::mem::size_of::<MeshVertex>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &TextureImage,
) -> wgpu::BindGroup {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("scene_texture"),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
