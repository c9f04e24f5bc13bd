pub mod camera;
pub mod gpu;
pub mod light;
pub mod material;
pub mod matrix_stack;
pub mod mesh;
pub mod orbit;
pub mod panel;
pub mod scene;
pub mod uniforms;

use std::collections::HashMap;
use std::num::NonZeroU64;

use anyhow::Result;
use gpu::GpuContext;
use matrix_stack::MatrixStack;
use mesh::{MeshData, Vertex};
use scene::{render_frame, MeshKind, RenderFlags, SceneState, SCENE_NODES};
use uniforms::blocks::{FrameRecorder, FrameUniform, NodeUniform, NODE_UNIFORM_STRIDE};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MAX_NODES: usize = SCENE_NODES.len();
const PIPELINE_VARIANTS: usize = 4;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Phong renderer for the fixed scene.
///
/// Each frame the scene description is projected into a [`FrameRecorder`],
/// whose blocks are then written to one per-frame uniform buffer and one
/// dynamically offset per-node buffer.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipelines: [wgpu::RenderPipeline; PIPELINE_VARIANTS],
    frame_buffer: wgpu::Buffer,
    node_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    meshes: HashMap<MeshKind, GpuMesh>,
    stack: MatrixStack,
    recorder: FrameRecorder,
}

impl Renderer {
    pub fn new(
        gpu: &GpuContext,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);

        let frame_buffer = gpu.create_buffer_init(
            "Frame Uniform Buffer",
            bytemuck::cast_slice(&[FrameUniform::default()]),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let node_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Node Uniform Buffer"),
            size: NODE_UNIFORM_STRIDE * MAX_NODES as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = Self::create_bind_group_layout(gpu);
        let bind_group = Self::create_bind_group(gpu, &bind_group_layout, &frame_buffer, &node_buffer);

        let shader = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Phong Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/phong.wgsl").into()),
        });

        let pipelines: [wgpu::RenderPipeline; PIPELINE_VARIANTS] = std::array::from_fn(|variant| {
            let flags = Self::flags_for_variant(variant);
            Self::create_render_pipeline(gpu, &shader, &bind_group_layout, config.format, flags)
        });

        let depth_view = Self::create_depth_view(gpu, &config);

        log::info!(
            "Renderer ready: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            config,
            pipelines,
            frame_buffer,
            node_buffer,
            bind_group,
            depth_view,
            meshes: HashMap::new(),
            stack: MatrixStack::new(),
            recorder: FrameRecorder::new(),
        })
    }

    /// Uploads geometry for a mesh kind. Nodes whose mesh is not registered
    /// get their uniforms projected but are not drawn.
    pub fn register_mesh(&mut self, gpu: &GpuContext, kind: MeshKind, mesh: &MeshData) {
        let vertex_buffer = gpu.create_buffer_init(
            &format!("{kind:?} Vertex Buffer"),
            bytemuck::cast_slice(&mesh.vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = gpu.create_buffer_init(
            &format!("{kind:?} Index Buffer"),
            bytemuck::cast_slice(&mesh.indices),
            wgpu::BufferUsages::INDEX,
        );
        log::debug!("Registered {kind:?} mesh with {} triangles", mesh.triangle_count());
        self.meshes.insert(
            kind,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            },
        );
    }

    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&gpu.device, &self.config);
            self.depth_view = Self::create_depth_view(gpu, &self.config);
            log::info!("Resized surface to {width}x{height}");
        }
    }

    pub fn render(&mut self, gpu: &GpuContext, state: &SceneState) -> Result<(), wgpu::SurfaceError> {
        self.recorder.begin_frame();
        render_frame(state, &mut self.stack, &mut self.recorder);
        self.write_uniforms(gpu);

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        self.encode_render_pass(&mut encoder, &view, state.flags);

        gpu.queue.submit(Some(encoder.finish()));
        output.present();

        Ok(())
    }

    fn write_uniforms(&self, gpu: &GpuContext) {
        gpu.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[*self.recorder.frame()]),
        );
        for (slot, draw) in self.recorder.draws().iter().take(MAX_NODES).enumerate() {
            gpu.queue.write_buffer(
                &self.node_buffer,
                slot as u64 * NODE_UNIFORM_STRIDE,
                bytemuck::cast_slice(&[draw.node]),
            );
        }
    }

    fn encode_render_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        flags: RenderFlags,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Phong Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
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

        render_pass.set_pipeline(&self.pipelines[Self::variant_for_flags(flags)]);

        for (slot, draw) in self.recorder.draws().iter().take(MAX_NODES).enumerate() {
            let Some(mesh) = self.meshes.get(&draw.mesh) else {
                continue;
            };
            let offset = (slot as u64 * NODE_UNIFORM_STRIDE) as wgpu::DynamicOffset;
            render_pass.set_bind_group(0, &self.bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn variant_for_flags(flags: RenderFlags) -> usize {
        (usize::from(flags.backface_culling) << 1) | usize::from(flags.depth_test)
    }

    fn flags_for_variant(variant: usize) -> RenderFlags {
        RenderFlags {
            backface_culling: variant & 0b10 != 0,
            depth_test: variant & 0b01 != 0,
        }
    }

    fn create_depth_view(gpu: &GpuContext, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_bind_group_layout(gpu: &GpuContext) -> wgpu::BindGroupLayout {
        gpu.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Phong Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(std::mem::size_of::<NodeUniform>() as u64),
                    },
                    count: None,
                },
            ],
        })
    }

    fn create_bind_group(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        frame_buffer: &wgpu::Buffer,
        node_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Phong Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: node_buffer,
                        offset: 0,
                        size: NonZeroU64::new(std::mem::size_of::<NodeUniform>() as u64),
                    }),
                },
            ],
        })
    }

    fn create_render_pipeline(
        gpu: &GpuContext,
        shader: &wgpu::ShaderModule,
        bind_group_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        flags: RenderFlags,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        let (depth_write_enabled, depth_compare) = if flags.depth_test {
            (true, wgpu::CompareFunction::Less)
        } else {
            (false, wgpu::CompareFunction::Always)
        };

        gpu.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!(
                "Phong Pipeline (culling={}, depth={})",
                flags.backface_culling, flags.depth_test
            )),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[Self::vertex_buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: flags.backface_culling.then_some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Vertex::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 3 * 4,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
