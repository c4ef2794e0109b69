//! Headless wgpu render engine.

use std::num::NonZeroU64;

use brainsnap_core::{
    CameraRig, Frame, FrameRenderer, GeometryModel, LightingOptions, VertexColors, ViewState,
};

use crate::buffer::{aligned_bytes_per_row, create_readback_buffer, strip_row_padding, update_buffer};
use crate::error::{RenderError, RenderResult};
use crate::mesh_render::{create_frame_uniform_buffer, FrameUniforms, MeshRenderData};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Offscreen renderer that draws one surface mesh into a fixed-size target
/// and reads the pixels back.
pub struct RenderEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    width: u32,
    height: u32,

    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,

    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    readback_buffer: wgpu::Buffer,

    rig: CameraRig,
    lighting: LightingOptions,
    mesh: Option<MeshRenderData>,
}

impl RenderEngine {
    /// Creates a new headless render engine.
    pub async fn new_headless(width: u32, height: u32) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("brainsnap device (headless)"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let limit = device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > limit || height > limit {
            return Err(RenderError::InvalidDimensions {
                width,
                height,
                limit,
            });
        }

        let (color_texture, color_view) = Self::create_color_target(&device, width, height);
        let depth_view = Self::create_depth_texture(&device, width, height);
        let readback_buffer = create_readback_buffer(&device, width, height);
        let uniform_buffer = create_frame_uniform_buffer(&device);
        let (pipeline, bind_group_layout) = Self::create_mesh_pipeline(&device);

        log::debug!("headless render target {width}x{height} ready");

        Ok(Self {
            device,
            queue,
            width,
            height,
            pipeline,
            bind_group_layout,
            uniform_buffer,
            color_texture,
            color_view,
            depth_view,
            readback_buffer,
            rig: CameraRig::new(width, height),
            lighting: LightingOptions::default(),
            mesh: None,
        })
    }

    /// Blocking variant of [`RenderEngine::new_headless`].
    pub fn headless(width: u32, height: u32) -> RenderResult<Self> {
        pollster::block_on(Self::new_headless(width, height))
    }

    fn create_color_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame color texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
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
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("surface mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/surface_mesh.wgsl").into()),
        });

        let storage_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh bind group layout"),
            entries: &[
                // Frame uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<FrameUniforms>() as u64
                        ),
                    },
                    count: None,
                },
                // Positions, normals, colors
                storage_entry(1),
                storage_entry(2),
                storage_entry(3),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("surface mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Both faces are drawn
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    /// Returns the wgpu device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns the wgpu queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the render target dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Uploads `geometry` with `colors`, dropping any previous mesh buffers.
    pub fn load(&mut self, geometry: &GeometryModel, colors: &VertexColors) -> RenderResult<()> {
        check_color_count(geometry.vertex_count(), colors)?;
        let mesh = MeshRenderData::new(
            &self.device,
            &self.bind_group_layout,
            &self.uniform_buffer,
            geometry,
            colors,
        );
        log::debug!(
            "uploaded mesh with {} vertices and {} faces",
            geometry.vertex_count(),
            geometry.face_count()
        );
        self.mesh = Some(mesh);
        Ok(())
    }

    /// Rewrites the color buffer of the loaded mesh.
    pub fn set_colors(&mut self, colors: &VertexColors) -> RenderResult<()> {
        let mesh = self.mesh.as_ref().ok_or(RenderError::NoMesh)?;
        check_color_count(mesh.vertex_count, colors)?;
        mesh.update_colors(&self.queue, colors);
        Ok(())
    }

    pub fn set_lighting(&mut self, lighting: LightingOptions) {
        self.lighting = lighting;
    }

    /// Draws the loaded mesh from `state` and returns tightly packed RGBA rows.
    pub fn render(&mut self, state: &ViewState) -> RenderResult<Vec<u8>> {
        let mesh = self.mesh.as_ref().ok_or(RenderError::NoMesh)?;

        let transforms = self.rig.transforms(mesh.bounds, state);
        let uniforms = FrameUniforms::new(&transforms, &self.lighting);
        update_buffer(&self.queue, &self.uniform_buffer, &[uniforms]);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Surface Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
                ..Default::default()
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &mesh.bind_group, &[]);
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(aligned_bytes_per_row(self.width)),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        self.read_back()
    }

    fn read_back(&self) -> RenderResult<Vec<u8>> {
        let buffer_slice = self.readback_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::Timeout(e.to_string()))?;
        rx.recv()
            .map_err(|_| RenderError::BufferMapFailed)?
            .map_err(|_| RenderError::BufferMapFailed)?;

        let data = buffer_slice.get_mapped_range();
        let pixels = strip_row_padding(&data, self.width, self.height);
        drop(data);
        self.readback_buffer.unmap();

        Ok(pixels)
    }
}

fn check_color_count(expected: usize, colors: &VertexColors) -> RenderResult<()> {
    if colors.len() == expected {
        Ok(())
    } else {
        Err(RenderError::ColorCountMismatch {
            expected,
            actual: colors.len(),
        })
    }
}

impl FrameRenderer for RenderEngine {
    fn load_mesh(
        &mut self,
        geometry: &GeometryModel,
        colors: &VertexColors,
    ) -> brainsnap_core::Result<()> {
        Ok(self.load(geometry, colors)?)
    }

    fn update_colors(&mut self, colors: &VertexColors) -> brainsnap_core::Result<()> {
        Ok(self.set_colors(colors)?)
    }

    fn set_lighting(&mut self, lighting: &LightingOptions) {
        RenderEngine::set_lighting(self, *lighting);
    }

    fn render_frame(&mut self, state: &ViewState) -> brainsnap_core::Result<Frame> {
        let pixels = self.render(state)?;
        Frame::from_rgba(self.width, self.height, pixels)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        log::debug!("releasing {}x{} render context", self.width, self.height);
    }
}
