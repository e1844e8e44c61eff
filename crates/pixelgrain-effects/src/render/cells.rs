use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use pixelgrain_engine::device::with_validation_scope;

use super::common::{alpha_blend, fullscreen_primitive, ubo_min_binding_size};

/// GPU uniform block; layout mirrors `shaders/cells.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CellsUniforms {
    origin: [f32; 2],
    cell_px: f32,
    quantize: f32,
    grid_size: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 3],
    _pad2: f32,
}

/// Per-frame parameters for a cell-grid draw.
pub struct CellsParams {
    /// Top-left of the drawn rect in frame pixels.
    pub origin: (f32, f32),
    /// Cell edge length in frame pixels.
    pub cell_px: f32,
    /// Threshold texels at 0.5 (binary states) instead of using them as
    /// continuous alpha.
    pub quantize: bool,
    pub color: [f32; 3],
}

/// Nearest-neighbor upsample of an intensity grid (one texel per cell).
///
/// Owns the grid state texture; the caller uploads raw intensity bytes
/// (0..255) whenever its CPU-side grid changes.
pub struct CellsPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    ubo: wgpu::Buffer,
    grid_tex: wgpu::Texture,
    cols: u32,
    rows: u32,
}

impl CellsPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        cols: u32,
        rows: u32,
    ) -> Result<Self> {
        with_validation_scope(device, "cells pipeline", || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("pixelgrain cells shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cells.wgsl").into()),
            });

            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("pixelgrain cells bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: Some(ubo_min_binding_size::<CellsUniforms>()),
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                // textureLoad only; no sampler, no filtering.
                                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                    ],
                });

            let pipeline_layout =
                device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("pixelgrain cells pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("pixelgrain cells pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: fullscreen_primitive(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

            let grid_tex = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("pixelgrain cells state texture"),
                size: wgpu::Extent3d {
                    width: cols,
                    height: rows,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            let grid_view = grid_tex.create_view(&wgpu::TextureViewDescriptor::default());

            let ubo = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("pixelgrain cells ubo"),
                size: std::mem::size_of::<CellsUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("pixelgrain cells bind group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: ubo.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&grid_view),
                    },
                ],
            });

            Self {
                pipeline,
                bind_group,
                ubo,
                grid_tex,
                cols,
                rows,
            }
        })
    }

    /// Uploads a full grid of intensity bytes (row-major, `cols × rows`).
    pub fn upload(&self, queue: &wgpu::Queue, intensities: &[u8]) {
        debug_assert_eq!(intensities.len(), (self.cols * self.rows) as usize);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.grid_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            intensities,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.cols),
                rows_per_image: Some(self.rows),
            },
            wgpu::Extent3d {
                width: self.cols,
                height: self.rows,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Uploads this frame's draw parameters.
    pub fn update(&self, queue: &wgpu::Queue, params: &CellsParams) {
        let uniforms = CellsUniforms {
            origin: [params.origin.0, params.origin.1],
            cell_px: params.cell_px,
            quantize: if params.quantize { 1.0 } else { 0.0 },
            grid_size: [self.cols as f32, self.rows as f32],
            _pad: [0.0; 2],
            color: params.color,
            _pad2: 0.0,
        };
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Records the fullscreen draw into an already-begun pass.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}
