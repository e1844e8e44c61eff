use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use pixelgrain_engine::device::with_validation_scope;

use crate::config::ShapeKind;
use crate::interact::MAX_RIPPLES;

use super::common::{alpha_blend, fullscreen_primitive, ubo_min_binding_size};

/// GPU uniform block; layout mirrors `shaders/dither.wgsl` field for field.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DitherUniforms {
    resolution: [f32; 2],
    time: f32,
    pixel_size: f32,
    color: [f32; 3],
    pattern_scale: f32,
    density: f32,
    pixel_jitter: f32,
    ripple_speed: f32,
    ripple_thickness: f32,
    ripple_intensity: f32,
    edge_fade: f32,
    top_fade: f32,
    shape_type: u32,
    enable_ripples: u32,
    _pad: [f32; 3],
    ripples: [[f32; 4]; MAX_RIPPLES],
}

/// Per-frame parameters for the dither pass.
pub struct DitherParams<'a> {
    pub resolution: (u32, u32),
    pub time: f32,
    /// Dither pixel size in render-target pixels (already ratio-scaled).
    pub pixel_size: f32,
    pub color: [f32; 3],
    pub pattern_scale: f32,
    pub density: f32,
    pub pixel_jitter: f32,
    pub ripple_speed: f32,
    pub ripple_thickness: f32,
    pub ripple_intensity: f32,
    pub edge_fade: f32,
    pub top_fade: f32,
    pub shape: ShapeKind,
    pub enable_ripples: bool,
    pub ripples: &'a [[f32; 4]; MAX_RIPPLES],
}

/// Fullscreen Bayer-dither pass.
pub struct DitherPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    ubo: wgpu::Buffer,
}

impl DitherPipeline {
    /// Builds the pipeline against `target_format`.
    ///
    /// Runs under a validation scope so shader or layout errors fail the
    /// mount instead of surfacing later as device errors.
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Result<Self> {
        with_validation_scope(device, "dither pipeline", || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("pixelgrain dither shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/dither.wgsl").into()),
            });

            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("pixelgrain dither bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(ubo_min_binding_size::<DitherUniforms>()),
                        },
                        count: None,
                    }],
                });

            let pipeline_layout =
                device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("pixelgrain dither pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("pixelgrain dither pipeline"),
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
                        format: target_format,
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

            let ubo = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("pixelgrain dither ubo"),
                size: std::mem::size_of::<DitherUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("pixelgrain dither bind group"),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                }],
            });

            Self {
                pipeline,
                bind_group,
                ubo,
            }
        })
    }

    /// Uploads this frame's parameters.
    pub fn update(&self, queue: &wgpu::Queue, params: &DitherParams<'_>) {
        let uniforms = DitherUniforms {
            resolution: [params.resolution.0 as f32, params.resolution.1 as f32],
            time: params.time,
            pixel_size: params.pixel_size,
            color: params.color,
            pattern_scale: params.pattern_scale,
            density: params.density,
            pixel_jitter: params.pixel_jitter,
            ripple_speed: params.ripple_speed,
            ripple_thickness: params.ripple_thickness,
            ripple_intensity: params.ripple_intensity,
            edge_fade: params.edge_fade,
            top_fade: params.top_fade,
            shape_type: params.shape.shader_index(),
            enable_ripples: params.enable_ripples as u32,
            _pad: [0.0; 3],
            ripples: *params.ripples,
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
