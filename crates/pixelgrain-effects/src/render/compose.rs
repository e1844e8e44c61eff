use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use pixelgrain_engine::device::with_validation_scope;

use crate::interact::TOUCH_TEXTURE_SIZE;

use super::common::{alpha_blend, fullscreen_primitive, ubo_min_binding_size};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LiquidUniforms {
    strength: f32,
    time: f32,
    freq: f32,
    _pad: f32,
}

/// Composite pass: samples the effect's offscreen target onto the frame,
/// either as a plain blit or through the liquid distortion shader.
///
/// The scene bind group references the offscreen view, so it must be rebuilt
/// through [`set_scene`](Self::set_scene) whenever the target is recreated.
pub struct ComposePipeline {
    sampler: wgpu::Sampler,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bgl: wgpu::BindGroupLayout,
    blit_bind: Option<wgpu::BindGroup>,
    liquid: Option<LiquidPass>,
}

struct LiquidPass {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    bind: Option<wgpu::BindGroup>,
    ubo: wgpu::Buffer,
    trail_tex: wgpu::Texture,
    trail_view: wgpu::TextureView,
}

impl ComposePipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        liquid: bool,
    ) -> Result<Self> {
        with_validation_scope(device, "composite pipeline", || {
            let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("pixelgrain compose sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            });

            let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("pixelgrain blit shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
            });

            let blit_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("pixelgrain blit bgl"),
                entries: &[
                    sampler_entry(0),
                    texture_entry(1),
                ],
            });

            let blit_pipeline =
                build_pipeline(device, "blit", &blit_shader, &blit_bgl, surface_format);

            let liquid = if liquid {
                let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("pixelgrain liquid shader"),
                    source: wgpu::ShaderSource::Wgsl(include_str!("shaders/liquid.wgsl").into()),
                });

                let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("pixelgrain liquid bgl"),
                    entries: &[
                        sampler_entry(0),
                        texture_entry(1),
                        texture_entry(2),
                        wgpu::BindGroupLayoutEntry {
                            binding: 3,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: Some(ubo_min_binding_size::<LiquidUniforms>()),
                            },
                            count: None,
                        },
                    ],
                });

                let pipeline = build_pipeline(device, "liquid", &shader, &bgl, surface_format);

                let ubo = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("pixelgrain liquid ubo"),
                    size: std::mem::size_of::<LiquidUniforms>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });

                let trail_tex = device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("pixelgrain trail texture"),
                    size: wgpu::Extent3d {
                        width: TOUCH_TEXTURE_SIZE as u32,
                        height: TOUCH_TEXTURE_SIZE as u32,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8Unorm,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                });
                let trail_view = trail_tex.create_view(&wgpu::TextureViewDescriptor::default());

                Some(LiquidPass {
                    pipeline,
                    bgl,
                    bind: None,
                    ubo,
                    trail_tex,
                    trail_view,
                })
            } else {
                None
            };

            Self {
                sampler,
                blit_pipeline,
                blit_bgl,
                blit_bind: None,
                liquid,
            }
        })
    }

    /// (Re)binds the offscreen scene view. Must be called at mount and after
    /// every target resize.
    pub fn set_scene(&mut self, device: &wgpu::Device, scene_view: &wgpu::TextureView) {
        self.blit_bind = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pixelgrain blit bind group"),
            layout: &self.blit_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(scene_view),
                },
            ],
        }));

        if let Some(liquid) = &mut self.liquid {
            liquid.bind = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("pixelgrain liquid bind group"),
                layout: &liquid.bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(scene_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&liquid.trail_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: liquid.ubo.as_entire_binding(),
                    },
                ],
            }));
        }
    }

    pub fn has_liquid(&self) -> bool {
        self.liquid.is_some()
    }

    /// Uploads the trail raster (RGBA8, `TOUCH_TEXTURE_SIZE`²). No-op when
    /// the liquid pass is disabled.
    pub fn upload_trail(&self, queue: &wgpu::Queue, pixels: &[u8]) {
        let Some(liquid) = &self.liquid else { return };

        let side = TOUCH_TEXTURE_SIZE as u32;
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &liquid.trail_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(side * 4),
                rows_per_image: Some(side),
            },
            wgpu::Extent3d {
                width: side,
                height: side,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Uploads the liquid wobble parameters for this frame.
    pub fn update_liquid(&self, queue: &wgpu::Queue, strength: f32, time: f32, freq: f32) {
        let Some(liquid) = &self.liquid else { return };
        let uniforms = LiquidUniforms {
            strength,
            time,
            freq,
            _pad: 0.0,
        };
        queue.write_buffer(&liquid.ubo, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Records the composite draw. Liquid takes precedence when enabled.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if let Some(liquid) = &self.liquid {
            let Some(bind) = &liquid.bind else {
                log::warn!("composite drawn before set_scene; skipping");
                return;
            };
            rpass.set_pipeline(&liquid.pipeline);
            rpass.set_bind_group(0, bind, &[]);
            rpass.draw(0..3, 0..1);
            return;
        }

        let Some(bind) = &self.blit_bind else {
            log::warn!("composite drawn before set_scene; skipping");
            return;
        };
        rpass.set_pipeline(&self.blit_pipeline);
        rpass.set_bind_group(0, bind, &[]);
        rpass.draw(0..3, 0..1);
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
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

fn build_pipeline(
    device: &wgpu::Device,
    name: &str,
    shader: &wgpu::ShaderModule,
    bgl: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pixelgrain compose pipeline layout"),
        bind_group_layouts: &[bgl],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("pixelgrain {name} pipeline")),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
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
    })
}
