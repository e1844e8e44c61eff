use std::time::Instant;

use anyhow::Result;
use rand::Rng;

use pixelgrain_engine::coords::{Color, Vec2, Viewport};
use pixelgrain_engine::input::{InputEvent, MouseButton, MouseButtonState};
use pixelgrain_engine::render::{RenderCtx, RenderTarget};
use pixelgrain_engine::time::EffectClock;

use crate::config::DitherConfig;
use crate::interact::{RippleRing, TouchTrail};
use crate::mount::{Effect, EffectState, ResourceBundle};
use crate::render::{
    ComposePipeline, DitherParams, DitherPipeline, MAX_PIXEL_RATIO, OffscreenTarget, effect_pixels,
};

const SCENE_LABEL: &str = "pixelgrain dither scene";

struct GpuResources {
    dither: DitherPipeline,
    compose: ComposePipeline,
    scene: OffscreenTarget,
}

/// The Bayer-dithered noise background.
///
/// Renders in two passes: the dither pass into an owned offscreen target
/// sized at the capped device pixel ratio, then a composite onto the frame —
/// a plain blit, or the liquid distortion pass when enabled. Pointer presses
/// feed the ripple ring; pointer moves feed the liquid trail.
pub struct DitherField {
    config: DitherConfig,
    color: Color,
    clock: EffectClock,
    ripples: RippleRing,
    trail: Option<TouchTrail>,

    /// Swapchain size the pointer events are measured against.
    surface: Viewport,
    visible: bool,
    state: EffectState,

    gpu: ResourceBundle<GpuResources>,
}

impl DitherField {
    /// Mounts the effect against the current render context.
    ///
    /// All GPU resources are created here, under validation scopes, so a
    /// failure (missing capability, bad shader) surfaces as an `Err` and the
    /// caller can run without the effect.
    pub fn mount(ctx: &RenderCtx<'_>, config: DitherConfig) -> Result<Self> {
        // Desynchronize concurrently mounted instances.
        let offset = rand::rng().random::<f32>();
        let clock = EffectClock::new(offset, config.speed);

        let scene_size = effect_pixels(ctx.viewport, ctx.scale_factor);
        let scene = OffscreenTarget::new(
            ctx.device,
            SCENE_LABEL,
            scene_size,
            wgpu::TextureFormat::Rgba8Unorm,
        );

        let dither = DitherPipeline::new(ctx.device, scene.format())?;
        let mut compose = ComposePipeline::new(ctx.device, ctx.surface_format, config.liquid)?;
        compose.set_scene(ctx.device, scene.view());

        let trail = config.liquid.then(|| {
            let mut t = TouchTrail::new();
            t.set_radius_scale(config.liquid_radius);
            t
        });

        log::debug!(
            "dither field mounted: {}x{} target, liquid={}",
            scene_size.0,
            scene_size.1,
            config.liquid
        );

        let color = config.color;
        Ok(Self {
            config,
            color,
            clock,
            ripples: RippleRing::new(),
            trail,
            surface: ctx.viewport,
            visible: true,
            state: EffectState::Running,
            gpu: ResourceBundle::new(GpuResources {
                dither,
                compose,
                scene,
            }),
        })
    }

    /// Maps a pointer position from surface pixels into scene-target pixels.
    fn to_scene(&self, x: f32, y: f32) -> Option<Vec2> {
        let gpu = self.gpu.get()?;
        if !self.surface.is_valid() {
            return None;
        }
        let (sw, sh) = gpu.scene.size();
        Some(Vec2::new(
            x / self.surface.width * sw as f32,
            y / self.surface.height * sh as f32,
        ))
    }

    fn clear_color(&self) -> wgpu::Color {
        if self.config.transparent {
            wgpu::Color::TRANSPARENT
        } else {
            wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            }
        }
    }
}

impl Effect for DitherField {
    fn handle_event(&mut self, ev: &InputEvent) {
        if self.state != EffectState::Running {
            return;
        }

        match ev {
            InputEvent::PointerButton(btn)
                if btn.button == MouseButton::Left && btn.state == MouseButtonState::Pressed =>
            {
                if let Some(pos) = self.to_scene(btn.x, btn.y) {
                    self.ripples.push(pos, self.clock.elapsed());
                }
            }

            InputEvent::PointerMoved(mv) => {
                if let Some(trail) = &mut self.trail {
                    if self.surface.is_valid() {
                        trail.add_touch(Vec2::new(
                            mv.x / self.surface.width,
                            mv.y / self.surface.height,
                        ));
                    }
                }
            }

            InputEvent::VisibilityChanged(v) => {
                self.visible = *v;
                self.clock.set_visible(*v);
            }

            _ => {}
        }
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, now: Instant) {
        if self.state != EffectState::Running || !self.visible {
            return;
        }

        self.surface = ctx.viewport;
        let clear_color = self.clear_color();

        let Some(gpu) = self.gpu.get_mut() else {
            return;
        };

        // Track the surface: the scene target follows the swapchain size at
        // the capped pixel ratio, and the composite rebinds on change.
        let scene_size = effect_pixels(ctx.viewport, ctx.scale_factor);
        if gpu.scene.ensure_size(ctx.device, SCENE_LABEL, scene_size) {
            gpu.compose.set_scene(ctx.device, gpu.scene.view());
            log::debug!("dither scene resized to {}x{}", scene_size.0, scene_size.1);
        }

        let time = self.clock.elapsed_at(now);

        // Trail advancement always precedes the draw that samples it.
        if let Some(trail) = &mut self.trail {
            trail.update();
            gpu.compose.upload_trail(ctx.queue, trail.pixels());
            gpu.compose.update_liquid(
                ctx.queue,
                self.config.liquid_strength,
                time,
                self.config.liquid_wobble_speed,
            );
        }

        let ratio = if ctx.scale_factor > 0.0 {
            ctx.scale_factor.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };

        gpu.dither.update(
            ctx.queue,
            &DitherParams {
                resolution: scene_size,
                time,
                pixel_size: self.config.pixel_size * ratio,
                color: self.color.rgb_array(),
                pattern_scale: self.config.pattern_scale,
                density: self.config.pattern_density,
                pixel_jitter: self.config.pixel_jitter,
                ripple_speed: self.config.ripple_speed,
                ripple_thickness: self.config.ripple_thickness,
                ripple_intensity: self.config.ripple_intensity,
                edge_fade: self.config.edge_fade,
                top_fade: self.config.top_fade,
                shape: self.config.shape,
                enable_ripples: self.config.enable_ripples,
                ripples: &self.ripples.as_uniform(),
            },
        );

        // Pass 1: dither into the offscreen scene.
        {
            let mut rpass = target
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("pixelgrain dither pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: gpu.scene.view(),
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear_color),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });
            gpu.dither.draw(&mut rpass);
        }

        // Pass 2: composite onto the frame.
        {
            let mut rpass = target
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("pixelgrain composite pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.color_view,
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
                    multiview_mask: None,
                });
            gpu.compose.draw(&mut rpass);
        }
    }

    fn dispose(&mut self) {
        if self.state == EffectState::Stopped {
            return;
        }
        self.state = EffectState::Stopped;
        self.gpu.release();
        self.trail = None;
        log::debug!("dither field disposed");
    }

    fn state(&self) -> EffectState {
        self.state
    }
}

impl Drop for DitherField {
    fn drop(&mut self) {
        self.dispose();
    }
}
