use std::time::{Duration, Instant};

use anyhow::Result;

use pixelgrain_engine::coords::Color;
use pixelgrain_engine::input::InputEvent;
use pixelgrain_engine::render::{RenderCtx, RenderTarget};
use pixelgrain_engine::time::StepTimer;

use crate::config::LifeConfig;
use crate::life::{GLIDER_GUN, GUN_ORIGIN, LifeGrid};
use crate::mount::{Effect, EffectState, ResourceBundle};
use crate::render::{CellsParams, CellsPipeline, MAX_PIXEL_RATIO};

/// The cellular automaton overlay.
///
/// The grid steps on its own wall-clock interval, decoupled from the display
/// rate; the display pass upsamples the current generation every frame, so
/// the image holds still between simulation ticks. The grid itself lives on
/// the CPU (where it is testable); only the one-byte-per-cell state crosses
/// to the GPU, and only on generations that actually changed.
pub struct LifeField {
    config: LifeConfig,
    color: Color,
    grid: LifeGrid,
    timer: StepTimer,

    /// Overlay origin in reference pixels (scaled by the DPR at render).
    origin: (f32, f32),

    visible: bool,
    dirty: bool,
    state: EffectState,

    gpu: ResourceBundle<CellsPipeline>,
}

impl LifeField {
    /// Mounts the automaton, seeded with the glider gun.
    pub fn mount(ctx: &RenderCtx<'_>, config: LifeConfig) -> Result<Self> {
        let mut grid = LifeGrid::new(config.columns, config.rows);
        grid.seed(&GLIDER_GUN, GUN_ORIGIN);

        let pipeline = CellsPipeline::new(
            ctx.device,
            ctx.surface_format,
            config.columns as u32,
            config.rows as u32,
        )?;

        let timer = StepTimer::new(Duration::from_millis(config.step_interval_ms));

        log::debug!(
            "life field mounted: {}x{} cells, {}ms step",
            config.columns,
            config.rows,
            config.step_interval_ms
        );

        let color = config.cell_color;
        Ok(Self {
            config,
            color,
            grid,
            timer,
            origin: (0.0, 0.0),
            visible: true,
            dirty: true,
            state: EffectState::Running,
            gpu: ResourceBundle::new(pipeline),
        })
    }

    /// Places the overlay's top-left corner, in reference pixels.
    pub fn set_origin(&mut self, origin: (f32, f32)) {
        self.origin = origin;
    }

    /// Read access for hosts that want to inspect the simulation.
    pub fn grid(&self) -> &LifeGrid {
        &self.grid
    }
}

impl Effect for LifeField {
    fn handle_event(&mut self, ev: &InputEvent) {
        if self.state != EffectState::Running {
            return;
        }
        if let InputEvent::VisibilityChanged(v) = ev {
            self.visible = *v;
        }
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, now: Instant) {
        if self.state != EffectState::Running || !self.visible {
            return;
        }

        // Simulation advances before this frame's draw, never during it.
        if self.timer.due_at(now) {
            self.grid.step();
            self.dirty = true;
        }

        let Some(pipeline) = self.gpu.get_mut() else {
            return;
        };

        if self.dirty {
            let intensities: Vec<u8> = self
                .grid
                .cells()
                .iter()
                .map(|&c| if c != 0 { 255 } else { 0 })
                .collect();
            pipeline.upload(ctx.queue, &intensities);
            self.dirty = false;
        }

        let ratio = if ctx.scale_factor > 0.0 {
            ctx.scale_factor.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };

        pipeline.update(
            ctx.queue,
            &CellsParams {
                origin: (
                    self.origin.0 * ctx.scale_factor,
                    self.origin.1 * ctx.scale_factor,
                ),
                cell_px: self.config.cell_size * ratio,
                quantize: true,
                color: self.color.rgb_array(),
            },
        );

        let mut rpass = target
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pixelgrain life pass"),
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
        pipeline.draw(&mut rpass);
    }

    fn dispose(&mut self) {
        if self.state == EffectState::Stopped {
            return;
        }
        self.state = EffectState::Stopped;
        self.gpu.release();
        log::debug!("life field disposed");
    }

    fn state(&self) -> EffectState {
        self.state
    }
}

impl Drop for LifeField {
    fn drop(&mut self) {
        self.dispose();
    }
}
