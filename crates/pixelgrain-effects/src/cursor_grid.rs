use std::time::{Duration, Instant};

use anyhow::Result;

use pixelgrain_engine::coords::{Color, Viewport};
use pixelgrain_engine::input::InputEvent;
use pixelgrain_engine::render::{RenderCtx, RenderTarget};

use crate::config::CursorGridConfig;
use crate::mount::{Effect, EffectState, ResourceBundle};
use crate::render::{CellsParams, CellsPipeline};

/// Resize debounce: pointer-driven surfaces resize in bursts, and a rebuild
/// drops all lit cells, so wait for the burst to settle.
const REBUILD_DEBOUNCE: Duration = Duration::from_millis(200);

/// Pure cell-highlight state: which grid cells are lit and until when.
///
/// Cells are square, sized so `columns` of them span the surface width; the
/// row count follows from the height. A pointer move lights the cell under
/// the cursor plus every cell on the line from the previously lit cell, so
/// fast motion leaves no gaps.
struct CellTracker {
    columns: usize,
    rows: usize,
    cell: f32,
    expiries: Vec<Option<Instant>>,
    prev: Option<(i32, i32)>,
    fade: Duration,
}

impl CellTracker {
    fn new(columns: usize, fade: Duration) -> Self {
        Self {
            columns: columns.max(1),
            rows: 0,
            cell: 0.0,
            expiries: Vec::new(),
            prev: None,
            fade,
        }
    }

    /// Sizes the grid to a surface, dropping all lit cells and the previous
    /// pointer cell.
    fn rebuild(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            self.rows = 0;
            self.cell = 0.0;
            self.expiries.clear();
            self.prev = None;
            return;
        }

        self.cell = width / self.columns as f32;
        self.rows = ((height / self.cell).ceil() as usize).max(1);
        self.expiries = vec![None; self.columns * self.rows];
        self.prev = None;
    }

    fn is_sized(&self) -> bool {
        self.rows > 0 && self.cell > 0.0
    }

    fn light(&mut self, col: i32, row: i32, now: Instant) {
        if col < 0 || row < 0 || col as usize >= self.columns || row as usize >= self.rows {
            return;
        }
        self.expiries[row as usize * self.columns + col as usize] = Some(now + self.fade);
    }

    /// Lights every cell on the max-axis interpolated line between two cells.
    fn light_line(&mut self, from: (i32, i32), to: (i32, i32), now: Instant) {
        let dx = (to.0 - from.0).abs();
        let dy = (to.1 - from.1).abs();
        let steps = dx.max(dy);

        for i in 0..=steps {
            let t = if steps == 0 {
                0.0
            } else {
                i as f32 / steps as f32
            };
            let col = (from.0 as f32 + (to.0 - from.0) as f32 * t).round() as i32;
            let row = (from.1 as f32 + (to.1 - from.1) as f32 * t).round() as i32;
            self.light(col, row, now);
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32, now: Instant) {
        if !self.is_sized() {
            return;
        }

        let col = (x / self.cell).floor() as i32;
        let row = (y / self.cell).floor() as i32;

        // Movement within one cell is a no-op.
        if self.prev == Some((col, row)) {
            return;
        }

        match self.prev {
            Some(prev) => self.light_line(prev, (col, row), now),
            None => self.light(col, row, now),
        }

        self.prev = Some((col, row));
    }

    /// Snapshot of the grid as intensity bytes: 255 while a cell's fade has
    /// not expired, 0 after.
    fn intensities(&self, now: Instant) -> Vec<u8> {
        self.expiries
            .iter()
            .map(|e| match e {
                Some(expiry) if *expiry > now => 255,
                _ => 0,
            })
            .collect()
    }

    fn any_lit(&self, now: Instant) -> bool {
        self.expiries
            .iter()
            .any(|e| matches!(e, Some(expiry) if *expiry > now))
    }
}

/// The cursor grid highlight.
///
/// A faint pixel-grid that lights up under the pointer and goes dark again
/// after a fixed delay. Rendering reuses the cell-upsample pipeline; the
/// grid is rebuilt (debounced) when the surface size changes.
pub struct CursorGrid {
    color: Color,
    tracker: CellTracker,

    surface: Viewport,
    rebuild_at: Option<Instant>,
    visible: bool,
    state: EffectState,

    gpu: ResourceBundle<CellsPipeline>,
}

impl CursorGrid {
    pub fn mount(ctx: &RenderCtx<'_>, config: CursorGridConfig) -> Result<Self> {
        let mut tracker = CellTracker::new(
            config.columns,
            Duration::from_millis(config.fade_ms),
        );
        tracker.rebuild(ctx.viewport.width, ctx.viewport.height);

        let pipeline = CellsPipeline::new(
            ctx.device,
            ctx.surface_format,
            tracker.columns as u32,
            tracker.rows.max(1) as u32,
        )?;

        log::debug!(
            "cursor grid mounted: {}x{} cells",
            tracker.columns,
            tracker.rows
        );

        Ok(Self {
            color: config.color,
            tracker,
            surface: ctx.viewport,
            rebuild_at: None,
            visible: true,
            state: EffectState::Running,
            gpu: ResourceBundle::new(pipeline),
        })
    }
}

impl Effect for CursorGrid {
    fn handle_event(&mut self, ev: &InputEvent) {
        if self.state != EffectState::Running {
            return;
        }

        match ev {
            InputEvent::PointerMoved(mv) => {
                self.tracker.pointer_move(mv.x, mv.y, Instant::now());
            }
            InputEvent::VisibilityChanged(v) => {
                self.visible = *v;
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

        // Debounced rebuild on surface change.
        if ctx.viewport != self.surface {
            self.surface = ctx.viewport;
            self.rebuild_at = Some(now + REBUILD_DEBOUNCE);
        }
        if let Some(at) = self.rebuild_at {
            if now >= at {
                self.rebuild_at = None;
                self.tracker.rebuild(self.surface.width, self.surface.height);

                match CellsPipeline::new(
                    ctx.device,
                    ctx.surface_format,
                    self.tracker.columns as u32,
                    self.tracker.rows.max(1) as u32,
                ) {
                    Ok(pipeline) => {
                        self.gpu = ResourceBundle::new(pipeline);
                    }
                    Err(e) => {
                        log::error!("cursor grid rebuild failed, disposing: {e:#}");
                        self.dispose();
                        return;
                    }
                }
            }
        }

        if !self.tracker.is_sized() {
            return;
        }
        let Some(pipeline) = self.gpu.get_mut() else {
            return;
        };

        // Nothing lit and nothing expiring: leave the frame untouched.
        if !self.tracker.any_lit(now) {
            return;
        }

        pipeline.upload(ctx.queue, &self.tracker.intensities(now));
        pipeline.update(
            ctx.queue,
            &CellsParams {
                origin: (0.0, 0.0),
                cell_px: self.tracker.cell,
                quantize: true,
                color: self.color.rgb_array(),
            },
        );

        let mut rpass = target
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pixelgrain cursor grid pass"),
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
        log::debug!("cursor grid disposed");
    }

    fn state(&self) -> EffectState {
        self.state
    }
}

impl Drop for CursorGrid {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> CellTracker {
        let mut t = CellTracker::new(10, Duration::from_millis(300));
        // 10 columns over 100px → 10px cells, 10 rows over 100px height.
        t.rebuild(100.0, 100.0);
        t
    }

    fn lit_count(t: &CellTracker, now: Instant) -> usize {
        t.intensities(now).iter().filter(|&&v| v == 255).count()
    }

    #[test]
    fn first_move_lights_one_cell() {
        let mut t = tracker();
        let now = Instant::now();
        t.pointer_move(25.0, 35.0, now);

        assert_eq!(lit_count(&t, now), 1);
        assert_eq!(t.intensities(now)[3 * 10 + 2], 255);
    }

    #[test]
    fn same_cell_move_is_a_no_op() {
        let mut t = tracker();
        let now = Instant::now();
        t.pointer_move(25.0, 35.0, now);
        // Different position, same cell.
        t.pointer_move(28.0, 31.0, now);

        assert_eq!(lit_count(&t, now), 1);
    }

    #[test]
    fn diagonal_move_lights_every_cell_on_the_line() {
        let mut t = tracker();
        let now = Instant::now();
        t.pointer_move(5.0, 5.0, now);
        // (0,0) → (4,4): interpolation fills the diagonal, n+1 cells total.
        t.pointer_move(45.0, 45.0, now);

        assert_eq!(lit_count(&t, now), 5);
        for i in 0..5 {
            assert_eq!(t.intensities(now)[i * 10 + i], 255, "cell ({i},{i}) dark");
        }
    }

    #[test]
    fn horizontal_sweep_leaves_no_gaps() {
        let mut t = tracker();
        let now = Instant::now();
        t.pointer_move(5.0, 55.0, now);
        // Jump across 7 columns in one event.
        t.pointer_move(75.0, 55.0, now);

        for col in 0..=7 {
            assert_eq!(t.intensities(now)[5 * 10 + col], 255, "gap at column {col}");
        }
    }

    #[test]
    fn cells_expire_after_fade() {
        let mut t = tracker();
        let now = Instant::now();
        t.pointer_move(25.0, 35.0, now);

        let before = now + Duration::from_millis(299);
        let after = now + Duration::from_millis(301);
        assert_eq!(lit_count(&t, before), 1);
        assert_eq!(lit_count(&t, after), 0);
        assert!(!t.any_lit(after));
    }

    #[test]
    fn rebuild_resets_the_previous_cell() {
        let mut t = tracker();
        let now = Instant::now();
        t.pointer_move(5.0, 5.0, now);

        t.rebuild(100.0, 100.0);
        assert_eq!(lit_count(&t, now), 0);

        // No stale interpolation from the pre-rebuild cell.
        t.pointer_move(95.0, 95.0, now);
        assert_eq!(lit_count(&t, now), 1);
    }

    #[test]
    fn out_of_bounds_moves_are_clamped_away() {
        let mut t = tracker();
        let now = Instant::now();
        t.pointer_move(-5.0, 250.0, now);
        assert_eq!(lit_count(&t, now), 0);
    }
}
