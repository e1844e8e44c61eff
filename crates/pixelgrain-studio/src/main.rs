use anyhow::Result;
use winit::dpi::LogicalSize;

use pixelgrain_effects::config::{CursorGridConfig, DitherConfig, LifeConfig, ShapeKind};
use pixelgrain_effects::mount::Effect;
use pixelgrain_effects::{CursorGrid, DitherField, LifeField};
use pixelgrain_engine::coords::Color;
use pixelgrain_engine::core::{App, AppControl, FrameCtx};
use pixelgrain_engine::device::GpuInit;
use pixelgrain_engine::input::{InputEvent, Key};
use pixelgrain_engine::logging::{LoggingConfig, init_logging};
use pixelgrain_engine::render::RenderCtx;
use pixelgrain_engine::window::{Runtime, RuntimeConfig};

/// Site background the effects composite over.
const CLEAR: Color = Color::from_linear(1.0, 0.984, 0.945, 1.0);

/// Color the dither pattern flips to while the pointer is in the dark
/// section of the page (the site swaps black for yellow there).
const DARK_SECTION_COLOR: &str = "#FFEE00";
const BASE_COLOR: &str = "#000000";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  pixelgrain studio");
    println!("  ─────────────────────────────────────────");
    println!("  1-4   dither shape (square/circle/tri/diamond)");
    println!("  L     toggle liquid distortion (remounts)");
    println!("  G     toggle automaton overlay");
    println!("  C     toggle cursor grid");
    println!("  click ripples · move drives liquid/cursor trails");
    println!("  Esc   quit");
    println!();

    Runtime::run(
        RuntimeConfig {
            title: "pixelgrain studio".to_string(),
            initial_size: LogicalSize::new(1100.0, 700.0),
            transparent: false,
        },
        GpuInit::default(),
        StudioApp::new(),
    )
}

/// Independently mounted effects; any of them may be absent if its mount
/// failed (the page runs without it).
#[derive(Default)]
struct EffectStack {
    dither: Option<DitherField>,
    life: Option<LifeField>,
    cursor: Option<CursorGrid>,
}

impl EffectStack {
    /// All mounted effects as lifecycle handles, for uniform event routing.
    fn handles(&mut self) -> impl Iterator<Item = &mut dyn Effect> {
        let dither = self.dither.as_mut().map(|e| e as &mut dyn Effect);
        let life = self.life.as_mut().map(|e| e as &mut dyn Effect);
        let cursor = self.cursor.as_mut().map(|e| e as &mut dyn Effect);
        [dither, life, cursor].into_iter().flatten()
    }
}

/// Swaps a live color when the observed page section changes, without
/// remounting the effect.
struct SectionWatcher {
    inside: bool,
    base: Color,
    section: Color,
}

impl SectionWatcher {
    fn new(base: Color, section: Color) -> Self {
        Self {
            inside: false,
            base,
            section,
        }
    }

    /// Feeds the current observation; returns the color to apply when the
    /// section state flipped.
    fn observe(&mut self, inside: bool) -> Option<Color> {
        if inside == self.inside {
            return None;
        }
        self.inside = inside;
        Some(if inside { self.section } else { self.base })
    }
}

struct StudioApp {
    effects: EffectStack,
    mounted: bool,
    watcher: SectionWatcher,

    shape: ShapeKind,
    liquid: bool,
    show_life: bool,
    show_cursor: bool,

    /// Set when a mount-level knob changed; the dither field remounts on the
    /// next frame.
    remount_dither: bool,
}

impl StudioApp {
    fn new() -> Self {
        let base = Color::from_hex(BASE_COLOR).expect("base color literal");
        let section = Color::from_hex(DARK_SECTION_COLOR).expect("section color literal");

        Self {
            effects: EffectStack::default(),
            mounted: false,
            watcher: SectionWatcher::new(base, section),
            shape: ShapeKind::Square,
            liquid: false,
            show_life: true,
            show_cursor: true,
            remount_dither: false,
        }
    }

    fn dither_config(&self) -> DitherConfig {
        DitherConfig {
            shape: self.shape,
            liquid: self.liquid,
            ..DitherConfig::default()
        }
    }

    /// Mounts on the first frame (the GPU context only exists inside the
    /// render callback) and services remount requests after config changes.
    fn ensure_mounted(&mut self, rctx: &RenderCtx<'_>) {
        if !self.mounted {
            self.mounted = true;

            self.effects.dither = DitherField::mount(rctx, self.dither_config())
                .map_err(|e| log::error!("dither field unavailable: {e:#}"))
                .ok();

            self.effects.life = LifeField::mount(rctx, LifeConfig::default())
                .map(|mut e| {
                    e.set_origin((24.0, 24.0));
                    e
                })
                .map_err(|e| log::error!("life field unavailable: {e:#}"))
                .ok();

            self.effects.cursor = CursorGrid::mount(rctx, CursorGridConfig::default())
                .map_err(|e| log::error!("cursor grid unavailable: {e:#}"))
                .ok();
        }

        if self.remount_dither {
            self.remount_dither = false;
            if let Some(old) = &mut self.effects.dither {
                old.dispose();
            }
            self.effects.dither = DitherField::mount(rctx, self.dither_config())
                .map_err(|e| log::error!("dither field remount failed: {e:#}"))
                .ok();
        }
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        for key in &ctx.input_frame.keys_pressed {
            match key {
                Key::Escape => return AppControl::Exit,

                Key::Digit1 => self.set_shape(ShapeKind::Square),
                Key::Digit2 => self.set_shape(ShapeKind::Circle),
                Key::Digit3 => self.set_shape(ShapeKind::Triangle),
                Key::Digit4 => self.set_shape(ShapeKind::Diamond),

                Key::L => {
                    self.liquid = !self.liquid;
                    self.remount_dither = true;
                }
                Key::G => self.show_life = !self.show_life,
                Key::C => self.show_cursor = !self.show_cursor,

                _ => {}
            }
        }
        AppControl::Continue
    }

    fn set_shape(&mut self, shape: ShapeKind) {
        if self.shape != shape {
            self.shape = shape;
            self.remount_dither = true;
        }
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_keys(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        // Route this frame's pointer/visibility events to every effect.
        for ev in &ctx.input_frame.events {
            if matches!(
                ev,
                InputEvent::PointerMoved(_)
                    | InputEvent::PointerButton(_)
                    | InputEvent::PointerLeft
                    | InputEvent::VisibilityChanged(_)
            ) {
                for effect in self.effects.handles() {
                    effect.handle_event(ev);
                }
            }
        }

        // Dark-section observer: the lower half of the window stands in for
        // the page section that swaps the accent color.
        let (_, height) = ctx.window.physical_size();
        let in_dark = ctx
            .input
            .pointer_pos
            .map(|(_, y)| y > height as f32 * 0.5)
            .unwrap_or(false);
        if let Some(color) = self.watcher.observe(in_dark) {
            if let Some(dither) = &mut self.effects.dither {
                dither.set_color(color);
            }
            if let Some(cursor) = &mut self.effects.cursor {
                cursor.set_color(color);
            }
        }

        let now = ctx.time.now;
        let show_life = self.show_life;
        let show_cursor = self.show_cursor;

        ctx.render(CLEAR, |rctx, target| {
            self.ensure_mounted(rctx);

            if let Some(dither) = &mut self.effects.dither {
                dither.frame(rctx, target, now);
            }
            if show_life {
                if let Some(life) = &mut self.effects.life {
                    life.frame(rctx, target, now);
                }
            }
            if show_cursor {
                if let Some(cursor) = &mut self.effects.cursor {
                    cursor.frame(rctx, target, now);
                }
            }
        })
    }
}
