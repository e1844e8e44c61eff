//! Effect lifecycle contract.
//!
//! Every effect follows the same state machine: `mount` puts it in
//! `Running`, `dispose` moves it to `Stopped`, and `Stopped` is terminal —
//! a disposed effect is never restarted, and every routed call after
//! dispose is a no-op. GPU resources live in a [`ResourceBundle`] so the
//! release happens exactly once no matter how many paths trigger it.

use std::time::Instant;

use pixelgrain_engine::coords::Color;
use pixelgrain_engine::input::InputEvent;
use pixelgrain_engine::render::{RenderCtx, RenderTarget};

/// Per-instance lifecycle state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EffectState {
    Running,
    /// Terminal: never re-entered.
    Stopped,
}

/// Contract shared by all mounted effects.
///
/// The host routes platform events and frame ticks through this trait; an
/// effect owns everything else (clocks, trackers, GPU resources). `frame`
/// must tolerate being called while a dispose is in flight — effects check
/// their state before touching the GPU.
pub trait Effect {
    /// Routes a pointer/visibility event to the effect.
    fn handle_event(&mut self, ev: &InputEvent);

    /// Live-updates the effect color without a remount.
    fn set_color(&mut self, color: Color);

    /// Renders one frame. Must be a no-op once disposed or while hidden.
    fn frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, now: Instant);

    /// Releases every acquired resource. Idempotent: the second and later
    /// calls perform no GPU work.
    fn dispose(&mut self);

    fn state(&self) -> EffectState;

    fn is_running(&self) -> bool {
        self.state() == EffectState::Running
    }
}

/// Exactly-once resource holder.
///
/// Wraps the GPU resources of a mounted effect; `release` hands back `true`
/// only on the first call, so double-dispose cannot double-free and cannot
/// issue GPU calls. Dropping the bundle releases implicitly (RAII).
#[derive(Debug)]
pub struct ResourceBundle<T> {
    inner: Option<T>,
}

impl<T> ResourceBundle<T> {
    pub fn new(resources: T) -> Self {
        Self {
            inner: Some(resources),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.inner.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.inner.as_mut()
    }

    /// Drops the held resources. Returns whether this call released them.
    pub fn release(&mut self) -> bool {
        self.inner.take().is_some()
    }

    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal effect following the canonical lifecycle implementation:
    /// terminal state flag + resource bundle.
    struct ProbeEffect {
        state: EffectState,
        gpu: ResourceBundle<()>,
        releases: u32,
    }

    impl ProbeEffect {
        fn new() -> Self {
            Self {
                state: EffectState::Running,
                gpu: ResourceBundle::new(()),
                releases: 0,
            }
        }
    }

    impl Effect for ProbeEffect {
        fn handle_event(&mut self, _ev: &InputEvent) {}

        fn set_color(&mut self, _color: Color) {}

        fn frame(&mut self, _ctx: &RenderCtx<'_>, _target: &mut RenderTarget<'_>, _now: Instant) {}

        fn dispose(&mut self) {
            if self.state == EffectState::Stopped {
                return;
            }
            self.state = EffectState::Stopped;
            if self.gpu.release() {
                self.releases += 1;
            }
        }

        fn state(&self) -> EffectState {
            self.state
        }
    }

    #[test]
    fn dispose_twice_releases_once_and_stays_stopped() {
        let mut effect = ProbeEffect::new();
        assert!(effect.is_running());

        effect.dispose();
        effect.dispose();

        assert_eq!(effect.state(), EffectState::Stopped);
        assert_eq!(effect.releases, 1);
    }

    #[test]
    fn release_is_exactly_once() {
        let mut bundle = ResourceBundle::new(vec![1, 2, 3]);
        assert!(!bundle.is_released());

        assert!(bundle.release());
        assert!(bundle.is_released());
        assert!(bundle.get().is_none());

        // Second release: no effect, no panic.
        assert!(!bundle.release());
    }

    #[test]
    fn drop_counts_as_release() {
        use std::rc::Rc;

        struct Probe(Rc<std::cell::Cell<u32>>);
        impl Drop for Probe {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(std::cell::Cell::new(0));
        let mut bundle = ResourceBundle::new(Probe(drops.clone()));

        bundle.release();
        bundle.release();
        drop(bundle);

        assert_eq!(drops.get(), 1, "resources dropped more than once");
    }
}
