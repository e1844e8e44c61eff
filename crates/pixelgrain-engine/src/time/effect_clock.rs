use std::time::{Duration, Instant};

/// Pause-aware animation clock for a mounted effect.
///
/// Reports seconds elapsed since mount, scaled by a speed multiplier and
/// shifted by a fixed start offset. Time accrues only while the effect is
/// visible: hiding the effect freezes the reported value, and showing it
/// again resumes from the frozen value rather than jumping forward. Code
/// sampling `elapsed` therefore never observes a discontinuity across a
/// hide/show cycle.
#[derive(Debug, Clone)]
pub struct EffectClock {
    origin: Instant,
    /// Set while hidden; marks the instant accrual stopped.
    paused_at: Option<Instant>,
    /// Total time spent hidden, subtracted from wall-clock elapsed.
    hidden: Duration,
    offset: f32,
    speed: f32,
}

impl EffectClock {
    /// Creates a running clock.
    ///
    /// `offset` is added to every reported time (effects use a random
    /// per-mount offset so concurrent instances never animate in lockstep);
    /// `speed` scales the passage of time.
    pub fn new(offset: f32, speed: f32) -> Self {
        Self::started_at(Instant::now(), offset, speed)
    }

    /// Creates a running clock with an explicit origin (testable).
    pub fn started_at(origin: Instant, offset: f32, speed: f32) -> Self {
        Self {
            origin,
            paused_at: None,
            hidden: Duration::ZERO,
            offset,
            speed,
        }
    }

    /// Records a visibility transition at `now`.
    ///
    /// Redundant transitions (hide while hidden, show while shown) are no-ops.
    pub fn set_visible_at(&mut self, visible: bool, now: Instant) {
        if visible {
            if let Some(paused) = self.paused_at.take() {
                self.hidden += now.saturating_duration_since(paused);
            }
        } else if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Convenience wrapper over [`set_visible_at`](Self::set_visible_at).
    pub fn set_visible(&mut self, visible: bool) {
        self.set_visible_at(visible, Instant::now());
    }

    /// Effect time in seconds at `now`.
    pub fn elapsed_at(&self, now: Instant) -> f32 {
        // While hidden, the clock reads as of the pause instant.
        let end = self.paused_at.unwrap_or(now);
        let run = end.saturating_duration_since(self.origin).saturating_sub(self.hidden);
        self.offset + run.as_secs_f32() * self.speed
    }

    /// Convenience wrapper over [`elapsed_at`](Self::elapsed_at).
    pub fn elapsed(&self) -> f32 {
        self.elapsed_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn visible_time_accrues_with_speed() {
        let t0 = Instant::now();
        let clock = EffectClock::started_at(t0, 0.25, 0.5);

        let t = clock.elapsed_at(t0 + secs(4));
        assert!((t - (0.25 + 2.0)).abs() < 1e-4);
    }

    #[test]
    fn hidden_interval_contributes_nothing() {
        let t0 = Instant::now();
        let mut clock = EffectClock::started_at(t0, 0.0, 1.0);

        clock.set_visible_at(false, t0 + secs(2));
        // Reads while hidden stay frozen at the pause instant.
        assert!((clock.elapsed_at(t0 + secs(10)) - 2.0).abs() < 1e-4);

        clock.set_visible_at(true, t0 + secs(10));
        // Time is continuous across the pause: 2s before + 3s after.
        assert!((clock.elapsed_at(t0 + secs(13)) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn redundant_transitions_are_no_ops() {
        let t0 = Instant::now();
        let mut clock = EffectClock::started_at(t0, 0.0, 1.0);

        clock.set_visible_at(true, t0 + secs(1));
        clock.set_visible_at(false, t0 + secs(2));
        clock.set_visible_at(false, t0 + secs(5));
        clock.set_visible_at(true, t0 + secs(6));

        // 2s visible before the pause, 1s after.
        assert!((clock.elapsed_at(t0 + secs(7)) - 3.0).abs() < 1e-4);
    }
}
