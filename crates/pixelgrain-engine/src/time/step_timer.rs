use std::time::{Duration, Instant};

/// Fixed wall-clock interval timer for simulation stepping.
///
/// Decouples a simulation's tick rate from the display refresh rate: the
/// render loop polls `due()` once per frame and steps the simulation only
/// when the interval has elapsed. At most one step fires per poll; the timer
/// rebases on each step, so a long stall yields a single catch-up step
/// rather than a burst.
#[derive(Debug, Clone)]
pub struct StepTimer {
    interval: Duration,
    last: Instant,
}

impl StepTimer {
    pub fn new(interval: Duration) -> Self {
        Self::started_at(Instant::now(), interval)
    }

    /// Creates a timer with an explicit baseline (testable).
    pub fn started_at(start: Instant, interval: Duration) -> Self {
        Self { interval, last: start }
    }

    /// Returns true and rebases if the interval has elapsed at `now`.
    pub fn due_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Convenience wrapper over [`due_at`](Self::due_at).
    pub fn due(&mut self) -> bool {
        self.due_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_elapsed_interval() {
        let t0 = Instant::now();
        let mut timer = StepTimer::started_at(t0, Duration::from_millis(100));

        assert!(!timer.due_at(t0 + Duration::from_millis(50)));
        assert!(timer.due_at(t0 + Duration::from_millis(100)));
        // Rebased: not due again until another full interval passes.
        assert!(!timer.due_at(t0 + Duration::from_millis(150)));
        assert!(timer.due_at(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn long_stall_yields_single_step_per_poll() {
        let t0 = Instant::now();
        let mut timer = StepTimer::started_at(t0, Duration::from_millis(100));

        // One poll after a 10-interval stall: exactly one step, then rebased.
        assert!(timer.due_at(t0 + Duration::from_secs(1)));
        assert!(!timer.due_at(t0 + Duration::from_millis(1050)));
    }
}
