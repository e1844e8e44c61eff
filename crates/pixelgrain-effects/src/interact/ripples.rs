use pixelgrain_engine::coords::Vec2;

/// Ring buffer capacity; matches the fixed uniform array in the shader.
pub const MAX_RIPPLES: usize = 10;

/// Exponential time damping of the traveling ring.
const DAMP_TIME: f32 = 1.0;
/// Exponential radial damping of the traveling ring.
const DAMP_RADIUS: f32 = 10.0;

/// One recorded pointer-down event.
///
/// A negative x position marks an unused slot; the shader skips those
/// without a branch on a separate "count" uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RippleSlot {
    /// Origin in device pixels.
    pub pos: Vec2,
    /// Effect time at the press, in seconds.
    pub time: f32,
}

impl RippleSlot {
    const UNUSED: Self = Self {
        pos: Vec2::new(-1.0, -1.0),
        time: 0.0,
    };

    #[inline]
    pub fn is_active(&self) -> bool {
        self.pos.x >= 0.0
    }
}

/// Fixed-capacity, oldest-overwritten store of recent pointer presses.
///
/// Slots are never explicitly cleared: an old press is superseded when the
/// write index wraps around to it, and until then its visual contribution
/// decays to nothing through the exponential damping terms.
#[derive(Debug, Clone)]
pub struct RippleRing {
    slots: [RippleSlot; MAX_RIPPLES],
    write_index: usize,
}

impl RippleRing {
    pub fn new() -> Self {
        Self {
            slots: [RippleSlot::UNUSED; MAX_RIPPLES],
            write_index: 0,
        }
    }

    /// Records a press, overwriting the oldest slot once full.
    pub fn push(&mut self, pos: Vec2, time: f32) {
        self.slots[self.write_index] = RippleSlot { pos, time };
        self.write_index = (self.write_index + 1) % MAX_RIPPLES;
    }

    pub fn slots(&self) -> &[RippleSlot; MAX_RIPPLES] {
        &self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// Packs the slots for the shader uniform: `(x, y, press_time, 0)`.
    pub fn as_uniform(&self) -> [[f32; 4]; MAX_RIPPLES] {
        let mut out = [[0.0; 4]; MAX_RIPPLES];
        for (dst, slot) in out.iter_mut().zip(self.slots.iter()) {
            *dst = [slot.pos.x, slot.pos.y, slot.time, 0.0];
        }
        out
    }
}

impl Default for RippleRing {
    fn default() -> Self {
        Self::new()
    }
}

/// Damped traveling-ring waveform, mirrored from the shader.
///
/// `r` is the distance from the ripple origin (pattern-space units), `dt`
/// the seconds since the press.
pub fn ring_wave(r: f32, dt: f32, speed: f32, thickness: f32) -> f32 {
    let wave_r = speed * dt;
    let ring = (-((r - wave_r) / thickness).powi(2)).exp();
    let atten = (-DAMP_TIME * dt).exp() * (-DAMP_RADIUS * r).exp();
    ring * atten
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_with_sentinel_slots() {
        let ring = RippleRing::new();
        assert_eq!(ring.active_count(), 0);
        assert!(ring.slots().iter().all(|s| !s.is_active()));
    }

    #[test]
    fn eleventh_press_overwrites_only_the_first() {
        let mut ring = RippleRing::new();
        for i in 0..11 {
            ring.push(Vec2::new(i as f32, 100.0 + i as f32), i as f32 * 0.1);
        }

        // Capacity invariant: still exactly 10 usable slots.
        assert_eq!(ring.active_count(), MAX_RIPPLES);

        // Slot 0 was overwritten exactly once (by press 10); slots 1..9 keep
        // their original presses.
        assert_eq!(ring.slots()[0].pos, Vec2::new(10.0, 110.0));
        for i in 1..MAX_RIPPLES {
            assert_eq!(ring.slots()[i].pos, Vec2::new(i as f32, 100.0 + i as f32));
        }
    }

    #[test]
    fn uniform_packs_position_and_time() {
        let mut ring = RippleRing::new();
        ring.push(Vec2::new(3.0, 7.0), 1.25);

        let packed = ring.as_uniform();
        assert_eq!(packed[0], [3.0, 7.0, 1.25, 0.0]);
        // Untouched slots keep the sentinel position for the shader skip.
        assert!(packed[1][0] < 0.0);
    }

    #[test]
    fn ring_wave_peaks_on_the_wavefront() {
        let (speed, thickness) = (0.4, 0.12);
        let dt = 0.5;
        let front = speed * dt;

        let on_front = ring_wave(front, dt, speed, thickness);
        let off_front = ring_wave(front + 0.3, dt, speed, thickness);
        assert!(on_front > off_front);
    }

    #[test]
    fn ring_wave_decays_to_negligible() {
        // A slot is never cleared; its contribution must die out on its own.
        let v = ring_wave(0.2, 8.0, 0.4, 0.12);
        assert!(v < 1e-3, "stale ripple still visible: {v}");
    }
}
