use pixelgrain_engine::coords::Vec2;

/// Side length of the trail raster, in texels.
pub const TOUCH_TEXTURE_SIZE: usize = 64;

/// Ticks a point survives after creation.
const MAX_AGE: u32 = 64;

/// Per-tick displacement budget; a full-force point crosses at most the
/// whole surface over its lifetime.
const SPEED: f32 = 1.0 / MAX_AGE as f32;

/// Stamp opacity ceiling, matching the soft-shadow alpha the distortion
/// pass was tuned against.
const STAMP_ALPHA: f32 = 0.22;

/// One pointer-move sample in the trail.
#[derive(Debug, Copy, Clone)]
pub struct TrailPoint {
    /// Position normalized to [0, 1]², origin top-left (raster convention).
    pub pos: Vec2,
    /// Ticks since creation.
    pub age: u32,
    /// Motion magnitude in [0, 1].
    pub force: f32,
    /// Unit-ish direction of the motion that created the point.
    pub vel: Vec2,
}

/// Decaying pointer trail rasterized into a velocity/intensity bitmap.
///
/// The bitmap is the only channel between the tracker and the GPU: R/G hold
/// the velocity remapped to [0, 255], B holds an ease-weighted intensity.
/// The distortion shader samples it as a per-pixel displacement field.
pub struct TouchTrail {
    points: Vec<TrailPoint>,
    last: Option<Vec2>,
    /// Stamp radius in texels.
    radius: f32,
    /// RGBA8, `TOUCH_TEXTURE_SIZE`² texels, cleared and redrawn every tick.
    pixels: Vec<u8>,
}

impl TouchTrail {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            last: None,
            radius: 0.1 * TOUCH_TEXTURE_SIZE as f32,
            pixels: vec![0; TOUCH_TEXTURE_SIZE * TOUCH_TEXTURE_SIZE * 4],
        }
    }

    /// Scales the stamp radius (the liquid "radius" knob).
    pub fn set_radius_scale(&mut self, scale: f32) {
        self.radius = 0.1 * TOUCH_TEXTURE_SIZE as f32 * scale;
    }

    /// Records a pointer sample at a normalized position.
    ///
    /// The first sample seeds the trail with zero force. A sample identical
    /// to the previous one is dropped entirely — it carries no direction, and
    /// keeping it would poison the next sample's velocity with a stale
    /// origin.
    pub fn add_touch(&mut self, norm: Vec2) {
        let mut force = 0.0;
        let mut vel = Vec2::zero();

        if let Some(last) = self.last {
            let d = norm - last;
            if d.x == 0.0 && d.y == 0.0 {
                return;
            }
            let dd = d.length_sq();
            vel = d.normalized();
            force = (dd * 10_000.0).min(1.0);
        }

        self.last = Some(norm);
        self.points.push(TrailPoint {
            pos: norm,
            age: 0,
            force,
            vel,
        });
    }

    /// Advances every point by one tick and redraws the raster.
    ///
    /// Points drift along their velocity with a force- and age-scaled step,
    /// then expire once their age passes [`MAX_AGE`].
    pub fn update(&mut self) {
        for p in &mut self.points {
            let f = p.force * SPEED * (1.0 - p.age as f32 / MAX_AGE as f32);
            p.pos = p.pos + p.vel * f;
            p.age += 1;
        }
        self.points.retain(|p| p.age <= MAX_AGE);

        self.pixels.fill(0);
        let points = std::mem::take(&mut self.points);
        for p in &points {
            self.stamp(p);
        }
        self.points = points;
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    /// Raw RGBA raster, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ease-weighted stamp intensity: a fast ramp-in over the first 30% of
    /// life, a quadratic ease-out over the rest.
    fn intensity(p: &TrailPoint) -> f32 {
        let ramp = MAX_AGE as f32 * 0.3;
        let t = p.age as f32;
        let eased = if t < ramp {
            ((t / ramp) * std::f32::consts::FRAC_PI_2).sin()
        } else {
            let u = 1.0 - (t - ramp) / (MAX_AGE as f32 * 0.7);
            (-u * (u - 2.0)).max(0.0)
        };
        eased * p.force
    }

    /// Additive soft-circle stamp encoding velocity (R/G) and intensity (B).
    fn stamp(&mut self, p: &TrailPoint) {
        let size = TOUCH_TEXTURE_SIZE as f32;
        let intensity = Self::intensity(p);
        if intensity <= 0.0 {
            return;
        }

        let cx = p.pos.x * size;
        let cy = p.pos.y * size;
        let r = self.radius;

        let x0 = ((cx - r).floor().max(0.0)) as usize;
        let x1 = ((cx + r).ceil().min(size - 1.0)) as usize;
        let y0 = ((cy - r).floor().max(0.0)) as usize;
        let y1 = ((cy + r).ceil().min(size - 1.0)) as usize;
        if x0 > x1 || y0 > y1 {
            return;
        }

        let enc_x = (p.vel.x + 1.0) * 0.5 * 255.0;
        let enc_y = (p.vel.y + 1.0) * 0.5 * 255.0;
        let enc_b = intensity * 255.0;

        for ty in y0..=y1 {
            for tx in x0..=x1 {
                let dx = tx as f32 + 0.5 - cx;
                let dy = ty as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist >= r {
                    continue;
                }
                // Soft falloff toward the stamp edge.
                let falloff = 1.0 - dist / r;
                let a = STAMP_ALPHA * intensity * falloff;

                let idx = (ty * TOUCH_TEXTURE_SIZE + tx) * 4;
                self.pixels[idx] = add_sat(self.pixels[idx], enc_x * a);
                self.pixels[idx + 1] = add_sat(self.pixels[idx + 1], enc_y * a);
                self.pixels[idx + 2] = add_sat(self.pixels[idx + 2], enc_b * a);
                self.pixels[idx + 3] = 255;
            }
        }
    }
}

impl Default for TouchTrail {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn add_sat(base: u8, add: f32) -> u8 {
    (base as f32 + add).min(255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn first_touch_has_zero_force() {
        let mut trail = TouchTrail::new();
        trail.add_touch(v(0.5, 0.5));

        assert_eq!(trail.points().len(), 1);
        assert_eq!(trail.points()[0].force, 0.0);
        assert_eq!(trail.points()[0].vel, Vec2::zero());
    }

    #[test]
    fn zero_displacement_sample_is_dropped() {
        let mut trail = TouchTrail::new();
        trail.add_touch(v(0.5, 0.5));
        trail.add_touch(v(0.5, 0.5));

        assert_eq!(trail.points().len(), 1);
    }

    #[test]
    fn force_follows_squared_displacement_with_cap() {
        let mut trail = TouchTrail::new();
        trail.add_touch(v(0.5, 0.5));

        // Small move: dd = 2·0.003² = 1.8e-5 → force = 0.18.
        trail.add_touch(v(0.503, 0.503));
        let p = trail.points()[1];
        assert!((p.force - 0.18).abs() < 1e-3, "force {}", p.force);
        assert!((p.vel.length() - 1.0).abs() < 1e-5);

        // Big move: capped at 1.
        trail.add_touch(v(0.9, 0.9));
        assert_eq!(trail.points()[2].force, 1.0);
    }

    #[test]
    fn zero_force_point_stays_put_and_dies_at_max_age_plus_one() {
        let mut trail = TouchTrail::new();
        trail.add_touch(v(0.25, 0.75));

        // Ages 1..=MAX_AGE: the point survives and never drifts.
        for tick in 1..=MAX_AGE {
            trail.update();
            assert_eq!(trail.points().len(), 1, "died early at tick {tick}");
            let p = trail.points()[0];
            assert!((p.pos - v(0.25, 0.75)).length() < 1e-6);
            assert_eq!(p.age, tick);
        }

        // Tick MAX_AGE + 1 removes it.
        trail.update();
        assert!(trail.is_empty());
    }

    #[test]
    fn raster_encodes_velocity_and_intensity() {
        let mut trail = TouchTrail::new();
        trail.add_touch(v(0.3, 0.5));
        // Rightward move, force-capped.
        trail.add_touch(v(0.5, 0.5));

        // Let the intensity ramp open up.
        for _ in 0..10 {
            trail.update();
        }

        let p = trail.points().last().copied().unwrap();
        let tx = (p.pos.x * TOUCH_TEXTURE_SIZE as f32) as usize;
        let ty = (p.pos.y * TOUCH_TEXTURE_SIZE as f32) as usize;
        let idx = (ty.min(TOUCH_TEXTURE_SIZE - 1) * TOUCH_TEXTURE_SIZE
            + tx.min(TOUCH_TEXTURE_SIZE - 1))
            * 4;

        let px = trail.pixels();
        // Intensity landed in B.
        assert!(px[idx + 2] > 0, "no intensity stamped");
        // Rightward velocity: R encodes ~1.0, G encodes ~0.5 → R > G.
        assert!(px[idx] > px[idx + 1], "R={} G={}", px[idx], px[idx + 1]);
    }

    #[test]
    fn raster_clears_between_ticks() {
        let mut trail = TouchTrail::new();
        trail.add_touch(v(0.5, 0.5));
        trail.add_touch(v(0.6, 0.5));
        for _ in 0..10 {
            trail.update();
        }
        assert!(trail.pixels().iter().any(|&b| b != 0));

        // Run the trail dry; the raster must return to all-zero.
        for _ in 0..(MAX_AGE + 2) {
            trail.update();
        }
        assert!(trail.is_empty());
        assert!(trail.pixels().iter().all(|&b| b == 0));
    }
}
