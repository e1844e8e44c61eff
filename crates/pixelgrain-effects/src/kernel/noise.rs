//! Value noise and its fractal sum.
//!
//! Lattice hash is the classic `fract(sin(n) * 43758.5453)` construction;
//! interpolation uses the quintic fade so first and second derivatives are
//! continuous across cell boundaries.

const FBM_OCTAVES: u32 = 5;
const FBM_LACUNARITY: f32 = 1.25;
const FBM_GAIN: f32 = 1.0;

#[inline]
fn fract(v: f32) -> f32 {
    v - v.floor()
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Scalar lattice hash in [0, 1).
#[inline]
pub fn hash11(n: f32) -> f32 {
    fract(n.sin() * 43758.5453)
}

#[inline]
fn lattice(ix: f32, iy: f32, iz: f32) -> f32 {
    hash11(ix + iy * 57.0 + iz * 113.0)
}

/// Smooth 3D value noise in [-1, 1].
pub fn vnoise(px: f32, py: f32, pz: f32) -> f32 {
    let (ix, iy, iz) = (px.floor(), py.floor(), pz.floor());
    let (fx, fy, fz) = (px - ix, py - iy, pz - iz);

    let n000 = lattice(ix, iy, iz);
    let n100 = lattice(ix + 1.0, iy, iz);
    let n010 = lattice(ix, iy + 1.0, iz);
    let n110 = lattice(ix + 1.0, iy + 1.0, iz);
    let n001 = lattice(ix, iy, iz + 1.0);
    let n101 = lattice(ix + 1.0, iy, iz + 1.0);
    let n011 = lattice(ix, iy + 1.0, iz + 1.0);
    let n111 = lattice(ix + 1.0, iy + 1.0, iz + 1.0);

    // Quintic fade.
    let wx = fx * fx * fx * (fx * (fx * 6.0 - 15.0) + 10.0);
    let wy = fy * fy * fy * (fy * (fy * 6.0 - 15.0) + 10.0);
    let wz = fz * fz * fz * (fz * (fz * 6.0 - 15.0) + 10.0);

    let x00 = mix(n000, n100, wx);
    let x10 = mix(n010, n110, wx);
    let x01 = mix(n001, n101, wx);
    let x11 = mix(n011, n111, wx);
    let y0 = mix(x00, x10, wy);
    let y1 = mix(x01, x11, wy);

    mix(y0, y1, wz) * 2.0 - 1.0
}

/// Fractal sum of [`vnoise`] over a 2D position and a time axis.
///
/// `scale` multiplies the spatial position before sampling (the pattern
/// scale knob). The octave sum is seeded at 1.0 and rescaled, so the result
/// sits roughly in [0, 1] for typical inputs without being strictly bounded.
pub fn fractal_noise(ux: f32, uy: f32, t: f32, scale: f32) -> f32 {
    let (px, py, pz) = (ux * scale, uy * scale, t);

    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut sum = 1.0;
    for _ in 0..FBM_OCTAVES {
        sum += amp * vnoise(px * freq, py * freq, pz * freq);
        freq *= FBM_LACUNARITY;
        amp *= FBM_GAIN;
    }

    sum * 0.5 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_identical_inputs() {
        for i in 0..32 {
            let (x, y, t) = (i as f32 * 0.37, i as f32 * -0.81, i as f32 * 0.05);
            assert_eq!(vnoise(x, y, t), vnoise(x, y, t));
            assert_eq!(
                fractal_noise(x, y, t, 2.0).to_bits(),
                fractal_noise(x, y, t, 2.0).to_bits()
            );
        }
    }

    #[test]
    fn vnoise_stays_in_signed_unit_range() {
        for i in 0..64 {
            for j in 0..64 {
                let v = vnoise(i as f32 * 0.173, j as f32 * 0.291, 1.5);
                assert!((-1.0..=1.0).contains(&v), "out of range: {v}");
            }
        }
    }

    #[test]
    fn vnoise_is_smooth_between_samples() {
        // Adjacent samples 1e-3 apart should never jump; value noise is
        // continuous everywhere including lattice boundaries.
        let mut prev = vnoise(0.0, 0.3, 0.7);
        for i in 1..2000 {
            let v = vnoise(i as f32 * 1e-3, 0.3, 0.7);
            assert!((v - prev).abs() < 0.05, "discontinuity at i={i}");
            prev = v;
        }
    }

    #[test]
    fn fractal_noise_varies_with_time() {
        let a = fractal_noise(0.4, 0.6, 0.0, 2.0);
        let b = fractal_noise(0.4, 0.6, 10.0, 2.0);
        assert!((a - b).abs() > 1e-4, "time axis had no effect");
    }
}
