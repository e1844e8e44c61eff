//! Anti-aliased cell shape masks.
//!
//! Each mask maps a sub-cell UV in [0, 1]² and a coverage value to an alpha.
//! The GPU versions use `fwidth` for the AA band; the CPU mirror takes the
//! band width as a parameter so tests can shrink it toward the analytic
//! shape area.

use crate::config::ShapeKind;

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Square cells pass coverage through unchanged.
#[inline]
pub fn mask_square(cov: f32) -> f32 {
    cov
}

/// Disc of radius `sqrt(cov) * 0.25` from the cell center, anti-aliased
/// over one derivative-width band.
pub fn mask_circle(ux: f32, uy: f32, cov: f32, aa: f32) -> f32 {
    let r = cov.sqrt() * 0.25;
    let d = ((ux - 0.5).powi(2) + (uy - 0.5).powi(2)).sqrt() - r;
    let aa = 0.5 * aa;
    cov * (1.0 - smoothstep(-aa, aa, d * 2.0))
}

/// Right triangle against the cell's lower edge, winding flipped on a
/// checkerboard parity of the cell index so adjacent cells tile.
pub fn mask_triangle(ux: f32, uy: f32, ix: i32, iy: i32, cov: f32, aa: f32) -> f32 {
    let flip = (ix + iy).rem_euclid(2) == 1;
    let ux = if flip { 1.0 - ux } else { ux };
    let r = cov.sqrt();
    let d = uy - r * (1.0 - ux);
    cov * (0.5 - d / aa).clamp(0.0, 1.0)
}

/// Hard-edged Manhattan-distance diamond, radius `sqrt(cov) * 0.564`.
///
/// Unlike the other shapes the interior alpha is a flat 1: coverage drives
/// only the footprint, so jittered coverage cannot push a diamond cell past
/// full opacity.
pub fn mask_diamond(ux: f32, uy: f32, cov: f32) -> f32 {
    let r = cov.sqrt() * 0.564;
    if (ux - 0.49).abs() + (uy - 0.49).abs() <= r {
        1.0
    } else {
        0.0
    }
}

/// Dispatch over the configured shape kind.
pub fn mask(shape: ShapeKind, ux: f32, uy: f32, ix: i32, iy: i32, cov: f32, aa: f32) -> f32 {
    match shape {
        ShapeKind::Square => mask_square(cov),
        ShapeKind::Circle => mask_circle(ux, uy, cov, aa),
        ShapeKind::Triangle => mask_triangle(ux, uy, ix, iy, cov, aa),
        ShapeKind::Diamond => mask_diamond(ux, uy, cov),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const AA: f32 = 0.01;

    /// Average mask value over an n×n sampling of the cell.
    fn cell_average(shape: ShapeKind, cov: f32, n: usize) -> f32 {
        let mut sum = 0.0;
        for j in 0..n {
            for i in 0..n {
                let ux = (i as f32 + 0.5) / n as f32;
                let uy = (j as f32 + 0.5) / n as f32;
                sum += mask(shape, ux, uy, 0, 0, cov, AA);
            }
        }
        sum / (n * n) as f32
    }

    // ── analytic area laws ────────────────────────────────────────────────
    //
    // The calibration constants fix each shape's footprint as a function of
    // coverage; the cell average must track the closed forms:
    //   square   cov
    //   circle   cov · π(√cov · 0.25)²        = cov² · π/16
    //   triangle cov · (√cov)/2               = cov^1.5 / 2
    //   diamond  2(√cov · 0.564)²             = cov · 0.636  (minus edge clip)

    #[test]
    fn square_average_equals_coverage() {
        for k in 0..=10 {
            let cov = k as f32 / 10.0;
            let avg = cell_average(ShapeKind::Square, cov, 32);
            assert!((avg - cov).abs() < 1e-5);
        }
    }

    #[test]
    fn circle_average_tracks_disc_area() {
        for cov in [0.25, 0.5, 0.75, 1.0] {
            let expected = cov * PI * (cov.sqrt() * 0.25).powi(2);
            let avg = cell_average(ShapeKind::Circle, cov, 256);
            assert!(
                (avg - expected).abs() < 0.05 * expected.max(0.01),
                "cov={cov}: avg {avg} vs expected {expected}"
            );
        }
    }

    #[test]
    fn triangle_average_tracks_half_plane_area() {
        for cov in [0.25f32, 0.5, 0.75, 1.0] {
            let expected = cov * cov.sqrt() / 2.0;
            let avg = cell_average(ShapeKind::Triangle, cov, 256);
            assert!(
                (avg - expected).abs() < 0.05 * expected,
                "cov={cov}: avg {avg} vs expected {expected}"
            );
        }
    }

    #[test]
    fn diamond_average_tracks_manhattan_ball_area() {
        // Edge clipping bites at high coverage, so compare with a slightly
        // wider band there.
        for (cov, tol) in [(0.25, 0.02), (0.5, 0.02), (1.0, 0.05)] {
            let expected = 2.0 * (cov.sqrt() * 0.564).powi(2);
            let avg = cell_average(ShapeKind::Diamond, cov, 256);
            assert!(
                (avg - expected).abs() < tol,
                "cov={cov}: avg {avg} vs expected {expected}"
            );
        }
    }

    // ── structural properties ─────────────────────────────────────────────

    #[test]
    fn averages_are_monotone_in_coverage() {
        for shape in [
            ShapeKind::Square,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Diamond,
        ] {
            let mut prev = 0.0;
            for k in 0..=8 {
                let avg = cell_average(shape, k as f32 / 8.0, 128);
                assert!(avg + 1e-4 >= prev, "{shape:?} not monotone at step {k}");
                prev = avg;
            }
        }
    }

    #[test]
    fn zero_coverage_yields_zero_alpha_everywhere() {
        for shape in [
            ShapeKind::Square,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Diamond,
        ] {
            for (ux, uy) in [(0.1, 0.1), (0.5, 0.5), (0.9, 0.2)] {
                assert_eq!(mask(shape, ux, uy, 0, 0, 0.0, AA), 0.0);
            }
        }
    }

    #[test]
    fn triangle_parity_flips_orientation() {
        // A point filled in an even cell must mirror to its parity twin.
        let even = mask_triangle(0.2, 0.2, 0, 0, 1.0, AA);
        let odd = mask_triangle(0.8, 0.2, 1, 0, 1.0, AA);
        assert!((even - odd).abs() < 1e-6);
    }

    #[test]
    fn mask_never_exceeds_coverage() {
        // Diamond is excluded: its interior alpha is a flat 1 by design.
        for shape in [ShapeKind::Square, ShapeKind::Circle, ShapeKind::Triangle] {
            for cov in [0.3, 0.7, 1.0] {
                for j in 0..32 {
                    for i in 0..32 {
                        let v = mask(shape, i as f32 / 32.0, j as f32 / 32.0, 0, 0, cov, AA);
                        assert!(v <= cov + 1e-6);
                    }
                }
            }
        }
    }
}
