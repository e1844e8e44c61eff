//! Analytic ordered-dither thresholds.
//!
//! The 8×8 Bayer matrix is computed recursively from the 2×2 base rather
//! than stored as a lookup table, so the same three-line recursion can live
//! in the fragment shader unchanged.

#[inline]
fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// 2×2 Bayer value in [0, 1) for the cell containing `(x, y)`.
#[inline]
pub fn bayer2(x: f32, y: f32) -> f32 {
    let x = x.floor();
    let y = y.floor();
    fract(x / 2.0 + y * y * 0.75)
}

/// 4×4 Bayer value.
#[inline]
pub fn bayer4(x: f32, y: f32) -> f32 {
    bayer2(0.5 * x, 0.5 * y) * 0.25 + bayer2(x, y)
}

/// 8×8 Bayer value.
#[inline]
pub fn bayer8(x: f32, y: f32) -> f32 {
    bayer4(0.5 * x, 0.5 * y) * 0.25 + bayer2(x, y)
}

/// Ordered-dither threshold in [-0.5, 0.5) for a pixel coordinate.
///
/// A pixel turns on iff the combined coverage signal exceeds this value;
/// the spatial permutation of thresholds is what converts a smooth signal
/// into the halftone pattern instead of a banded gradient.
#[inline]
pub fn dither_threshold(x: f32, y: f32) -> f32 {
    bayer8(x, y) - 0.5
}

/// The classic 4×4 Bayer rank matrix (row-major, values 0..16).
///
/// Used by the CPU gradient-mask generator, where a table read per texel is
/// cheaper and clearer than the recursion.
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_cell_matches_classic_2x2() {
        assert_eq!(bayer2(0.0, 0.0), 0.0);
        assert_eq!(bayer2(1.0, 0.0), 0.5);
        assert_eq!(bayer2(0.0, 1.0), 0.75);
        assert_eq!(bayer2(1.0, 1.0), 0.25);
    }

    #[test]
    fn period_is_8_in_both_axes() {
        for y in 0..8 {
            for x in 0..8 {
                let v = bayer8(x as f32, y as f32);
                assert_eq!(v, bayer8((x + 8) as f32, y as f32));
                assert_eq!(v, bayer8(x as f32, (y + 8) as f32));
                assert_eq!(v, bayer8((x + 16) as f32, (y + 24) as f32));
            }
        }
    }

    #[test]
    fn one_period_is_a_permutation_of_ranks() {
        // The 64 values over one period must be exactly {k/64 : k in 0..64}.
        let mut vals: Vec<f32> = (0..64)
            .map(|i| bayer8((i % 8) as f32, (i / 8) as f32))
            .collect();
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for (k, v) in vals.iter().enumerate() {
            assert!(
                (v - k as f32 / 64.0).abs() < 1e-6,
                "rank {k} expected {} got {v}",
                k as f32 / 64.0
            );
        }
    }

    #[test]
    fn threshold_is_centered() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for y in 0..8 {
            for x in 0..8 {
                let t = dither_threshold(x as f32, y as f32);
                min = min.min(t);
                max = max.max(t);
            }
        }
        assert_eq!(min, -0.5);
        assert!((max - (31.5 / 64.0)).abs() < 1e-6);
    }

    #[test]
    fn fractional_coords_snap_to_cell() {
        // Thresholds are constant within a pixel: the recursion floors.
        assert_eq!(bayer8(3.25, 5.75), bayer8(3.0, 5.0));
    }

    #[test]
    fn table_agrees_with_recursion_on_4x4() {
        for y in 0..4 {
            for x in 0..4 {
                let analytic = bayer4(x as f32, y as f32);
                let table = BAYER_4X4[y][x] as f32 / 16.0;
                assert!(
                    (analytic - table).abs() < 1e-6,
                    "mismatch at ({x},{y}): {analytic} vs {table}"
                );
            }
        }
    }
}
