//! CPU-generated ordered-dither gradient masks.
//!
//! Small tileable bitmaps used as section-transition textures: a vertical
//! intensity ramp thresholded against the 4×4 Bayer matrix, so the ramp
//! renders as a dissolve of hard texels instead of a smooth gradient.

use super::bayer::BAYER_4X4;

/// Opaque-to-dark dissolve: intensity steps up every 4 rows
/// (`floor(y/4) / 32`). Texels are 255 where the mask is on, 0 elsewhere.
/// Row-major, `width × height` bytes.
pub fn hero_gradient_mask(width: usize, height: usize) -> Vec<u8> {
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        let level = (y / 4) as f32 / 32.0;
        for x in 0..width {
            let threshold = BAYER_4X4[y % 4][x % 4] as f32 / 16.0;
            if level > threshold {
                data[y * width + x] = 255;
            }
        }
    }
    data
}

/// Dark-to-transparent dissolve: intensity ramps down linearly over the full
/// height (`1 − y/height`).
pub fn footer_gradient_mask(width: usize, height: usize) -> Vec<u8> {
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        let level = 1.0 - y as f32 / height as f32;
        for x in 0..width {
            let threshold = BAYER_4X4[y % 4][x % 4] as f32 / 16.0;
            if level > threshold {
                data[y * width + x] = 255;
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_density(mask: &[u8], width: usize, y: usize) -> usize {
        mask[y * width..(y + 1) * width]
            .iter()
            .filter(|&&v| v == 255)
            .count()
    }

    #[test]
    fn hero_density_is_monotone_in_y() {
        let (w, h) = (4, 128);
        let mask = hero_gradient_mask(w, h);

        // Density can only grow as the level steps up; compare 4-row bands
        // since the level is constant within a band.
        let mut prev = 0;
        for band in 0..h / 4 {
            let d: usize = (0..4).map(|r| row_density(&mask, w, band * 4 + r)).sum();
            assert!(d >= prev, "band {band} density {d} dropped below {prev}");
            prev = d;
        }
    }

    #[test]
    fn hero_saturates_once_level_clears_all_thresholds() {
        let (w, h) = (4, 128);
        let mask = hero_gradient_mask(w, h);

        // Max threshold is 15/16; the band level `floor(y/4)/32` first
        // strictly exceeds it in band 31, i.e. from y = 124 on.
        for y in 124..h {
            assert_eq!(row_density(&mask, w, y), w, "row {y} not saturated");
        }
        // The very first band has level 0 and stays empty.
        for y in 0..4 {
            assert_eq!(row_density(&mask, w, y), 0);
        }
    }

    #[test]
    fn footer_fades_from_full_to_empty() {
        let (w, h) = (4, 128);
        let mask = footer_gradient_mask(w, h);

        // Top rows: level near 1 clears every threshold.
        assert_eq!(row_density(&mask, w, 0), w);
        // Bottom band: only the zero-threshold texel survives a level of a
        // few 1/128ths, and rows without a zero threshold go fully dark.
        assert_eq!(row_density(&mask, w, h - 4), 1);
        assert_eq!(row_density(&mask, w, h - 1), 0);
    }
}
