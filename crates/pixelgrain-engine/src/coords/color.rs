use anyhow::{Context, Result, bail};

/// Straight-alpha RGBA color in linear light.
///
/// Invariant:
/// - components live in the linear working space; the sRGB transfer function
///   is applied only at the shader output (or when parsing sRGB inputs).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // linear
    pub g: f32, // linear
    pub b: f32, // linear
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    #[inline]
    pub const fn from_linear(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a linear color from straight sRGB bytes (`0`–`255`).
    ///
    /// This is the preferred constructor for colors coming from hex literals;
    /// each channel passes through the inverse sRGB transfer function.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: 1.0,
        }
    }

    /// Parses a `#RRGGBB` or `RRGGBB` hex string into a linear color.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            bail!("expected 6 hex digits, got {:?}", hex);
        }
        let parse = |s: &str| -> Result<u8> {
            u8::from_str_radix(s, 16).with_context(|| format!("invalid hex color {:?}", hex))
        };
        Ok(Self::from_srgb_u8(
            parse(&digits[0..2])?,
            parse(&digits[2..4])?,
            parse(&digits[4..6])?,
        ))
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Linear RGB as a shader-ready array.
    #[inline]
    pub fn rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn rgba_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

/// Inverse sRGB transfer function (sRGB-encoded -> linear).
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Forward sRGB transfer function (linear -> sRGB-encoded).
///
/// Mirrors the encode performed in the dither shader so CPU-side reference
/// values match GPU output.
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_black_and_white() {
        let black = Color::from_hex("#000000").unwrap();
        assert_eq!(black.rgb_array(), [0.0, 0.0, 0.0]);

        let white = Color::from_hex("ffffff").unwrap();
        for c in white.rgb_array() {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn srgb_roundtrip() {
        for i in 0..=16 {
            let c = i as f32 / 16.0;
            let rt = linear_to_srgb(srgb_to_linear(c));
            assert!((rt - c).abs() < 1e-5, "roundtrip failed at {c}: {rt}");
        }
    }

    #[test]
    fn mid_grey_is_brighter_in_linear_terms() {
        // 0x80 sRGB is ~0.216 linear, not 0.5.
        let c = Color::from_srgb_u8(0x80, 0x80, 0x80);
        assert!(c.r > 0.20 && c.r < 0.23);
    }
}
