use pixelgrain_engine::coords::Color;

/// Cell shape rendered by the dither field.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ShapeKind {
    #[default]
    Square,
    Circle,
    Triangle,
    Diamond,
}

impl ShapeKind {
    /// Stable shader-side discriminant.
    pub fn shader_index(self) -> u32 {
        match self {
            ShapeKind::Square => 0,
            ShapeKind::Circle => 1,
            ShapeKind::Triangle => 2,
            ShapeKind::Diamond => 3,
        }
    }
}

/// Configuration for the dither field effect.
///
/// Supplied once at mount. Most fields are fixed for the lifetime of the
/// mount; `color` is live-mutable through the mounted handle (and `pixel_size`
/// is re-derived against the device pixel ratio on resize).
#[derive(Debug, Clone)]
pub struct DitherConfig {
    pub shape: ShapeKind,

    /// Dither pixel size in CSS-like reference pixels; multiplied by the
    /// (capped) device pixel ratio at render time.
    pub pixel_size: f32,

    /// Pattern color (linear).
    pub color: Color,

    /// Spatial scale of the noise pattern.
    pub pattern_scale: f32,

    /// Pattern density bias in [0, 1]; 0.5 is neutral.
    pub pattern_density: f32,

    /// Per-pixel size jitter amount, 0 disables.
    pub pixel_jitter: f32,

    /// Pointer-down ripples.
    pub enable_ripples: bool,
    pub ripple_speed: f32,
    pub ripple_thickness: f32,
    pub ripple_intensity: f32,

    /// Liquid distortion post-pass driven by the pointer trail.
    pub liquid: bool,
    pub liquid_strength: f32,
    /// Trail stamp radius scale.
    pub liquid_radius: f32,
    pub liquid_wobble_speed: f32,

    /// Overall time multiplier.
    pub speed: f32,

    /// Transparent background (pattern alpha only) vs opaque black.
    pub transparent: bool,

    /// Fade widths in normalized screen units; 0 disables.
    pub edge_fade: f32,
    pub top_fade: f32,

    /// Request MSAA on the effect's offscreen target.
    pub antialias: bool,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Square,
            pixel_size: 2.0,
            color: Color::from_srgb_u8(0, 0, 0),
            pattern_scale: 2.0,
            pattern_density: 0.5,
            pixel_jitter: 0.0,
            enable_ripples: true,
            ripple_speed: 0.4,
            ripple_thickness: 0.12,
            ripple_intensity: 1.5,
            liquid: false,
            liquid_strength: 0.12,
            liquid_radius: 1.2,
            liquid_wobble_speed: 5.0,
            speed: 0.5,
            transparent: true,
            edge_fade: 0.25,
            top_fade: 0.0,
            antialias: true,
        }
    }
}

/// Configuration for the cellular automaton overlay.
#[derive(Debug, Clone)]
pub struct LifeConfig {
    pub columns: usize,
    pub rows: usize,

    /// Cell size in reference pixels; multiplied by the capped device pixel
    /// ratio at render time.
    pub cell_size: f32,

    /// Wall-clock simulation interval in milliseconds, independent of the
    /// display refresh rate.
    pub step_interval_ms: u64,

    /// Live-cell color (linear).
    pub cell_color: Color,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            columns: 96,
            rows: 48,
            cell_size: 6.0,
            step_interval_ms: 120,
            cell_color: Color::from_srgb_u8(0, 0, 0),
        }
    }
}

/// Configuration for the cursor grid highlight.
#[derive(Debug, Clone)]
pub struct CursorGridConfig {
    /// Number of grid columns across the surface; cells are square, so the
    /// row count follows from the surface aspect.
    pub columns: usize,

    /// Highlight color (linear).
    pub color: Color,

    /// Per-cell fade-out duration in milliseconds.
    pub fade_ms: u64,
}

impl Default for CursorGridConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            color: Color::from_srgb_u8(0, 0, 0),
            fade_ms: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dither_defaults_match_documented_contract() {
        let cfg = DitherConfig::default();
        assert_eq!(cfg.shape, ShapeKind::Square);
        assert_eq!(cfg.pixel_size, 2.0);
        assert!(cfg.enable_ripples);
        assert!(!cfg.liquid);
        assert_eq!(cfg.speed, 0.5);
        assert_eq!(cfg.edge_fade, 0.25);
    }

    #[test]
    fn shape_indices_are_stable() {
        assert_eq!(ShapeKind::Square.shader_index(), 0);
        assert_eq!(ShapeKind::Circle.shader_index(), 1);
        assert_eq!(ShapeKind::Triangle.shader_index(), 2);
        assert_eq!(ShapeKind::Diamond.shader_index(), 3);
    }
}
