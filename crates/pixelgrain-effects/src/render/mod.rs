//! GPU pipelines for the effects.
//!
//! Pipelines are created eagerly at mount inside a validation scope, so a
//! broken shader or layout fails the mount call with the diagnostic text
//! instead of panicking mid-frame. Per-frame methods only update uniforms
//! and record passes; they cannot fail.

mod cells;
mod common;
mod compose;
mod dither;
mod target;

pub use cells::{CellsParams, CellsPipeline};
pub use compose::ComposePipeline;
pub use dither::{DitherParams, DitherPipeline};
pub use target::{MAX_PIXEL_RATIO, OffscreenTarget, effect_pixels};
