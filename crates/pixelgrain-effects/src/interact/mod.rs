//! Pointer interaction state.
//!
//! Two independent mechanisms share the pointer stream:
//! - [`RippleRing`]: a fixed-capacity record of pointer-down events feeding
//!   the traveling-ring waveform in the dither shader.
//! - [`TouchTrail`]: a decaying set of pointer-move samples rasterized into
//!   a small velocity/intensity bitmap for the liquid distortion pass.

mod ripples;
mod trail;

pub use ripples::{MAX_RIPPLES, RippleRing, RippleSlot, ring_wave};
pub use trail::{TOUCH_TEXTURE_SIZE, TouchTrail, TrailPoint};
