//! Coordinate and color types shared across the engine and effect layers.
//!
//! Canonical CPU space:
//! - Physical (device) pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Shaders that need the bottom-up fragment-coordinate convention perform
//! the vertical flip themselves; CPU code stays top-down throughout.

mod color;
mod vec2;
mod viewport;

pub use color::Color;
pub use vec2::Vec2;
pub use viewport::Viewport;
