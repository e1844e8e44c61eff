//! Pixelgrain engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the effect
//! layer: wgpu device/surface management, the winit window runtime, a
//! platform-agnostic input vocabulary, and frame/step timing.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
