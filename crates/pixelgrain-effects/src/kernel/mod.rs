//! Pure numeric kernels behind the dither shader.
//!
//! These functions mirror the WGSL implementations constant-for-constant.
//! The GPU path never calls into this module at runtime; it exists so the
//! coverage math (ordered dithering, fractal noise, shape masks) can be
//! pinned by tests and reused by CPU-side consumers such as the gradient
//! mask generator.

pub mod bayer;
pub mod gradient;
pub mod noise;
pub mod shapes;
