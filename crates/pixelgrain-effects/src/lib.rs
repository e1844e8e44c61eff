//! Pixelgrain effects crate.
//!
//! Real-time procedural rendering effects: a Bayer-dithered noise field with
//! pointer ripples and an optional liquid distortion post-pass, a cellular
//! automaton overlay, and a cursor grid highlight.
//!
//! Every effect follows the same lifecycle contract: `mount` allocates all
//! GPU resources scoped to the call and returns a handle whose `dispose` is
//! idempotent and releases everything exactly once. The pure kernels behind
//! the shaders (noise, ordered dithering, shape masks, the automaton rule)
//! live in plain Rust modules so their invariants stay testable off-GPU.

pub mod config;
pub mod kernel;
pub mod interact;
pub mod life;
pub mod mount;
pub mod render;

mod cursor_grid;
mod dither_field;
mod life_field;

pub use cursor_grid::CursorGrid;
pub use dither_field::DitherField;
pub use life_field::LifeField;
