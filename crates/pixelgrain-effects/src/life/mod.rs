//! Cellular automaton engine.
//!
//! A double-buffered Conway grid stepped on a wall-clock interval, plus the
//! seed patterns it starts from. Rendering lives in `render::cells`; this
//! module is pure state evolution and fully testable off-GPU.

mod grid;
mod patterns;

pub use grid::LifeGrid;
pub use patterns::{GLIDER_GUN, GUN_ORIGIN};
