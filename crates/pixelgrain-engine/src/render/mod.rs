//! Renderer-facing context types.
//!
//! These are the handles the effect layer sees each frame: device/queue plus
//! the surface format and physical viewport, and the encoder/view pair to
//! record passes into.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
