//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into
//! `InputEvent`s. The vocabulary is pointer-centric: effects consume
//! pointer-down (ripple origins), pointer-move (trails), and visibility
//! transitions; a handful of keys exist for runtime toggles.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};
