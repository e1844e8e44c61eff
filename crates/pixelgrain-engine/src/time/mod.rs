//! Time subsystem.
//!
//! Provides stable, testable timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per window (or per loop); call `tick()` once per frame
//! - one `EffectClock` per mounted effect for pause-aware animation time
//! - one `StepTimer` per simulation that advances on a wall-clock interval

mod effect_clock;
mod frame_clock;
mod step_timer;

pub use effect_clock::EffectClock;
pub use frame_clock::{FrameClock, FrameTime};
pub use step_timer::StepTimer;
