//! Time subsystem.
//!
//! Frame timing utilities decoupled from the runtime loop:
//! - one `FrameClock` per window
//! - call `tick()` once per presented frame to obtain a `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
