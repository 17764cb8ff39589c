//! Platform abstraction layer
//!
//! Handles device/host differences for:
//! - Input sampling (keyboard + gamepads) and press-edge detection
//! - Frame timing (FPS counter)

pub mod input;
pub mod time;

pub use input::{GamepadSnapshot, InputMapper, KeyState, RawInput};
pub use time::FpsCounter;
