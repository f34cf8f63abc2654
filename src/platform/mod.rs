//! Platform abstraction layer
//!
//! Handles the pieces that sit between the browser/OS and the simulation:
//! - Input events (touch joystick, keyboard) and the per-tick mailbox
//! - Frame timing

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{InputMailbox, Joystick, KeyState, combined_intent};
