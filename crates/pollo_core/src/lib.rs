//! Engine-agnostic building blocks shared by the game crate: the fixed-step
//! clock, keyboard state, frame-track playback and simulation timers.

pub mod animation;
pub mod cadence;
pub mod input;
pub mod time;
