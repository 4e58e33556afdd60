//! Side-effecting services module
//! 
//! This module contains the alarm signal generator and the tone it plays.

pub mod alarm;
#[cfg(feature = "host-audio")]
pub mod host_audio;
pub mod tone;

// Re-export main types
pub use alarm::{AlarmGenerator, SilentOutput, ToneOutput};
#[cfg(feature = "host-audio")]
pub use host_audio::RodioOutput;
pub use tone::{Tone, SAMPLE_RATE};
