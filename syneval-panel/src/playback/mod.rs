//! Clip playback: paired triggering and sequential playback

pub mod clip;
pub mod sequencer;
pub mod trigger;

pub use clip::{AudioClip, SimClip};
pub use sequencer::SequentialPlayer;
pub use trigger::play_paired_audio;
