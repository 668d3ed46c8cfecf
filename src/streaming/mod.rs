//! Real-time audio output
//!
//! Adapts a shared player into a rodio source so the output device can pull
//! one sample per tick from another thread. The mutex lives only at this
//! boundary; the engine itself stays single-owner. The host keeps calling
//! [`crate::WavPlayer::prepare`] from its idle loop; the device never
//! performs storage I/O on the audio thread.

mod output;

pub use output::{AudioDevice, PlayerSource};
