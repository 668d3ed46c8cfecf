//! Rodio output device

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rodio::{OutputStream, Sink, Source};

use crate::player::WavPlayer;
use crate::storage::Storage;
use crate::{Result, WavStreamError};

/// Pull-based sample source over a shared player.
///
/// Each `next()` takes the player lock for one [`WavPlayer::stream`] call,
/// so the audio thread holds it for an O(1) window per tick. The source
/// never ends: a stopped player yields silence until the device is dropped.
pub struct PlayerSource<S: Storage> {
    player: Arc<Mutex<WavPlayer<S>>>,
    channels: u16,
    sample_rate: u32,
}

impl<S: Storage> PlayerSource<S> {
    /// Wrap a shared player, capturing its rate and channel layout.
    pub fn new(player: Arc<Mutex<WavPlayer<S>>>) -> Self {
        let (channels, sample_rate) = {
            let player = player.lock();
            (player.channels() as u16, player.sample_rate())
        };
        PlayerSource {
            player,
            channels,
            sample_rate,
        }
    }
}

impl<S: Storage> Iterator for PlayerSource<S> {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        Some(self.player.lock().stream())
    }
}

impl<S: Storage> Source for PlayerSource<S> {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Audio output device bound to a shared player
pub struct AudioDevice {
    // The stream must outlive the sink or playback goes silent.
    _stream: OutputStream,
    sink: Sink,
}

impl AudioDevice {
    /// Open the default output device and start pulling from `player`.
    pub fn new<S>(player: Arc<Mutex<WavPlayer<S>>>) -> Result<Self>
    where
        S: Storage + Send + 'static,
        S::File: Send + 'static,
    {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| WavStreamError::AudioDevice(e.to_string()))?;
        let sink =
            Sink::try_new(&handle).map_err(|e| WavStreamError::AudioDevice(e.to_string()))?;
        sink.append(PlayerSource::new(player));

        Ok(AudioDevice {
            _stream: stream,
            sink,
        })
    }

    /// Pause the device without touching the player's own state.
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume a paused device.
    pub fn resume(&self) {
        self.sink.play();
    }

    /// Stop the device and release the output stream.
    pub fn finish(self) {
        self.sink.stop();
    }
}
