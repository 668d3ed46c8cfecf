//! Ping-pong streaming engine

use super::{BufferPhase, PlaybackState, DEFAULT_MAX_FILES, DEFAULT_SAMPLE_RATE};
use crate::catalog::{Catalog, FileEntry};
use crate::config::PlayerConfig;
use crate::storage::Storage;
use crate::{Result, WavStreamError};

/// Streaming WAV player over a pluggable storage driver.
///
/// One instance owns one open file at most and one fixed sample buffer. The
/// buffer is handed in once at init and never reallocated; the byte staging
/// area used by refills is likewise allocated once, so the steady state runs
/// allocation-free.
pub struct WavPlayer<S: Storage> {
    storage: S,
    catalog: Catalog,
    buffer: Box<[i16]>,
    io_buf: Box<[u8]>,
    channels: usize,
    sample_rate: u32,
    read_ptr: usize,
    read_ptr_abs: u32,
    phase: BufferPhase,
    state: PlaybackState,
    looping: bool,
    selection: Option<usize>,
    file: Option<S::File>,
}

impl<S: Storage> WavPlayer<S> {
    /// Build a player around a caller-supplied sample buffer and catalog the
    /// files found at `search_path`.
    ///
    /// The buffer is channel-interleaved and must split into two halves of
    /// whole frames. Uses the reference defaults for output rate and catalog
    /// capacity; see [`WavPlayer::with_config`] to override them.
    pub fn init(storage: S, search_path: &str, buffer: Vec<i16>, channels: usize) -> Result<Self> {
        let mut player = Self::assemble(storage, buffer, channels)?;
        player.rescan(search_path, DEFAULT_MAX_FILES)?;
        Ok(player)
    }

    /// Build a player from a [`PlayerConfig`], allocating the sample buffer
    /// it describes.
    pub fn with_config(storage: S, config: &PlayerConfig) -> Result<Self> {
        if config.sample_rate_hz == 0 {
            return Err(WavStreamError::Config("sample rate must be non-zero".into()));
        }
        let mut player = Self::assemble(storage, vec![0i16; config.buffer_samples], config.channels)?;
        player.sample_rate = config.sample_rate_hz;
        player.rescan(&config.search_path, config.max_files)?;
        player.looping = config.looping;
        Ok(player)
    }

    fn assemble(storage: S, buffer: Vec<i16>, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(WavStreamError::Config("channel count must be at least 1".into()));
        }
        if buffer.is_empty() || buffer.len() % 2 != 0 || (buffer.len() / 2) % channels != 0 {
            return Err(WavStreamError::Config(format!(
                "buffer of {} samples cannot split into two {}-channel halves",
                buffer.len(),
                channels
            )));
        }

        let io_buf = vec![0u8; buffer.len() / 2 * std::mem::size_of::<i16>()];
        Ok(WavPlayer {
            storage,
            catalog: Catalog::default(),
            buffer: buffer.into_boxed_slice(),
            io_buf: io_buf.into_boxed_slice(),
            channels,
            sample_rate: DEFAULT_SAMPLE_RATE,
            read_ptr: 0,
            read_ptr_abs: 0,
            phase: BufferPhase::Idle,
            state: PlaybackState::Stopped,
            looping: false,
            selection: None,
            file: None,
        })
    }

    /// Rebuild the catalog from a directory scan.
    ///
    /// Closes any open file and resets selection, playback and looping.
    pub fn rescan(&mut self, search_path: &str, max_files: usize) -> Result<()> {
        if let Some(file) = self.file.take() {
            let _ = self.storage.close_file(file);
        }
        self.catalog = Catalog::build(&mut self.storage, search_path, max_files)?;
        self.selection = None;
        self.state = PlaybackState::Stopped;
        self.looping = false;
        self.phase = BufferPhase::Idle;
        self.read_ptr = 0;
        self.read_ptr_abs = 0;
        Ok(())
    }

    /// Open the cataloged file at `index` for playback.
    ///
    /// An out-of-range index clamps to the last entry. On success the engine
    /// is playing with the first buffer half primed and the second half
    /// flagged for the next [`WavPlayer::prepare`] call; on failure the
    /// engine keeps its previous selection and file.
    pub fn open(&mut self, index: usize) -> Result<()> {
        if self.catalog.is_empty() {
            return Err(WavStreamError::NotFound("catalog is empty".into()));
        }
        let index = index.min(self.catalog.len() - 1);
        let (path, payload_offset, total_samples) = {
            let entry = &self.catalog.entries()[index];
            (entry.path.clone(), entry.header.payload_offset(), entry.total_samples)
        };

        let mut new_file = self.storage.open_file(&path)?;
        if let Err(e) = self.storage.seek(&mut new_file, payload_offset as u64) {
            let _ = self.storage.close_file(new_file);
            return Err(e);
        }

        if let Some(old) = self.file.take() {
            let _ = self.storage.close_file(old);
        }
        self.file = Some(new_file);
        self.selection = Some(index);
        self.read_ptr = 0;
        self.read_ptr_abs = 0;
        self.state = PlaybackState::Playing;
        self.phase = BufferPhase::RefillFirstHalf;
        self.prepare()?;
        // Stage the on-deck half before the cursor first crosses the midpoint.
        self.phase = BufferPhase::RefillSecondHalf;
        if total_samples == 0 {
            self.state = PlaybackState::Stopped;
        }
        Ok(())
    }

    /// Open the first cataloged file whose display name contains `id`.
    pub fn open_by_name(&mut self, id: &str) -> Result<()> {
        let index = self
            .catalog
            .entries()
            .iter()
            .position(|entry| entry.name.contains(id))
            .ok_or_else(|| WavStreamError::NotFound(id.to_string()))?;
        self.open(index)
    }

    /// Close the open file, if any. Selection is retained.
    pub fn close(&mut self) -> Result<()> {
        self.state = PlaybackState::Stopped;
        self.phase = BufferPhase::Idle;
        match self.file.take() {
            Some(file) => self.storage.close_file(file),
            None => Ok(()),
        }
    }

    /// Next output sample. O(1), non-blocking, storage-free.
    ///
    /// Returns silence when stopped. When stopped with looping enabled the
    /// engine transitions back to playing, so a looped file that ran out
    /// resumes on the following tick.
    pub fn stream(&mut self) -> i16 {
        match self.state {
            PlaybackState::Playing => {
                let sample = self.buffer[self.read_ptr];
                self.read_ptr = (self.read_ptr + 1) % self.buffer.len();
                if self.read_ptr == 0 {
                    self.phase = BufferPhase::RefillSecondHalf;
                } else if self.read_ptr == self.buffer.len() / 2 {
                    self.phase = BufferPhase::RefillFirstHalf;
                }
                self.advance_position();
                sample
            }
            PlaybackState::Stopped => {
                if self.looping {
                    self.state = PlaybackState::Playing;
                }
                0
            }
        }
    }

    /// Refill the half the cursor last vacated. Call from a context with
    /// spare time budget, never from the sample-rate-critical path.
    ///
    /// No-op while the phase is [`BufferPhase::Idle`]. Reads one half-buffer
    /// of bytes; on a short read or end-of-file with looping enabled, the
    /// file wraps to the payload start and a top-up read completes the half,
    /// so the loop seam plays back without a silence gap. Without looping
    /// the remainder keeps its previous contents; the cursor stops at the
    /// logical end before ever reaching them.
    ///
    /// A storage failure propagates and leaves the phase flagged so the
    /// caller may retry; the phase returns to `Idle` only on completion.
    pub fn prepare(&mut self) -> Result<()> {
        if self.phase == BufferPhase::Idle {
            return Ok(());
        }
        if self.file.is_none() {
            self.phase = BufferPhase::Idle;
            return Ok(());
        }

        let half_bytes = self.io_buf.len();
        let buf_offset = match self.phase {
            BufferPhase::RefillSecondHalf => self.buffer.len() / 2,
            _ => 0,
        };

        let n = self.fill(buf_offset, half_bytes)?;
        let eof = match self.file.as_mut() {
            Some(file) => self.storage.at_eof(file),
            None => true,
        };

        if (n < half_bytes || eof) && self.looping {
            self.seek_to_payload()?;
            let rest = half_bytes - n;
            if rest > 0 {
                self.fill(buf_offset + n / 2, rest)?;
            }
        }

        self.phase = BufferPhase::Idle;
        Ok(())
    }

    /// Seek the open file back to the start of its sample payload and mark
    /// the engine playing. Buffer contents and cursors are untouched; only
    /// [`WavPlayer::open`] resets those.
    pub fn restart(&mut self) -> Result<()> {
        self.seek_to_payload()?;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Resume serving samples.
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Stop serving samples. Cursors and buffer are untouched, so a
    /// following [`WavPlayer::play`] resumes exactly where it paused.
    pub fn pause(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Milliseconds until the absolute cursor reaches the end of the open
    /// file; 0 when not playing.
    pub fn time_until_eof(&self) -> u32 {
        if self.state != PlaybackState::Playing {
            return 0;
        }
        let remaining = self.selected_total().saturating_sub(self.read_ptr_abs);
        (remaining as f32 / self.channels as f32 / self.sample_rate as f32 * 1000.0) as u32
    }

    /// Whether a loop is requested for the open file.
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Request or cancel looping playback.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Whether the engine is currently serving samples.
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Which buffer half, if any, awaits a refill. Hosts poll this from
    /// their idle loop to decide when [`WavPlayer::prepare`] is worthwhile.
    pub fn buffer_phase(&self) -> BufferPhase {
        self.phase
    }

    /// Number of cataloged files.
    pub fn num_files(&self) -> usize {
        self.catalog.len()
    }

    /// Index of the selected file, if any.
    pub fn current_file(&self) -> Option<usize> {
        self.selection
    }

    /// Display name of the cataloged file at `index`.
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.catalog.entry(index).map(|entry| entry.name.as_str())
    }

    /// The discovery catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Configured channel count of the sample buffer.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Fixed output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Override the output sample rate used for remaining-time queries.
    pub fn set_sample_rate(&mut self, hz: u32) -> Result<()> {
        if hz == 0 {
            return Err(WavStreamError::Config("sample rate must be non-zero".into()));
        }
        self.sample_rate = hz;
        Ok(())
    }

    fn selected_entry(&self) -> Option<&FileEntry> {
        self.selection.and_then(|index| self.catalog.entry(index))
    }

    fn selected_total(&self) -> u32 {
        self.selected_entry().map(|entry| entry.total_samples).unwrap_or(0)
    }

    /// Advance the logical position by one sample, wrapping at the end of
    /// the file. Completing a non-looping file is the end-of-file stop: the
    /// last payload sample has just been served.
    fn advance_position(&mut self) {
        let total = self.selected_total();
        if total == 0 {
            self.state = PlaybackState::Stopped;
            return;
        }
        self.read_ptr_abs += 1;
        if self.read_ptr_abs >= total {
            self.read_ptr_abs = 0;
            if !self.looping {
                self.state = PlaybackState::Stopped;
            }
        }
    }

    /// Read up to `byte_len` bytes into the staging area and decode them
    /// into the sample buffer at `buf_offset`. Returns the byte count read.
    fn fill(&mut self, buf_offset: usize, byte_len: usize) -> Result<usize> {
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        let n = self.storage.read(file, &mut self.io_buf[..byte_len])?;
        let samples = n / 2;
        for (slot, pair) in self.buffer[buf_offset..buf_offset + samples]
            .iter_mut()
            .zip(self.io_buf[..samples * 2].chunks_exact(2))
        {
            *slot = i16::from_le_bytes([pair[0], pair[1]]);
        }
        Ok(n)
    }

    fn seek_to_payload(&mut self) -> Result<()> {
        let offset = self
            .selected_entry()
            .map(|entry| entry.header.payload_offset())
            .ok_or_else(|| WavStreamError::Storage("no file selected".into()))?;
        let Some(file) = self.file.as_mut() else {
            return Err(WavStreamError::Storage("no file open".into()));
        };
        self.storage.seek(file, offset as u64)
    }
}
