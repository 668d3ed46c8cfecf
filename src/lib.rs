//! Double-buffered WAV streaming player core
//!
//! Discovers playable WAV-container files on a storage volume, parses their
//! fixed-layout headers, and streams 16-bit samples through a fixed,
//! pre-allocated ping-pong buffer so the audio output never stalls waiting on
//! storage I/O. Storage access goes through the [`Storage`] trait, so the same
//! engine runs against `std::fs` on a host or against an SD/flash driver on an
//! embedded target.
//!
//! # Features
//! - Fixed-size container header parsing (payload offset, sample count)
//! - Bounded file catalog built from a directory scan
//! - Ping-pong half-buffer refill state machine with a circular read cursor
//! - Looping playback with a gapless seam at the wrap point
//! - Remaining-time queries against a fixed output sample rate
//!
//! # Crate feature flags
//! - `streaming` (opt-in): Real-time audio output (enables optional `rodio` dep)
//!
//! # Quick start
//! ```no_run
//! use wavstream::{BufferPhase, StdStorage, WavPlayer};
//!
//! let mut player = WavPlayer::init(StdStorage::new(), "./music", vec![0i16; 4096], 1).unwrap();
//! player.open(0).unwrap();
//! // Hot path, once per output tick:
//! let _sample = player.stream();
//! // Idle path, whenever there is spare time:
//! if player.buffer_phase() != BufferPhase::Idle {
//!     player.prepare().unwrap();
//! }
//! ```
//!
//! ## Real-time output
//! ```no_run
//! # #[cfg(feature = "streaming")]
//! # {
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use wavstream::{AudioDevice, BufferPhase, StdStorage, WavPlayer};
//!
//! let mut player = WavPlayer::init(StdStorage::new(), "./music", vec![0i16; 4096], 1).unwrap();
//! player.open(0).unwrap();
//! let shared = Arc::new(Mutex::new(player));
//! let _device = AudioDevice::new(Arc::clone(&shared)).unwrap();
//! loop {
//!     let mut player = shared.lock();
//!     if player.buffer_phase() != BufferPhase::Idle {
//!         player.prepare().unwrap();
//!     }
//! # break;
//! }
//! # }
//! ```

#![warn(missing_docs)]

pub mod catalog; // Bounded file discovery table
pub mod config; // Player configuration
pub mod player; // Streaming engine and transport surface
pub mod storage; // Storage collaborator interface
#[cfg(feature = "streaming")]
pub mod streaming; // Audio output
pub mod wav_format; // Container header parsing

/// Error types for player operations
#[derive(thiserror::Error, Debug)]
pub enum WavStreamError {
    /// IO error from the host filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by a storage driver, or a storage lifecycle misuse
    #[error("Storage error: {0}")]
    Storage(String),

    /// Container header too short, or its declared geometry is invalid
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Name-based selection matched no cataloged file
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDevice(String),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, WavStreamError>;

// Public API exports
pub use catalog::{Catalog, FileEntry};
pub use config::PlayerConfig;
pub use player::{BufferPhase, PlaybackState, WavPlayer, DEFAULT_MAX_FILES, DEFAULT_SAMPLE_RATE};
pub use storage::{DirEntry, EntryAttributes, StdStorage, Storage};
#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, PlayerSource};
pub use wav_format::WavHeader;
