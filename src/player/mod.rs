//! Streaming engine and transport surface
//!
//! [`WavPlayer`] owns a fixed, pre-allocated sample buffer split into two
//! halves. The hot side ([`WavPlayer::stream`]) hands out one sample per
//! output tick and never touches storage; the idle side
//! ([`WavPlayer::prepare`]) refills whichever half the read cursor last
//! vacated. The two sides meet only through [`BufferPhase`]:
//!
//! - cursor wraps past the buffer end → `RefillSecondHalf` (the half it left)
//! - cursor crosses the midpoint → `RefillFirstHalf` (symmetrically)
//! - `prepare()` services the flagged half and returns the phase to `Idle`
//!
//! Refill of a half must complete before the cursor re-enters it, one full
//! half-traversal after the flag is raised. Missing that deadline is not
//! detected; the consumer is served whatever the half still holds (an
//! audible glitch, not a crash). Size the half accordingly: half frames
//! divided by the output rate bounds the worst-case storage read latency a
//! deployment can absorb, and the core cannot enforce that.
//!
//! The engine is strictly single-owner and lock-free; when the output driver
//! runs on another thread, wrap the whole player in a mutex at that boundary
//! (see the `streaming` feature) rather than splitting the engine itself.

mod engine;

pub use engine::WavPlayer;

/// Fixed output sample rate of the reference target in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Default catalog slot count (one slot stays reserved)
pub const DEFAULT_MAX_FILES: usize = 60;

/// Playback state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not serving samples; `stream()` returns silence
    Stopped,
    /// Serving samples from the ping-pong buffer
    Playing,
}

/// Which half of the sample buffer needs fresh data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPhase {
    /// Both halves are current; `prepare()` is a no-op
    Idle,
    /// The first half was vacated and awaits refill
    RefillFirstHalf,
    /// The second half was vacated and awaits refill
    RefillSecondHalf,
}
