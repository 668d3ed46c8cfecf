//! WAV container header parsing
//!
//! The containers this crate consumes carry a fixed 44-byte leading header,
//! immediately followed by a format sub-chunk of the size the header declares,
//! immediately followed by raw little-endian 16-bit signed PCM samples. No
//! other chunk types are recognized.

mod header;

pub use header::{parse, WavHeader};
