//! Player configuration
//!
//! Every field has a reference-platform default, so a config file only needs
//! to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::player::{DEFAULT_MAX_FILES, DEFAULT_SAMPLE_RATE};
use crate::{Result, WavStreamError};

/// Deployment configuration for a [`crate::WavPlayer`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Directory scanned for playable files
    pub search_path: String,
    /// Catalog slot count (one slot stays reserved)
    pub max_files: usize,
    /// Total sample buffer length, interleaved across channels
    pub buffer_samples: usize,
    /// Channel count of the sample buffer
    pub channels: usize,
    /// Fixed output sample rate in Hz
    pub sample_rate_hz: u32,
    /// Whether playback loops at end of file
    pub looping: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            search_path: "/".to_string(),
            max_files: DEFAULT_MAX_FILES,
            buffer_samples: 4096,
            channels: 1,
            sample_rate_hz: DEFAULT_SAMPLE_RATE,
            looping: false,
        }
    }
}

impl PlayerConfig {
    /// Parse a configuration from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WavStreamError::Config(e.to_string()))
    }
}
