use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default settings
pub const DEFAULT_NETWORK_CACHING_MS: u64 = 300;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Upper bound on decoded samples waiting in the stream ring buffer
pub const MAX_BUFFERED_SAMPLES: usize = 32768 * 4;

/// Audio format reported by the stream probe
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for StreamFormat {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
        }
    }
}

impl StreamFormat {
    /// Number of interleaved samples covering `duration`
    pub fn samples_for(&self, duration: Duration) -> usize {
        let per_sec = self.sample_rate as u128 * self.channels as u128;
        (per_sec * duration.as_millis() / 1000) as usize
    }
}

/// Stream backend configuration
#[derive(Clone, Debug)]
pub struct StreamSettings {
    /// Audio buffered before a stream becomes audible
    pub network_caching: Duration,
    pub connect_timeout: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            network_caching: Duration::from_millis(DEFAULT_NETWORK_CACHING_MS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}
