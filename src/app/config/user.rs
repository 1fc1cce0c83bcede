use crate::audio::types::DEFAULT_NETWORK_CACHING_MS;
use crate::player::DEFAULT_VOLUME;
use serde::{Deserialize, Serialize};

/// User-editable configuration (ReadOnly by App after load)
/// stored in `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Working directory at startup; relative paths resolve here
    #[serde(default = "default_music_dir")]
    pub music_directory: String,
    /// Where the debug and error logs go (defaults next to the config)
    #[serde(default)]
    pub log_directory: Option<String>,
    /// Audio buffered before a stream starts playing
    #[serde(default = "default_network_caching")]
    pub network_caching_ms: u64,
    /// Used when no saved state exists
    #[serde(default = "default_volume")]
    pub default_volume: u8,
}

fn default_music_dir() -> String {
    let home = dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    format!("{}/Music", home)
}

fn default_network_caching() -> u64 {
    DEFAULT_NETWORK_CACHING_MS
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            music_directory: default_music_dir(),
            log_directory: None,
            network_caching_ms: default_network_caching(),
            default_volume: default_volume(),
        }
    }
}
