use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Automatically saved session state
/// stored in `state.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentState {
    #[serde(default = "default_volume")]
    pub volume: u8,
}

fn default_volume() -> u8 {
    crate::player::DEFAULT_VOLUME
}

impl Default for PersistentState {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}

impl PersistentState {
    pub fn save(&self) {
        self.save_to(&super::AppConfig::get_state_path());
    }

    pub fn save_to(&self, path: &Path) {
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    warn!("Could not save state to {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("Could not serialize state: {}", e),
        }
    }
}
