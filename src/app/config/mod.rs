use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub mod persistence;
pub mod user;

pub use persistence::PersistentState;
pub use user::UserConfig;

pub struct AppConfig;

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let xdg_dir = home.join(".config").join("playme");

        // Ensure it exists
        if !xdg_dir.exists() {
            let _ = std::fs::create_dir_all(&xdg_dir);
        }

        xdg_dir
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_state_path() -> PathBuf {
        Self::get_config_dir().join("state.toml")
    }

    /// Log directory from the config, or `logs/` next to it
    pub fn log_dir(config: &UserConfig) -> PathBuf {
        config
            .log_directory
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::get_config_dir().join("logs"))
    }

    pub fn load() -> (UserConfig, PersistentState) {
        Self::load_from(&Self::get_config_dir())
    }

    /// Load both files from `dir`. Missing or malformed files fall back to defaults;
    /// a missing `config.toml` is written out so the user has something to edit.
    pub fn load_from(dir: &Path) -> (UserConfig, PersistentState) {
        let config_path = dir.join("config.toml");
        let state_path = dir.join("state.toml");

        // 1. Load User Config
        let user_config = if config_path.exists() {
            read_toml(&config_path).unwrap_or_default()
        } else {
            let c = UserConfig::default();
            if let Ok(content) = toml::to_string_pretty(&c) {
                let _ = fs::write(&config_path, content);
            }
            c
        };

        // 2. Load State, seeded from the config when there is none yet
        let state = read_toml(&state_path).unwrap_or(PersistentState {
            volume: user_config.default_volume,
        });

        (user_config, state)
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
