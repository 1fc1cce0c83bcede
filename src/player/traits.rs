use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shown when a file carries no title tag
pub const UNKNOWN_TITLE: &str = "Ruh Roh";
/// Shown when a file carries no artist tag
pub const UNKNOWN_ARTIST: &str = "No Info Shaggy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    /// 0.0 when unknown
    pub duration_secs: f64,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            duration_secs: 0.0,
        }
    }
}

/// Opaque id for a stream opened by a [`StreamBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(pub u64);

/// Plays one local file at a time.
pub trait LocalBackend {
    /// Load `path`, replacing whatever was loaded. Does not start playback.
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    /// Idempotent
    fn stop(&mut self);
    /// True while audio is actually coming out (not paused, not finished).
    fn is_busy(&self) -> bool;
    fn elapsed_ms(&self) -> u64;
    /// 0.0..=1.0
    fn set_volume(&mut self, volume: f32);
}

/// Plays one remote stream at a time.
pub trait StreamBackend {
    fn open(&mut self, url: &str) -> Result<StreamHandle>;
    fn play(&mut self, handle: StreamHandle);
    fn pause(&mut self, handle: StreamHandle);
    fn resume(&mut self, handle: StreamHandle);
    fn stop(&mut self, handle: StreamHandle);
    fn is_playing(&self, handle: StreamHandle) -> bool;
    /// 0..=100
    fn set_volume(&mut self, handle: StreamHandle, volume: u8);
}

pub trait MetadataReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata>;
}
