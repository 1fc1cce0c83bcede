use super::session::{PlaybackSession, PlayerStatus, ProgressState};
use super::traits::{LocalBackend, MetadataReader, StreamBackend, StreamHandle, TrackMetadata};
use crate::error::{PlayerError, Result};
use crate::playlist::{Playlist, PlaylistEntry};
use std::path::Path;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const NO_META_TEXT: &str = "[ ON AIR ] Ruh-Roh! No Meta Scooby Snacks";
const PLAY_ERROR_TEXT: &str = "Error playing.";
/// How much of a stream URL fits on the display line
const STREAM_LABEL_CHARS: usize = 45;

pub const DEFAULT_VOLUME: u8 = 80;

/// Owns the playlist, the session and both backends.
///
/// Everything runs on one execution context: transport commands and [`tick`](Self::tick)
/// are never interleaved, so there is no locking here.
pub struct PlaybackController {
    playlist: Playlist,
    session: PlaybackSession,
    auto_advance: bool,
    progress: ProgressState,
    display: String,
    volume: u8,
    local: Box<dyn LocalBackend>,
    stream: Box<dyn StreamBackend>,
    /// Some only while the session is a stream session
    stream_handle: Option<StreamHandle>,
    metadata: Box<dyn MetadataReader>,
    status_tx: watch::Sender<PlayerStatus>,
}

impl PlaybackController {
    pub fn new(
        local: Box<dyn LocalBackend>,
        stream: Box<dyn StreamBackend>,
        metadata: Box<dyn MetadataReader>,
    ) -> Self {
        let (status_tx, _) = watch::channel(PlayerStatus::default());
        let mut controller = Self {
            playlist: Playlist::new(),
            session: PlaybackSession::Idle,
            auto_advance: false,
            progress: ProgressState::default(),
            display: String::new(),
            volume: DEFAULT_VOLUME,
            local,
            stream,
            stream_handle: None,
            metadata,
            status_tx,
        };
        controller.set_volume(DEFAULT_VOLUME);
        controller
    }

    pub fn subscribe(&self) -> watch::Receiver<PlayerStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            session: self.session.clone(),
            progress: self.progress,
            display: self.display.clone(),
            auto_advance: self.auto_advance,
            volume: self.volume,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    // --- Playlist ---

    pub fn add_paths<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        debug!("Adding files to playlist");
        self.playlist.add_paths(paths)
    }

    pub fn remove(&mut self, index: usize) -> Option<PlaylistEntry> {
        let removed = self.playlist.remove(index);
        if let Some(entry) = &removed {
            debug!("Removed {} from playlist", entry.name());
        }
        removed
    }

    pub fn select(&mut self, index: usize) -> bool {
        self.playlist.select(index)
    }

    pub fn clear_selection(&mut self) {
        self.playlist.clear_selection();
        self.publish();
    }

    /// Empties the playlist. A running session keeps running.
    pub fn clear(&mut self) {
        debug!("Clearing playlist");
        self.playlist.clear();
        self.reset_after_clear();
        self.publish();
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        debug!("Saving playlist to {}", path.display());
        self.playlist.save(path).inspect_err(|e| {
            error!("Error saving: {}", e);
        })
    }

    pub fn load(&mut self, path: &Path) -> Result<usize> {
        debug!("Loading playlist from {}", path.display());
        let count = self.playlist.load(path).inspect_err(|e| {
            error!("Error loading: {}", e);
        })?;
        self.reset_after_clear();
        self.publish();
        Ok(count)
    }

    // --- Transport ---

    /// Stop whatever is playing and start `index` on the local backend.
    pub fn play_entry(&mut self, index: usize) -> Result<()> {
        debug!("Attempting to play entry {}", index);
        self.halt_backends();
        self.session = PlaybackSession::Idle;
        self.progress = ProgressState::default();

        let entry = match self.playlist.entry_at(index) {
            Ok(entry) => entry.clone(),
            Err(_) => {
                debug!("No entry at index {}", index);
                // Playback was halted, so there is nothing left to chain from.
                self.auto_advance = false;
                self.publish();
                return Err(PlayerError::NoSelection);
            }
        };
        self.playlist.select(index);

        let (meta, display) = match self.metadata.read(entry.path()) {
            Ok(meta) => {
                debug!(
                    "Metadata: Title='{}', Artist='{}', Duration={:.2} sec",
                    meta.title, meta.artist, meta.duration_secs
                );
                let display = format!("[ ON AIR ] {} ~ {}", meta.title, meta.artist);
                (meta, display)
            }
            Err(e) => {
                warn!("Error reading metadata: {}", e);
                (TrackMetadata::default(), NO_META_TEXT.to_string())
            }
        };

        if let Err(e) = self.local.load(entry.path()) {
            error!("Error playing {}: {}", entry.path().display(), e);
            self.display = PLAY_ERROR_TEXT.to_string();
            self.publish();
            return Err(e);
        }
        self.local.set_volume(self.volume_fraction());
        self.local.play();
        info!("Playing {}", entry.path().display());

        let duration_secs = meta.duration_secs.max(0.0);
        self.session = PlaybackSession::PlayingLocal {
            entry,
            duration_secs,
        };
        self.progress = ProgressState::new(0.0, duration_secs);
        self.display = display;
        self.auto_advance = true;
        self.publish();
        Ok(())
    }

    /// Stop whatever is playing and start a network stream. Streams never auto-advance.
    pub fn open_stream(&mut self, url: &str) -> Result<()> {
        debug!("Attempting to stream URL");
        let url = url.trim();
        if url.is_empty() {
            debug!("No URL provided");
            return Err(PlayerError::EmptyUrl);
        }

        self.stop();
        let handle = self.stream.open(url).inspect_err(|e| {
            error!("Error streaming {}: {}", url, e);
        })?;
        self.stream.set_volume(handle, self.volume);
        self.stream.play(handle);
        self.stream_handle = Some(handle);

        info!("Streaming: {}", url);
        self.display = stream_label(url);
        self.session = PlaybackSession::PlayingStream {
            url: url.to_string(),
        };
        self.publish();
        Ok(())
    }

    pub fn pause(&mut self) {
        debug!("Pausing");
        self.session = match std::mem::take(&mut self.session) {
            PlaybackSession::PlayingLocal {
                entry,
                duration_secs,
            } => {
                self.local.pause();
                PlaybackSession::PausedLocal {
                    entry,
                    duration_secs,
                }
            }
            PlaybackSession::PlayingStream { url } => {
                if let Some(handle) = self.stream_handle {
                    self.stream.pause(handle);
                }
                PlaybackSession::PausedStream { url }
            }
            other => other,
        };
        self.auto_advance = false;
        self.publish();
    }

    pub fn resume(&mut self) {
        debug!("Resuming");
        let has_selection = self.playlist.selection().is_some();
        self.session = match std::mem::take(&mut self.session) {
            PlaybackSession::PausedLocal {
                entry,
                duration_secs,
            } if has_selection => {
                self.local.resume();
                self.auto_advance = true;
                PlaybackSession::PlayingLocal {
                    entry,
                    duration_secs,
                }
            }
            PlaybackSession::PausedStream { url } => {
                if let Some(handle) = self.stream_handle {
                    self.stream.resume(handle);
                }
                PlaybackSession::PlayingStream { url }
            }
            other => other,
        };
        self.publish();
    }

    pub fn stop(&mut self) {
        debug!("Stopping playback");
        self.halt_backends();
        self.session = PlaybackSession::Idle;
        self.progress = ProgressState::default();
        self.auto_advance = false;
        self.display.clear();
        self.publish();
    }

    pub fn toggle_play_pause(&mut self) -> Result<()> {
        debug!("Toggle play/pause");
        let stream_playing = self
            .stream_handle
            .is_some_and(|handle| self.stream.is_playing(handle));

        if self.local.is_busy() || stream_playing {
            debug!("Audio currently playing; pausing");
            self.pause();
            Ok(())
        } else if self.playlist.selection().is_some() {
            self.resume();
            Ok(())
        } else if !self.playlist.is_empty() {
            debug!("No song selected; defaulting to first");
            self.playlist.select(0);
            self.play_entry(0)
        } else {
            debug!("Playlist empty; nothing to play");
            Ok(())
        }
    }

    /// Step forward. Without a selection the current entry counts as 0.
    pub fn next(&mut self) -> Result<()> {
        debug!("Attempting to play next");
        let next = self.playlist.selection().unwrap_or(0) + 1;
        if next < self.playlist.len() {
            self.playlist.select(next);
            debug!("Switching to {}", next);
            self.play_entry(next)
        } else {
            self.auto_advance = false;
            debug!("Reached end of playlist; disabling auto advance");
            self.publish();
            Ok(())
        }
    }

    /// Step back. Without a selection the current entry counts as 0, so nothing plays.
    pub fn previous(&mut self) -> Result<()> {
        debug!("Attempting to play previous");
        match self.playlist.selection().unwrap_or(0).checked_sub(1) {
            Some(prev) => {
                self.playlist.select(prev);
                debug!("Switching to previous index {}", prev);
                self.play_entry(prev)
            }
            None => {
                self.auto_advance = false;
                debug!("No previous song available; disabling auto advance");
                self.publish();
                Ok(())
            }
        }
    }

    pub fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(100);
        self.local.set_volume(self.volume_fraction());
        if let Some(handle) = self.stream_handle {
            self.stream.set_volume(handle, self.volume);
        }
        debug!("Volume at {:.2}", self.volume_fraction());
        self.publish();
    }

    // --- Periodic ---

    /// One timer tick: progress first, then auto-advance.
    pub fn tick(&mut self) {
        self.poll_progress();
        self.check_auto_advance();
        self.publish();
    }

    fn poll_progress(&mut self) {
        self.progress = match &self.session {
            PlaybackSession::PlayingLocal { duration_secs, .. } if self.local.is_busy() => {
                let elapsed = self.local.elapsed_ms() as f64 / 1000.0;
                ProgressState::new(elapsed, *duration_secs)
            }
            PlaybackSession::PlayingLocal { duration_secs, .. }
            | PlaybackSession::PausedLocal { duration_secs, .. } => {
                ProgressState::new(0.0, *duration_secs)
            }
            _ => ProgressState::default(),
        };
    }

    fn check_auto_advance(&mut self) {
        if self.session.is_stream() || self.local.is_busy() {
            return;
        }
        if !self.auto_advance {
            // Ran out on its own with nothing to chain into.
            if matches!(self.session, PlaybackSession::PlayingLocal { .. }) {
                debug!("Track ended; auto advance disabled");
                self.session = PlaybackSession::Idle;
                self.progress = ProgressState::default();
            }
            return;
        }
        debug!("No music playing and auto advance enabled; attempting next entry");

        let next = self.playlist.selection().unwrap_or(0) + 1;
        if next < self.playlist.len() {
            self.playlist.select(next);
            if let Err(e) = self.play_entry(next) {
                warn!("Auto advance could not start entry {}: {}", next, e);
            }
        } else {
            self.auto_advance = false;
            // The backend ran out on its own; don't keep claiming we are playing.
            if matches!(self.session, PlaybackSession::PlayingLocal { .. }) {
                self.session = PlaybackSession::Idle;
                self.progress = ProgressState::default();
            }
            debug!("Reached end of playlist; disabling auto advance");
        }
    }

    pub fn shutdown(&mut self) {
        info!("Shutting down playback");
        self.stop();
    }

    // --- Internals ---

    fn halt_backends(&mut self) {
        if let Some(handle) = self.stream_handle.take() {
            debug!("Stopping stream");
            self.stream.stop(handle);
        }
        self.local.stop();
    }

    fn reset_after_clear(&mut self) {
        self.display.clear();
        self.auto_advance = false;
        self.progress = ProgressState::default();
    }

    fn volume_fraction(&self) -> f32 {
        self.volume as f32 / 100.0
    }

    fn publish(&self) {
        self.status_tx.send_replace(self.status());
    }
}

fn stream_label(url: &str) -> String {
    let skip = url.chars().count().saturating_sub(STREAM_LABEL_CHARS);
    let tail: String = url.chars().skip(skip).collect();
    format!("[ STREAMING ] ...{}", tail)
}
