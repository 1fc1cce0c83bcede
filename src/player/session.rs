use crate::playlist::PlaylistEntry;

/// What is playing right now. Local and stream sessions are exclusive by construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaybackSession {
    #[default]
    Idle,
    PlayingLocal {
        entry: PlaylistEntry,
        duration_secs: f64,
    },
    PausedLocal {
        entry: PlaylistEntry,
        duration_secs: f64,
    },
    PlayingStream {
        url: String,
    },
    PausedStream {
        url: String,
    },
}

impl PlaybackSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::PlayingLocal { .. } | Self::PausedLocal { .. })
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Self::PlayingStream { .. } | Self::PausedStream { .. })
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::PlayingLocal { .. } | Self::PlayingStream { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::PlayingLocal { .. } => "Playing",
            Self::PausedLocal { .. } => "Paused",
            Self::PlayingStream { .. } => "Streaming",
            Self::PausedStream { .. } => "Stream paused",
        }
    }
}

/// Elapsed/duration pair for the progress bar. Duration 0 means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressState {
    pub elapsed_secs: f64,
    pub duration_secs: f64,
}

impl ProgressState {
    /// Elapsed is clamped to `[0, duration]`.
    pub fn new(elapsed_secs: f64, duration_secs: f64) -> Self {
        let duration_secs = duration_secs.max(0.0);
        Self {
            elapsed_secs: elapsed_secs.clamp(0.0, duration_secs),
            duration_secs,
        }
    }
}

/// Snapshot published to the GUI after every command and tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerStatus {
    pub session: PlaybackSession,
    pub progress: ProgressState,
    pub display: String,
    pub auto_advance: bool,
    pub volume: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_clamped() {
        let p = ProgressState::new(250.0, 200.0);
        assert_eq!(p.elapsed_secs, 200.0);

        let p = ProgressState::new(-3.0, 200.0);
        assert_eq!(p.elapsed_secs, 0.0);
    }

    #[test]
    fn test_unknown_duration_has_no_progress() {
        let p = ProgressState::new(12.0, 0.0);
        assert_eq!(p.elapsed_secs, 0.0);
    }

    #[test]
    fn test_session_kinds() {
        let local = PlaybackSession::PausedLocal {
            entry: PlaylistEntry::new("/music/a.mp3"),
            duration_secs: 10.0,
        };
        assert!(local.is_local());
        assert!(!local.is_playing());

        let stream = PlaybackSession::PlayingStream {
            url: "http://radio".into(),
        };
        assert!(stream.is_stream());
        assert!(stream.is_playing());
        assert!(PlaybackSession::default().is_idle());
    }
}
