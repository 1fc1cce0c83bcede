use std::path::PathBuf;
use thiserror::Error;

/// Everything the playback core can fail with.
///
/// Backend and I/O failures are caught where they happen, logged, and turned into
/// one of these so the caller can show a message without guessing at the state.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Playlist save/load or a file existence check failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The local backend rejected a file
    #[error("Playback error: {0}")]
    Playback(String),

    /// The streaming backend rejected a URL
    #[error("Stream error: {0}")]
    Stream(String),

    /// Tags or duration could not be read (recoverable)
    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("No playlist entry selected")]
    NoSelection,

    #[error("Stream URL is empty")]
    EmptyUrl,

    #[error("No playlist entry at index {0}")]
    EntryNotFound(usize),

    /// Output device could not be opened at startup
    #[error("Audio output error: {0}")]
    AudioOutput(String),
}

impl PlayerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short text for the dialog / prompt shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Io { .. } => "Could not access the playlist file.",
            Self::Playback(_) => "Error playing.",
            Self::Stream(_) => "Could not stream URL.",
            Self::Metadata(_) => "Ruh-Roh! No Meta Scooby Snacks",
            Self::NoSelection | Self::EntryNotFound(_) => "Please select a song.",
            Self::EmptyUrl => "No URL provided.",
            Self::AudioOutput(_) => "No audio output device available.",
        }
    }

    /// Validation problems are informational, everything else is an error dialog.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::NoSelection | Self::EmptyUrl | Self::EntryNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_informational() {
        assert!(PlayerError::NoSelection.is_informational());
        assert!(PlayerError::EmptyUrl.is_informational());
        assert!(!PlayerError::Stream("refused".into()).is_informational());
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = PlayerError::io(
            "/tmp/list.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.to_string();
        assert!(text.contains("/tmp/list.txt"));
        assert!(text.contains("denied"));
    }
}
