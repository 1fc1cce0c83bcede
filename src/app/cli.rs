use clap::Parser;
use std::path::PathBuf;

/// PlayMe - playlist player for local files and internet radio 🎵
#[derive(Parser, Debug)]
#[command(name = "playme", version, about)]
pub struct Args {
    /// Audio files to preload into the playlist
    pub files: Vec<PathBuf>,

    /// Start streaming this URL after the files are added
    #[arg(long, value_name = "URL")]
    pub stream_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_and_stream_url() {
        let args = Args::parse_from([
            "playme",
            "a.mp3",
            "--stream-url=http://radio.example/live",
            "b.flac",
        ]);
        assert_eq!(args.files, vec![PathBuf::from("a.mp3"), PathBuf::from("b.flac")]);
        assert_eq!(args.stream_url.as_deref(), Some("http://radio.example/live"));
    }

    #[test]
    fn test_no_arguments() {
        let args = Args::parse_from(["playme"]);
        assert!(args.files.is_empty());
        assert!(args.stream_url.is_none());
    }
}
