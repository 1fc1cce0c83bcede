use crate::error::{PlayerError, Result};
use crate::player::traits::{UNKNOWN_ARTIST, UNKNOWN_TITLE};
use crate::player::{MetadataReader, TrackMetadata};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use std::path::Path;

/// Title, artist and duration via lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyMetadataReader;

impl MetadataReader for LoftyMetadataReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata> {
        let tagged_file = lofty::read_from_path(path)
            .map_err(|e| PlayerError::Metadata(format!("{}: {}", path.display(), e)))?;

        let duration_secs = tagged_file.properties().duration().as_secs_f64();
        // Try primary tag first, then any tag
        let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());
        let title = tag
            .and_then(|t| t.title().map(|s| s.to_string()))
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let artist = tag
            .and_then(|t| t.artist().map(|s| s.to_string()))
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        Ok(TrackMetadata {
            title,
            artist,
            duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unreadable_file_is_metadata_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"just some words").unwrap();

        let err = LoftyMetadataReader.read(&path).unwrap_err();
        assert!(matches!(err, PlayerError::Metadata(_)));
    }

    #[test]
    fn test_missing_file_is_metadata_error() {
        let err = LoftyMetadataReader
            .read(Path::new("/no/such/file.flac"))
            .unwrap_err();
        assert!(matches!(err, PlayerError::Metadata(_)));
    }
}
