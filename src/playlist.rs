use crate::error::{PlayerError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One playable file in the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    path: PathBuf,
    name: String,
}

impl PlaylistEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Basename shown in the playlist view
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered entries plus the selection cursor.
///
/// The cursor may point past the end (e.g. after a clear); that reads as "no selection".
#[derive(Debug, Default)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
    cursor: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    /// Append every path that exists, in input order. Missing files are skipped.
    pub fn add_paths<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut count = 0;
        for path in paths {
            let path = path.as_ref();
            if path.exists() {
                let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
                debug!("Added: {}", resolved.display());
                self.entries.push(PlaylistEntry::new(resolved));
                count += 1;
            } else {
                debug!("File does not exist, skipped: {}", path.display());
            }
        }
        debug!("Total files added: {}", count);
        count
    }

    pub fn remove(&mut self, index: usize) -> Option<PlaylistEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.cursor = match self.cursor {
            Some(c) if c == index => None,
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
        Some(removed)
    }

    /// Empties the list. Playback is the caller's business.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn entry_at(&self, index: usize) -> Result<&PlaylistEntry> {
        self.entries
            .get(index)
            .ok_or(PlayerError::EntryNotFound(index))
    }

    /// Current selection, only if it points at an entry.
    pub fn selection(&self) -> Option<usize> {
        self.cursor.filter(|&c| c < self.entries.len())
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.cursor = None;
    }

    /// One path per line, UTF-8, in playlist order.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            // A lossy path would not load back; refuse before writing anything.
            let line = entry.path.to_str().ok_or_else(|| {
                PlayerError::io(
                    path,
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("not valid UTF-8: {}", entry.path.display()),
                    ),
                )
            })?;
            content.push_str(line);
            content.push('\n');
        }
        fs::write(path, content).map_err(|e| PlayerError::io(path, e))?;
        debug!("Playlist saved {}", path.display());
        Ok(())
    }

    /// Replace the playlist with the paths listed in `path`.
    ///
    /// On a read failure the current playlist is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path).map_err(|e| PlayerError::io(path, e))?;
        self.clear();
        let lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
        let count = self.add_paths(lines);
        debug!("Playlist loaded {} ({} entries)", path.display(), count);
        Ok(count)
    }
}
