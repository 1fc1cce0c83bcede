#![allow(dead_code)]

use playme::error::{PlayerError, Result};
use playme::player::{
    LocalBackend, MetadataReader, PlaybackController, StreamBackend, StreamHandle, TrackMetadata,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// Shared view into the fake backends: a call log plus the knobs tests turn.
#[derive(Debug, Default)]
pub struct Probe {
    pub calls: Vec<String>,
    pub local_busy: bool,
    pub elapsed_ms: u64,
    /// File names the local backend refuses to load
    pub rejected: HashSet<String>,
    pub stream_fails: bool,
    pub stream_playing: bool,
    pub metadata_fails: bool,
    pub duration_secs: f64,
}

pub type Shared = Rc<RefCell<Probe>>;

impl Probe {
    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub struct FakeLocal(pub Shared);

impl LocalBackend for FakeLocal {
    fn load(&mut self, path: &Path) -> Result<()> {
        let mut probe = self.0.borrow_mut();
        let name = file_name(path);
        probe.calls.push(format!("local.load {}", name));
        if probe.rejected.contains(&name) {
            return Err(PlayerError::Playback(format!("cannot decode {}", name)));
        }
        probe.elapsed_ms = 0;
        Ok(())
    }

    fn play(&mut self) {
        let mut probe = self.0.borrow_mut();
        probe.calls.push("local.play".into());
        probe.local_busy = true;
    }

    fn pause(&mut self) {
        let mut probe = self.0.borrow_mut();
        probe.calls.push("local.pause".into());
        probe.local_busy = false;
    }

    fn resume(&mut self) {
        let mut probe = self.0.borrow_mut();
        probe.calls.push("local.resume".into());
        probe.local_busy = true;
    }

    fn stop(&mut self) {
        let mut probe = self.0.borrow_mut();
        probe.calls.push("local.stop".into());
        probe.local_busy = false;
        probe.elapsed_ms = 0;
    }

    fn is_busy(&self) -> bool {
        self.0.borrow().local_busy
    }

    fn elapsed_ms(&self) -> u64 {
        self.0.borrow().elapsed_ms
    }

    fn set_volume(&mut self, volume: f32) {
        self.0
            .borrow_mut()
            .calls
            .push(format!("local.volume {:.2}", volume));
    }
}

pub struct FakeStream {
    pub probe: Shared,
    next_id: u64,
}

impl FakeStream {
    pub fn new(probe: Shared) -> Self {
        Self { probe, next_id: 0 }
    }
}

impl StreamBackend for FakeStream {
    fn open(&mut self, url: &str) -> Result<StreamHandle> {
        let mut probe = self.probe.borrow_mut();
        probe.calls.push("stream.open".into());
        if probe.stream_fails {
            return Err(PlayerError::Stream(format!("unreachable: {}", url)));
        }
        self.next_id += 1;
        Ok(StreamHandle(self.next_id))
    }

    fn play(&mut self, _handle: StreamHandle) {
        let mut probe = self.probe.borrow_mut();
        probe.calls.push("stream.play".into());
        probe.stream_playing = true;
    }

    fn pause(&mut self, _handle: StreamHandle) {
        let mut probe = self.probe.borrow_mut();
        probe.calls.push("stream.pause".into());
        probe.stream_playing = false;
    }

    fn resume(&mut self, _handle: StreamHandle) {
        let mut probe = self.probe.borrow_mut();
        probe.calls.push("stream.resume".into());
        probe.stream_playing = true;
    }

    fn stop(&mut self, _handle: StreamHandle) {
        let mut probe = self.probe.borrow_mut();
        probe.calls.push("stream.stop".into());
        probe.stream_playing = false;
    }

    fn is_playing(&self, _handle: StreamHandle) -> bool {
        self.probe.borrow().stream_playing
    }

    fn set_volume(&mut self, _handle: StreamHandle, volume: u8) {
        self.probe
            .borrow_mut()
            .calls
            .push(format!("stream.volume {}", volume));
    }
}

pub struct FakeMetadata(pub Shared);

impl MetadataReader for FakeMetadata {
    fn read(&self, path: &Path) -> Result<TrackMetadata> {
        let probe = self.0.borrow();
        if probe.metadata_fails {
            return Err(PlayerError::Metadata("no tags".into()));
        }
        Ok(TrackMetadata {
            title: file_name(path),
            artist: "Band".into(),
            duration_secs: probe.duration_secs,
        })
    }
}

pub fn new_probe() -> Shared {
    Rc::new(RefCell::new(Probe {
        duration_secs: 180.0,
        ..Default::default()
    }))
}

pub fn fake_controller(probe: &Shared) -> PlaybackController {
    PlaybackController::new(
        Box::new(FakeLocal(probe.clone())),
        Box::new(FakeStream::new(probe.clone())),
        Box::new(FakeMetadata(probe.clone())),
    )
}

/// Empty files named `{stem}{i}.{ext}` inside `dir`.
pub fn touch_tracks(dir: &TempDir, stem: &str, ext: &str, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.path().join(format!("{}{}.{}", stem, i, ext));
            fs::write(&path, b"").unwrap();
            path
        })
        .collect()
}

/// A controller over fake backends with `tracks` real (empty) files already queued.
pub struct Harness {
    pub controller: PlaybackController,
    pub probe: Shared,
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl Harness {
    pub fn new(tracks: usize) -> Self {
        let probe = new_probe();
        let dir = TempDir::new().unwrap();
        let files = touch_tracks(&dir, "track", "mp3", tracks);

        let mut controller = fake_controller(&probe);
        assert_eq!(controller.add_paths(&files), tracks);

        Self {
            controller,
            probe,
            dir,
            files,
        }
    }

    pub fn clear_calls(&self) {
        self.probe.borrow_mut().calls.clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.probe.borrow().calls.clone()
    }

    /// Pretend the local backend ran out of audio.
    pub fn finish_track(&self) {
        self.probe.borrow_mut().local_busy = false;
    }

    pub fn playing_name(&self) -> Option<String> {
        match self.controller.session() {
            playme::player::PlaybackSession::PlayingLocal { entry, .. }
            | playme::player::PlaybackSession::PausedLocal { entry, .. } => {
                Some(entry.name().to_string())
            }
            _ => None,
        }
    }
}
