use crate::error::{PlayerError, Result};
use crate::player::LocalBackend;
use rodio::{Decoder, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock position of the current track, paused while the sink is paused.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    accumulated: Duration,
    started: Option<Instant>,
}

impl PlaybackClock {
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started = Some(Instant::now());
    }

    pub fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.accumulated += started.elapsed();
        }
    }

    pub fn resume(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.started.map(|s| s.elapsed()).unwrap_or_default()
    }
}

/// Local file playback on a rodio sink.
pub struct RodioBackend {
    output: OutputStreamHandle,
    sink: Option<Sink>,
    clock: PlaybackClock,
    volume: f32,
}

impl RodioBackend {
    pub fn new(output: OutputStreamHandle) -> Self {
        Self {
            output,
            sink: None,
            clock: PlaybackClock::default(),
            volume: 1.0,
        }
    }
}

impl LocalBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.stop();

        let file = File::open(path)
            .map_err(|e| PlayerError::Playback(format!("{}: {}", path.display(), e)))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlayerError::Playback(format!("{}: {}", path.display(), e)))?;
        let sink = Sink::try_new(&self.output)
            .map_err(|e| PlayerError::Playback(format!("Failed to open sink: {}", e)))?;

        // Loaded, not playing
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);
        self.sink = Some(sink);
        debug!("Loaded: {}", path.display());
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            self.clock.start();
            debug!("Playback started");
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
            self.clock.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            self.clock.resume();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.clock.reset();
    }

    fn is_busy(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }
}
