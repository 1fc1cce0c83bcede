use super::sources::{connect_to_stream, run_decode_loop, BufferedSource, SampleQueue};
use super::types::{StreamFormat, StreamSettings, MAX_BUFFERED_SAMPLES};
use crate::error::{PlayerError, Result};
use crate::player::{StreamBackend, StreamHandle};
use rodio::{OutputStreamHandle, Sink};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use tracing::{debug, info};

struct ActiveStream {
    handle: StreamHandle,
    sink: Sink,
    running: Arc<AtomicBool>,
}

impl ActiveStream {
    fn shutdown(self) {
        self.running.store(false, Ordering::SeqCst);
        self.sink.stop();
    }
}

/// Internet radio over HTTP.
///
/// A worker thread owns the connection and decodes into a ring buffer; the sink plays
/// whatever is buffered. Only one stream is live at a time.
pub struct HttpStreamBackend {
    output: OutputStreamHandle,
    settings: StreamSettings,
    next_id: u64,
    active: Option<ActiveStream>,
}

impl HttpStreamBackend {
    pub fn new(output: OutputStreamHandle, settings: StreamSettings) -> Self {
        Self {
            output,
            settings,
            next_id: 0,
            active: None,
        }
    }

    fn active(&self, handle: StreamHandle) -> Option<&ActiveStream> {
        self.active.as_ref().filter(|a| a.handle == handle)
    }

    /// Connect and probe on a worker thread, wait for the verdict, then keep decoding there.
    fn spawn_worker(
        &self,
        url: &str,
        queue: SampleQueue,
        running: Arc<AtomicBool>,
        finished: Arc<AtomicBool>,
    ) -> Result<StreamFormat> {
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let url = url.to_string();
        let connect_timeout = self.settings.connect_timeout;

        thread::Builder::new()
            .name("playme-stream".to_string())
            .spawn(move || {
                let opened = match connect_to_stream(&url, connect_timeout) {
                    Ok(opened) => opened,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(opened.format));
                run_decode_loop(opened, queue, &running, MAX_BUFFERED_SAMPLES);
                finished.store(true, Ordering::SeqCst);
                debug!("Stream worker finished: {}", url);
            })
            .map_err(|e| PlayerError::Stream(format!("Failed to spawn stream worker: {}", e)))?;

        match ready_rx.recv() {
            Ok(result) => result.map_err(PlayerError::Stream),
            Err(_) => Err(PlayerError::Stream(
                "Stream worker exited before connecting".to_string(),
            )),
        }
    }
}

impl StreamBackend for HttpStreamBackend {
    fn open(&mut self, url: &str) -> Result<StreamHandle> {
        if let Some(previous) = self.active.take() {
            previous.shutdown();
        }

        let queue: SampleQueue = Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFERED_SAMPLES)));
        let running = Arc::new(AtomicBool::new(true));
        let finished = Arc::new(AtomicBool::new(false));

        let format = self
            .spawn_worker(url, queue.clone(), running.clone(), finished.clone())
            .inspect_err(|_| running.store(false, Ordering::SeqCst))?;
        info!(
            "Stream format: {}Hz / {}ch",
            format.sample_rate, format.channels
        );

        let sink = Sink::try_new(&self.output).map_err(|e| {
            running.store(false, Ordering::SeqCst);
            PlayerError::Stream(format!("Failed to open sink: {}", e))
        })?;
        let prebuffer = format.samples_for(self.settings.network_caching);
        sink.pause();
        sink.append(BufferedSource::new(
            queue,
            running.clone(),
            finished,
            format,
            prebuffer,
        ));

        self.next_id += 1;
        let handle = StreamHandle(self.next_id);
        self.active = Some(ActiveStream {
            handle,
            sink,
            running,
        });
        Ok(handle)
    }

    fn play(&mut self, handle: StreamHandle) {
        if let Some(active) = self.active(handle) {
            active.sink.play();
        }
    }

    fn pause(&mut self, handle: StreamHandle) {
        if let Some(active) = self.active(handle) {
            active.sink.pause();
        }
    }

    fn resume(&mut self, handle: StreamHandle) {
        if let Some(active) = self.active(handle) {
            active.sink.play();
        }
    }

    fn stop(&mut self, handle: StreamHandle) {
        if self.active(handle).is_some() {
            if let Some(active) = self.active.take() {
                active.shutdown();
            }
        }
    }

    fn is_playing(&self, handle: StreamHandle) -> bool {
        self.active(handle)
            .is_some_and(|a| !a.sink.is_paused() && !a.sink.empty())
    }

    fn set_volume(&mut self, handle: StreamHandle, volume: u8) {
        if let Some(active) = self.active(handle) {
            active.sink.set_volume(volume.min(100) as f32 / 100.0);
        }
    }
}

impl Drop for HttpStreamBackend {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.shutdown();
        }
    }
}
