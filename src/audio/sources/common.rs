use crate::audio::types::StreamFormat;
use rodio::Source;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Interleaved f32 samples shared between the decode thread and the output.
pub type SampleQueue = Arc<Mutex<VecDeque<f32>>>;

/// rodio source draining a [`SampleQueue`].
///
/// Emits whole silent frames until `prebuffer` samples are queued and whenever the
/// queue runs dry, so an underrun never swaps channels. Ends once `running` drops or
/// the producer has finished and the queue is empty.
pub struct BufferedSource {
    queue: SampleQueue,
    running: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    format: StreamFormat,
    prebuffer: usize,
    primed: bool,
    frame_pos: usize,
    silent_frame: bool,
}

impl BufferedSource {
    pub fn new(
        queue: SampleQueue,
        running: Arc<AtomicBool>,
        finished: Arc<AtomicBool>,
        format: StreamFormat,
        prebuffer: usize,
    ) -> Self {
        Self {
            queue,
            running,
            finished,
            format,
            prebuffer,
            primed: false,
            frame_pos: 0,
            silent_frame: true,
        }
    }
}

impl Iterator for BufferedSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if !self.running.load(Ordering::Relaxed) {
            return None;
        }
        let channels = self.format.channels.max(1) as usize;
        let mut queue = self.queue.lock().ok()?;

        if self.frame_pos == 0 {
            let finished = self.finished.load(Ordering::Relaxed);
            if !self.primed && (queue.len() >= self.prebuffer || finished) {
                self.primed = true;
            }
            if finished && queue.len() < channels {
                return None;
            }
            self.silent_frame = !self.primed || queue.len() < channels;
        }
        self.frame_pos = (self.frame_pos + 1) % channels;

        if self.silent_frame {
            Some(0.0)
        } else {
            Some(queue.pop_front().unwrap_or(0.0))
        }
    }
}

impl Source for BufferedSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.format.channels
    }

    fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(samples: &[f32], prebuffer: usize, finished: bool) -> (BufferedSource, SampleQueue) {
        let queue: SampleQueue = Arc::new(Mutex::new(samples.iter().copied().collect()));
        let src = BufferedSource::new(
            queue.clone(),
            Arc::new(AtomicBool::new(true)),
            Arc::new(AtomicBool::new(finished)),
            StreamFormat {
                sample_rate: 8000,
                channels: 2,
            },
            prebuffer,
        );
        (src, queue)
    }

    #[test]
    fn test_drains_then_ends_when_finished() {
        let (src, _) = source(&[0.1, 0.2, 0.3, 0.4], 100, true);
        let out: Vec<f32> = src.collect();
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_silence_until_prebuffered() {
        let (mut src, queue) = source(&[0.5, 0.5], 4, false);
        assert_eq!(src.next(), Some(0.0));
        assert_eq!(src.next(), Some(0.0));
        assert_eq!(queue.lock().unwrap().len(), 2);

        queue.lock().unwrap().extend([0.7, 0.7]);
        assert_eq!(src.next(), Some(0.5));
        assert_eq!(src.next(), Some(0.5));
        assert_eq!(src.next(), Some(0.7));
    }

    #[test]
    fn test_underrun_yields_whole_silent_frames() {
        let (mut src, queue) = source(&[0.9, 0.8, 0.7], 0, false);
        assert_eq!(src.next(), Some(0.9));
        assert_eq!(src.next(), Some(0.8));
        // Half a frame left: wait for the rest
        assert_eq!(src.next(), Some(0.0));
        assert_eq!(src.next(), Some(0.0));
        queue.lock().unwrap().push_back(0.6);
        assert_eq!(src.next(), Some(0.7));
        assert_eq!(src.next(), Some(0.6));
    }

    #[test]
    fn test_stops_when_not_running() {
        let (mut src, _) = source(&[0.1, 0.2], 0, false);
        src.running.store(false, Ordering::Relaxed);
        assert_eq!(src.next(), None);
    }
}
