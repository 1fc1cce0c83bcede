use super::common::SampleQueue;
use crate::audio::types::StreamFormat;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSourceStream, ReadOnlySource};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

// A bad packet is skipped; this many in a row ends the stream.
const MAX_DECODE_RETRIES: usize = 3;

const KNOWN_EXTENSIONS: &[&str] = &["mp3", "aac", "ogg", "oga", "flac", "wav"];

/// symphonia wants `Read + Send + Sync`; the response is only `Send`.
struct ResponseReader(Mutex<Response>);

impl Read for ResponseReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0
            .get_mut()
            .map_err(|_| std::io::Error::other("stream reader poisoned"))?
            .read(buf)
    }
}

/// A connected, probed stream ready for decoding
pub struct OpenedStream {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    pub format: StreamFormat,
}

/// Container hint from the last path segment of a URL
fn extension_hint(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    KNOWN_EXTENSIONS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(ext))
        .copied()
}

/// GET `url` and probe the container. Blocks until the first bytes arrive.
pub fn connect_to_stream(url: &str, connect_timeout: Duration) -> Result<OpenedStream, String> {
    let client = Client::builder()
        .user_agent(concat!("playme/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(connect_timeout)
        .timeout(Option::<Duration>::None)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| format!("Failed to connect to {}: {}", url, e))?;
    if !response.status().is_success() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let mut hint = Hint::new();
    if let Some(mime) = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        debug!("Stream content type: {}", mime);
        hint.mime_type(mime);
    }
    if let Some(ext) = extension_hint(url) {
        hint.with_extension(ext);
    }

    let source = ReadOnlySource::new(ResponseReader(Mutex::new(response)));
    let mss = MediaSourceStream::new(Box::new(source), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("Unsupported stream format: {}", e))?;
    let reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or("No playable track in stream")?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or("Stream does not report a sample rate")?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .ok_or("Stream does not report a channel layout")?;
    let decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| format!("No decoder for stream: {}", e))?;

    Ok(OpenedStream {
        reader,
        decoder,
        track_id,
        format: StreamFormat {
            sample_rate,
            channels,
        },
    })
}

/// Decode packets into `queue` until the stream ends or `running` drops.
pub fn run_decode_loop(
    mut stream: OpenedStream,
    queue: SampleQueue,
    running: &AtomicBool,
    max_buffered: usize,
) {
    let mut decode_errors = 0;

    while running.load(Ordering::SeqCst) {
        let packet = match stream.reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                stream.decoder.reset();
                continue;
            }
            Err(e) => {
                debug!("Stream ended: {}", e);
                break;
            }
        };
        if packet.track_id() != stream.track_id {
            continue;
        }

        let decoded = match stream.decoder.decode(&packet) {
            Ok(decoded) => {
                decode_errors = 0;
                decoded
            }
            Err(SymphoniaError::DecodeError(e)) => {
                decode_errors += 1;
                warn!("Stream decode error: {}", e);
                if decode_errors > MAX_DECODE_RETRIES {
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!("Stream decoder failed: {}", e);
                break;
            }
        };

        let spec = *decoded.spec();
        let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        samples.copy_interleaved_ref(decoded);

        // Backpressure: wait for the output to catch up
        loop {
            let len = queue.lock().map(|q| q.len()).unwrap_or(0);
            if len < max_buffered {
                break;
            }
            thread::sleep(Duration::from_millis(5));
            if !running.load(Ordering::SeqCst) {
                return;
            }
        }

        if let Ok(mut q) = queue.lock() {
            q.extend(samples.samples().iter().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_hint() {
        assert_eq!(extension_hint("http://radio.example/live.mp3"), Some("mp3"));
        assert_eq!(
            extension_hint("https://host/stream.OGG?session=42"),
            Some("ogg")
        );
        assert_eq!(extension_hint("http://host:8000/stream"), None);
        assert_eq!(extension_hint("http://host/file.exe"), None);
    }
}
