use crate::error::{PlayerError, Result};
use rodio::{OutputStream, OutputStreamHandle};
use tracing::info;

/// The process-wide audio output, opened once at startup.
///
/// Both backends play through handles cloned from here; dropping this closes the device.
pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlayerError::AudioOutput(e.to_string()))?;
        info!("Mixer up");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn handle(&self) -> OutputStreamHandle {
        self.handle.clone()
    }
}
