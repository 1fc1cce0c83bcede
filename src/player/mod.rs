pub mod controller;
pub mod session;
pub mod traits;

pub use controller::{PlaybackController, DEFAULT_VOLUME};
pub use session::{PlaybackSession, PlayerStatus, ProgressState};
pub use traits::{LocalBackend, MetadataReader, StreamBackend, StreamHandle, TrackMetadata};
