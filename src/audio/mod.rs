pub mod local;
pub mod output;
pub mod sources;
pub mod stream;
pub mod types;

pub use local::RodioBackend;
pub use output::AudioOutput;
pub use stream::HttpStreamBackend;
pub use types::{StreamFormat, StreamSettings};
