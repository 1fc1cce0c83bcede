pub mod common;
pub mod http;

pub use common::{BufferedSource, SampleQueue};
pub use http::{connect_to_stream, run_decode_loop};
