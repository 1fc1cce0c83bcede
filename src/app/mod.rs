pub mod config;
pub mod state;

pub mod cli;
pub mod commands;
pub mod events;
pub mod logging;
pub use state::*;
