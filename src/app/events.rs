use crate::app::commands::{Command, CommandError};

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Command(Command),
    InvalidInput(CommandError),
    /// stdin closed
    InputClosed,
    /// Ctrl-C
    Interrupt,
    /// The 1-second poll
    Tick,
}

/// Poll cadence for progress and auto-advance
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);
