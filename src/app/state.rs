use super::commands::{Command, HELP};
use super::events::AppEvent;
use crate::error::PlayerError;
use crate::player::{PlaybackController, PlayerStatus};
use tracing::debug;

/// The text front end: feeds commands to the controller and words the outcome.
pub struct App {
    pub controller: PlaybackController,
    pub is_running: bool,
}

/// `m:ss`
pub fn format_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn format_status(status: &PlayerStatus) -> String {
    let mut line = status.session.label().to_string();
    if !status.display.is_empty() {
        line.push_str(" | ");
        line.push_str(&status.display);
    }
    if status.progress.duration_secs > 0.0 {
        line.push_str(&format!(
            " | {} / {}",
            format_time(status.progress.elapsed_secs),
            format_time(status.progress.duration_secs)
        ));
    }
    line.push_str(&format!(" | vol {}%", status.volume));
    line
}

fn report(err: &PlayerError) -> String {
    if err.is_informational() {
        format!("Info: {}", err.user_message())
    } else {
        format!("Error: {}", err.user_message())
    }
}

impl App {
    pub fn new(controller: PlaybackController) -> Self {
        Self {
            controller,
            is_running: true,
        }
    }

    /// Handle one event; returns a message for the user, if any.
    pub fn on_event(&mut self, event: AppEvent) -> Option<String> {
        match event {
            AppEvent::Tick => {
                self.controller.tick();
                None
            }
            AppEvent::Command(command) => self.handle(command),
            AppEvent::InvalidInput(err) => Some(err.to_string()),
            AppEvent::InputClosed | AppEvent::Interrupt => {
                self.is_running = false;
                None
            }
        }
    }

    pub fn handle(&mut self, command: Command) -> Option<String> {
        debug!("Command: {:?}", command);
        let c = &mut self.controller;
        let outcome = match command {
            Command::Play(None) => match c.playlist().selection() {
                Some(index) => c.play_entry(index),
                None => Err(PlayerError::NoSelection),
            },
            Command::Play(Some(index)) => c.play_entry(index),
            Command::Pause => {
                c.pause();
                Ok(())
            }
            Command::Resume => {
                c.resume();
                Ok(())
            }
            Command::Stop => {
                c.stop();
                Ok(())
            }
            Command::Toggle => c.toggle_play_pause(),
            Command::Next => c.next(),
            Command::Previous => c.previous(),
            Command::Stream(url) => c.open_stream(&url),
            Command::Add(path) => {
                let added = c.add_paths([&path]);
                return Some(if added == 0 {
                    format!("File does not exist: {}", path.display())
                } else {
                    format!("Added {}", path.display())
                });
            }
            Command::Remove(index) => {
                return Some(match c.remove(index) {
                    Some(entry) => format!("Removed {}", entry.name()),
                    None => report(&PlayerError::EntryNotFound(index)),
                });
            }
            Command::Select(index) => {
                if c.select(index) {
                    Ok(())
                } else {
                    Err(PlayerError::EntryNotFound(index))
                }
            }
            Command::Deselect => {
                c.clear_selection();
                Ok(())
            }
            Command::Clear => {
                c.clear();
                Ok(())
            }
            Command::Save(path) => {
                if c.playlist().is_empty() {
                    return Some("Info: No songs to save in playlist.".to_string());
                }
                return Some(match c.save(&path) {
                    Ok(()) => format!("Playlist saved to {}", path.display()),
                    Err(_) => "Error: Could not save playlist.".to_string(),
                });
            }
            Command::Load(path) => {
                return Some(match c.load(&path) {
                    Ok(count) => format!("Loaded {} songs", count),
                    Err(_) => "Error: Could not load playlist.".to_string(),
                });
            }
            Command::Volume(volume) => {
                c.set_volume(volume);
                Ok(())
            }
            Command::List => return Some(self.render_playlist()),
            Command::Status => return Some(format_status(&self.controller.status())),
            Command::Help => return Some(HELP.to_string()),
            Command::Quit => {
                self.is_running = false;
                Ok(())
            }
        };
        outcome.err().map(|e| report(&e))
    }

    pub fn render_playlist(&self) -> String {
        let playlist = self.controller.playlist();
        if playlist.is_empty() {
            return "Playlist is empty".to_string();
        }
        let selection = playlist.selection();
        playlist
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let marker = if selection == Some(i) { '>' } else { ' ' };
                format!("{} [{}] {}", marker, i, entry.name())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
