use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// One line typed at the prompt. Single letters follow the old keyboard shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play the given index, or the current selection
    Play(Option<usize>),
    Pause,
    Resume,
    Stop,
    Toggle,
    Next,
    Previous,
    Stream(String),
    Add(PathBuf),
    Remove(usize),
    Select(usize),
    Deselect,
    Clear,
    Save(PathBuf),
    Load(PathBuf),
    Volume(u8),
    List,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("Not a valid number: {0}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
commands:
  play [n]        play entry n (or the selection)
  pause | resume | stop
  toggle | space  play/pause (an empty line does the same)
  next | n        next entry
  prev | p        previous entry
  stream | r URL  play an internet stream
  add | o PATH    add a file
  remove N        remove entry n
  select N        select entry n
  deselect        drop the selection
  clear           empty the playlist
  save | s PATH   save the playlist
  load | l PATH   load a playlist
  volume V        0-100
  list | status | help | quit";

fn index(arg: &str) -> Result<usize, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

fn required<'a>(
    arg: &'a str,
    name: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(name, what))
    } else {
        Ok(arg)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "" | "toggle" | "space" => Ok(Self::Toggle),
            "play" if rest.is_empty() => Ok(Self::Play(None)),
            "play" => Ok(Self::Play(Some(index(rest)?))),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "stop" => Ok(Self::Stop),
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" | "p" => Ok(Self::Previous),
            // A blank URL is passed through; the controller rejects it
            "stream" | "r" => Ok(Self::Stream(rest.to_string())),
            "add" | "o" => Ok(Self::Add(required(rest, "add", "a path")?.into())),
            "remove" => Ok(Self::Remove(index(required(rest, "remove", "an index")?)?)),
            "select" => Ok(Self::Select(index(required(rest, "select", "an index")?)?)),
            "deselect" => Ok(Self::Deselect),
            "clear" => Ok(Self::Clear),
            "save" | "s" => Ok(Self::Save(required(rest, "save", "a path")?.into())),
            "load" | "l" => Ok(Self::Load(required(rest, "load", "a path")?.into())),
            "volume" | "vol" => {
                let value = required(rest, "volume", "a value 0-100")?;
                value
                    .parse::<u8>()
                    .map(|v| Self::Volume(v.min(100)))
                    .map_err(|_| CommandError::InvalidNumber(value.to_string()))
            }
            "list" | "ls" => Ok(Self::List),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(parse("n"), Ok(Command::Next));
        assert_eq!(parse("p"), Ok(Command::Previous));
        assert_eq!(parse("   "), Ok(Command::Toggle));
        assert_eq!(parse("Q"), Ok(Command::Quit));
    }

    #[test]
    fn test_play_with_and_without_index() {
        assert_eq!(parse("play"), Ok(Command::Play(None)));
        assert_eq!(parse("play 3"), Ok(Command::Play(Some(3))));
        assert_eq!(
            parse("play three"),
            Err(CommandError::InvalidNumber("three".into()))
        );
    }

    #[test]
    fn test_paths_keep_spaces() {
        assert_eq!(
            parse("add /music/Some Band/01 Intro.mp3"),
            Ok(Command::Add("/music/Some Band/01 Intro.mp3".into()))
        );
        assert_eq!(
            parse("save  lists/road trip.txt "),
            Ok(Command::Save("lists/road trip.txt".into()))
        );
    }

    #[test]
    fn test_stream_without_url_passes_through() {
        assert_eq!(parse("stream"), Ok(Command::Stream(String::new())));
        assert_eq!(
            parse("r http://radio.example/live"),
            Ok(Command::Stream("http://radio.example/live".into()))
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            parse("load"),
            Err(CommandError::MissingArgument("load", "a path"))
        );
        assert_eq!(
            parse("remove"),
            Err(CommandError::MissingArgument("remove", "an index"))
        );
    }

    #[test]
    fn test_volume_clamped() {
        assert_eq!(parse("volume 150"), Ok(Command::Volume(100)));
        assert_eq!(parse("vol 40"), Ok(Command::Volume(40)));
        assert!(parse("volume loud").is_err());
    }

    #[test]
    fn test_deselect() {
        assert_eq!(parse("deselect"), Ok(Command::Deselect));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
    }
}
