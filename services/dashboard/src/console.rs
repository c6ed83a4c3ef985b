//! Line commands for the interactive dashboard

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("limit must be an integer, got {0:?}")]
    InvalidLimit(String),

    #[error("missing limit value")]
    MissingLimit,
}

/// A single user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleSort,
    SetLimit(i64),
    ToggleView,
    Refresh,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };

        match head.to_ascii_lowercase().as_str() {
            "s" | "sort" => Ok(Command::ToggleSort),
            "v" | "view" => Ok(Command::ToggleView),
            "r" | "refresh" => Ok(Command::Refresh),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            "l" | "limit" => {
                let value = parts.next().ok_or(CommandError::MissingLimit)?;
                value
                    .parse::<i64>()
                    .map(Command::SetLimit)
                    .map_err(|_| CommandError::InvalidLimit(value.to_string()))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
commands:
  s          toggle sort direction
  l <n>      show n coins (10, 20, 30, 50, 100)
  v          switch between cards and table
  r          refresh now
  q          quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("s".parse::<Command>(), Ok(Command::ToggleSort));
        assert_eq!(" View ".parse::<Command>(), Ok(Command::ToggleView));
        assert_eq!("r".parse::<Command>(), Ok(Command::Refresh));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("l 50".parse::<Command>(), Ok(Command::SetLimit(50)));
        assert_eq!("limit -1".parse::<Command>(), Ok(Command::SetLimit(-1)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("l".parse::<Command>(), Err(CommandError::MissingLimit));
        assert_eq!(
            "l many".parse::<Command>(),
            Err(CommandError::InvalidLimit("many".to_string()))
        );
        assert_eq!(
            "zoom".parse::<Command>(),
            Err(CommandError::Unknown("zoom".to_string()))
        );
    }
}
