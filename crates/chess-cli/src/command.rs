//! Parsing of REPL input lines.

use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A move in UCI (`e2e4`, `e7e8n`) or SAN (`Nf3`, `O-O`) notation.
    Move(String),
    /// List the legal moves.
    Moves,
    Undo,
    Reset,
    Board,
    Fen,
    History,
    /// Static evaluation of the current position.
    Eval,
    /// Ask the external engine for a move.
    Hint,
    /// Count leaf nodes to the given depth.
    Perft(u32),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0} takes no arguments")]
    UnexpectedArgument(&'static str),
}

/// Deepest perft the REPL will run.
pub const MAX_PERFT_DEPTH: u32 = 6;

impl Command {
    /// Parses a trimmed input line. Anything that is not a keyword is
    /// treated as a move and resolved later against the legal moves.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(CommandError::Empty)?;
        let arg = words.next();

        let keyword = match word.to_ascii_lowercase().as_str() {
            "moves" => Some(("moves", Command::Moves)),
            "undo" => Some(("undo", Command::Undo)),
            "reset" | "new" => Some(("reset", Command::Reset)),
            "board" => Some(("board", Command::Board)),
            "fen" => Some(("fen", Command::Fen)),
            "history" => Some(("history", Command::History)),
            "eval" => Some(("eval", Command::Eval)),
            "hint" => Some(("hint", Command::Hint)),
            "help" | "?" => Some(("help", Command::Help)),
            "quit" | "exit" => Some(("quit", Command::Quit)),
            "perft" => {
                let depth = arg.ok_or(CommandError::MissingArgument("perft"))?;
                return match depth.parse::<u32>() {
                    Ok(d) if (1..=MAX_PERFT_DEPTH).contains(&d) => Ok(Command::Perft(d)),
                    _ => Err(CommandError::InvalidArgument(format!(
                        "perft depth must be 1-{}, got '{}'",
                        MAX_PERFT_DEPTH, depth
                    ))),
                };
            }
            _ => None,
        };

        match keyword {
            Some((name, _)) if arg.is_some() => Err(CommandError::UnexpectedArgument(name)),
            Some((_, command)) => Ok(command),
            None if arg.is_some() => Err(CommandError::InvalidArgument(line.trim().to_string())),
            None => Ok(Command::Move(word.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  <move>     play a move in UCI (e2e4, e7e8q) or SAN (Nf3, exd5, O-O)
  moves      list legal moves
  undo       take back the last move
  reset      start a new game
  board      show the board
  fen        show the position as FEN
  history    show the move history
  eval       static evaluation for the side to move
  hint       ask the engine for a move
  perft <n>  count positions n plies deep
  quit       leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(Command::parse("moves"), Ok(Command::Moves));
        assert_eq!(Command::parse("  UNDO "), Ok(Command::Undo));
        assert_eq!(Command::parse("new"), Ok(Command::Reset));
        assert_eq!(Command::parse("board"), Ok(Command::Board));
        assert_eq!(Command::parse("fen"), Ok(Command::Fen));
        assert_eq!(Command::parse("history"), Ok(Command::History));
        assert_eq!(Command::parse("eval"), Ok(Command::Eval));
        assert_eq!(Command::parse("hint"), Ok(Command::Hint));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn moves_pass_through() {
        assert_eq!(Command::parse("e2e4"), Ok(Command::Move("e2e4".to_string())));
        assert_eq!(Command::parse("O-O"), Ok(Command::Move("O-O".to_string())));
        assert_eq!(Command::parse("Nbd2"), Ok(Command::Move("Nbd2".to_string())));
    }

    #[test]
    fn perft_depth() {
        assert_eq!(Command::parse("perft 3"), Ok(Command::Perft(3)));
        assert_eq!(
            Command::parse("perft"),
            Err(CommandError::MissingArgument("perft"))
        );
        assert!(matches!(
            Command::parse("perft 0"),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!(
            Command::parse("perft 99"),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!(
            Command::parse("perft x"),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn bad_input() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("undo 2"),
            Err(CommandError::UnexpectedArgument("undo"))
        );
        assert!(matches!(
            Command::parse("e2 e4"),
            Err(CommandError::InvalidArgument(_))
        ));
    }
}
