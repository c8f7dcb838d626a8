//! The interactive session: a [`Game`] driven by text commands.

use crate::command::{Command, CommandError, HELP};
use chess_analysis::{evaluate_position, EngineBridge};
use chess_core::{Move, PieceKind, UciMove};
use chess_engine::movegen::perft::perft_divide;
use chess_engine::{move_to_san, Game, GameError};
use std::io::{BufRead, Write};

/// Whether the REPL keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    game: Game,
    engine: Option<Box<dyn EngineBridge>>,
    promotion: PieceKind,
}

impl Session {
    /// `promotion` is used for UCI promotions entered without a piece letter.
    pub fn new(game: Game, engine: Option<Box<dyn EngineBridge>>, promotion: PieceKind) -> Self {
        Self {
            game,
            engine,
            promotion,
        }
    }

    #[cfg(test)]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Reads commands line by line until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> anyhow::Result<()> {
        self.show_board(out)?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }

            match Command::parse(line.trim()) {
                Ok(command) => {
                    if self.execute(command, out)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(CommandError::Empty) => {}
                Err(e) => writeln!(out, "Error: {}", e)?,
            }
        }
    }

    /// Executes one command. Rule violations are reported to `out`; only
    /// output failures are returned as errors.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> anyhow::Result<Flow> {
        tracing::trace!(?command, "execute");

        match command {
            Command::Move(text) => match self.play(&text) {
                Ok(_) => {
                    self.show_board(out)?;
                }
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            Command::Moves => {
                let position = self.game.position();
                let moves: Vec<String> = self
                    .game
                    .legal_moves()
                    .iter()
                    .map(|&m| move_to_san(position, m))
                    .collect();
                if moves.is_empty() {
                    writeln!(out, "No legal moves.")?;
                } else {
                    writeln!(out, "{} legal moves: {}", moves.len(), moves.join(" "))?;
                }
            }
            Command::Undo => match self.game.undo() {
                Some(m) => {
                    writeln!(out, "Took back {}.", m)?;
                    self.show_board(out)?;
                }
                None => writeln!(out, "Nothing to undo.")?,
            },
            Command::Reset => {
                self.game.reset();
                self.show_board(out)?;
            }
            Command::Board => self.show_board(out)?,
            Command::Fen => writeln!(out, "{}", self.game.to_fen())?,
            Command::History => {
                let rows = self.game.history_rows();
                if rows.is_empty() {
                    writeln!(out, "No moves yet.")?;
                }
                for row in rows {
                    writeln!(out, "{}", row)?;
                }
            }
            Command::Eval => {
                let position = self.game.position();
                writeln!(
                    out,
                    "Static evaluation: {:+} cp for {}",
                    evaluate_position(position),
                    position.side_to_move()
                )?;
            }
            Command::Hint => self.hint(out)?,
            Command::Perft(depth) => {
                let mut position = self.game.position().clone();
                let divide = perft_divide(&mut position, depth);
                let total: u64 = divide.iter().map(|(_, n)| n).sum();
                for (uci, nodes) in &divide {
                    writeln!(out, "{}: {}", uci, nodes)?;
                }
                writeln!(out, "Nodes searched: {}", total)?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Plays UCI input when it parses as UCI, SAN otherwise.
    fn play(&mut self, text: &str) -> Result<Move, GameError> {
        match UciMove::parse(text) {
            Some(uci) => self.game.play(
                uci.key.from,
                uci.key.to,
                Some(uci.promotion.unwrap_or(self.promotion)),
            ),
            None => self.game.play_san(text),
        }
    }

    fn hint<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let Some(engine) = self.engine.as_mut() else {
            writeln!(out, "No engine configured.")?;
            return Ok(());
        };
        if self.game.is_game_over() {
            writeln!(out, "The game is over.")?;
            return Ok(());
        }

        let position = self.game.position();
        let suggestion = match engine.suggest(position) {
            Ok(suggestion) => suggestion,
            Err(e) => {
                tracing::warn!("engine request failed: {}", e);
                writeln!(out, "Error: {}", e)?;
                return Ok(());
            }
        };

        match suggestion.resolve(&position.valid_moves()) {
            Some(m) => {
                write!(
                    out,
                    "Engine suggests {} ({})",
                    move_to_san(position, m),
                    suggestion.evaluation
                )?;
                if !suggestion.pv.is_empty() {
                    write!(out, ", line: {}", suggestion.pv.join(" "))?;
                }
                writeln!(out)?;
            }
            None => writeln!(
                out,
                "Engine suggested {}, which is not legal here.",
                suggestion.key()
            )?,
        }
        Ok(())
    }

    fn show_board<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let position = self.game.position();
        writeln!(out, "{}", position.board())?;

        match self.game.result() {
            Some(result) => writeln!(out, "Game over: {} ({})", result, result.score())?,
            None if self.game.is_check() => {
                writeln!(out, "{} to move, in check.", position.side_to_move())?
            }
            None => writeln!(out, "{} to move.", position.side_to_move())?,
        }
        Ok(())
    }
}
