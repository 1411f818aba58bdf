//! An interactive game of a human (player one) against the computer
//!
//! The session reads one command per line and answers on the output stream,
//! so it can be driven by a terminal or by a script.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{debug, info};

use std::io::{BufRead, Write};

use crate::board::{Board, GameState};
use crate::command::{parse_int, Command};
use crate::error::GameError;
use crate::history::DEFAULT_CAPACITY;
use crate::solver::{SearchConfig, Solver};
use crate::WIDTH;

/// The easiest difficulty level, searching one ply ahead
pub const MIN_LEVEL: usize = 1;
/// The hardest difficulty level
pub const MAX_LEVEL: usize = 7;

const NEXT_MOVE_PROMPT: &str = "Please make the next move:";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of moves that can be undone
    pub history_size: usize,
    /// Difficulty of the first game, asked for if `None`
    pub level: Option<usize>,
    /// Draw discs in colour
    pub colour: bool,
    /// Show a spinner while the computer searches
    pub show_progress: bool,
    pub search: SearchConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_CAPACITY,
            level: None,
            colour: true,
            show_progress: true,
            search: SearchConfig::default(),
        }
    }
}

/// How a single game ended
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Restart,
}

enum AfterGame {
    Resume,
    Leave(Outcome),
}

pub struct Session<R, W> {
    input: R,
    output: W,
    config: SessionConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, config: SessionConfig) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    /// Plays games until the human quits or the input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            let level = match self.config.level.take() {
                Some(level) => level,
                None => match self.read_level()? {
                    Some(level) => level,
                    None => return Ok(()),
                },
            };
            info!("starting a game at level {}", level);

            let board = Board::with_history_capacity(self.config.history_size)?;
            match self.play_from(board, level)? {
                Outcome::Quit => return Ok(()),
                Outcome::Restart => info!("game restarted"),
            }
        }
    }

    /// Plays one game from `board`, the human moving first
    pub fn play_from(&mut self, mut board: Board, level: usize) -> Result<Outcome> {
        self.show(&board)?;

        loop {
            writeln!(self.output, "{}", NEXT_MOVE_PROMPT)?;

            let state = loop {
                let line = match self.read_line()? {
                    Some(line) => line,
                    None => {
                        writeln!(self.output, "Error: invalid command")?;
                        return Ok(Outcome::Quit);
                    }
                };

                match Command::parse(&line) {
                    Command::AddDisc(column) => {
                        if let Some(state) = self.add_disc(&mut board, column, level)? {
                            break state;
                        }
                    }
                    Command::SuggestMove => {
                        let column = self.computer_move(&board, level)?;
                        writeln!(
                            self.output,
                            "Suggested move: drop a disc to column {}",
                            column + 1
                        )?;
                    }
                    Command::UndoMove => {
                        if self.undo_round(&mut board)? {
                            writeln!(self.output, "{}", NEXT_MOVE_PROMPT)?;
                        } else {
                            writeln!(self.output, "Error: cannot undo previous move!")?;
                        }
                    }
                    Command::Quit => return self.leave(Outcome::Quit),
                    Command::Restart => return self.leave(Outcome::Restart),
                    Command::Invalid => writeln!(self.output, "Error: invalid command")?,
                }
            };

            match self.game_over(&mut board, state)? {
                AfterGame::Resume => continue,
                AfterGame::Leave(outcome) => return self.leave(outcome),
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn read_level(&mut self) -> Result<Option<usize>> {
        loop {
            writeln!(
                self.output,
                "Please enter the difficulty level between [{}-{}]:",
                MIN_LEVEL, MAX_LEVEL
            )?;

            let line = match self.read_line()? {
                Some(line) => line,
                None => {
                    writeln!(self.output, "Error: invalid command")?;
                    return Ok(None);
                }
            };

            match parse_int(&line) {
                Some(level) if level >= MIN_LEVEL as i32 && level <= MAX_LEVEL as i32 => {
                    return Ok(Some(level as usize))
                }
                Some(_) => writeln!(
                    self.output,
                    "Error: invalid level (should be between {} to {})",
                    MIN_LEVEL, MAX_LEVEL
                )?,
                None if Command::parse(&line) == Command::Quit => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(None);
                }
                None => writeln!(self.output, "Error: invalid command")?,
            }
        }
    }

    fn leave(&mut self, outcome: Outcome) -> Result<Outcome> {
        match outcome {
            Outcome::Quit => writeln!(self.output, "Exiting...")?,
            Outcome::Restart => writeln!(self.output, "Game restarted!")?,
        }
        Ok(outcome)
    }

    fn show(&mut self, board: &Board) -> Result<()> {
        board.display(&mut self.output, self.config.colour)
    }

    /// Searches the computer's move at the session's difficulty
    fn computer_move(&self, board: &Board, level: usize) -> Result<usize> {
        let spinner = if self.config.show_progress {
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Computer is thinking...");
            spinner.enable_steady_tick(100);
            spinner
        } else {
            ProgressBar::hidden()
        };

        let result = Solver::new(level)
            .with_config(self.config.search)
            .suggest(board);
        spinner.finish_and_clear();

        result.with_context(|| format!("level {} move search failed", level))
    }

    /// Plays the human's disc and the computer's answer
    ///
    /// Returns the final state if either move ended the game.
    fn add_disc(&mut self, board: &mut Board, column: i32, level: usize) -> Result<Option<GameState>> {
        if column < 1 || column > WIDTH as i32 {
            writeln!(self.output, "Error: column number must be in range 1-{}", WIDTH)?;
            return Ok(None);
        }

        let column = (column - 1) as usize;
        match board.make_move(column) {
            Ok(()) => debug!("human played column {}", column),
            Err(GameError::InvalidMove { .. }) => {
                writeln!(self.output, "Error: column {} is full", column + 1)?;
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }

        let mut state = board.check_winner();
        if !state.is_over() {
            let reply = self.computer_move(board, level)?;
            board.make_move(reply)?;
            debug!("computer played column {}", reply);
            writeln!(self.output, "Computer move: add disc to column {}", reply + 1)?;
            state = board.check_winner();
        }

        self.show(board)?;
        if state.is_over() {
            Ok(Some(state))
        } else {
            writeln!(self.output, "{}", NEXT_MOVE_PROMPT)?;
            Ok(None)
        }
    }

    /// Takes back the computer's last disc and the human's disc before it
    fn undo_round(&mut self, board: &mut Board) -> Result<bool> {
        let computer = match board.undo_last() {
            Ok(column) => column,
            Err(GameError::NoHistory) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        writeln!(
            self.output,
            "Remove disc: remove computer's disc at column {}",
            computer + 1
        )?;

        if let Ok(user) = board.undo_last() {
            writeln!(self.output, "Remove disc: remove user's disc at column {}", user + 1)?;
        }
        self.show(board)?;
        Ok(true)
    }

    /// Takes back the human's winning disc
    fn undo_user_move(&mut self, board: &mut Board) -> Result<bool> {
        let user = match board.undo_last() {
            Ok(column) => column,
            Err(GameError::NoHistory) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        writeln!(self.output, "Remove disc: remove user's disc at column {}", user + 1)?;
        self.show(board)?;
        Ok(true)
    }

    fn game_over(&mut self, board: &mut Board, state: GameState) -> Result<AfterGame> {
        let message = match state {
            GameState::PlayerOneWin => "Game over: you win",
            GameState::PlayerTwoWin => "Game over: computer wins",
            _ => "Game over: it's a tie",
        };
        info!("{}", message);
        writeln!(self.output, "{}", message)?;
        writeln!(
            self.output,
            "Please enter 'quit' to exit or 'restart' to start a new game!"
        )?;

        loop {
            let line = match self.read_line()? {
                Some(line) => line,
                None => {
                    writeln!(self.output, "Error: invalid command")?;
                    return Ok(AfterGame::Leave(Outcome::Quit));
                }
            };

            match Command::parse(&line) {
                Command::Quit => return Ok(AfterGame::Leave(Outcome::Quit)),
                Command::Restart => return Ok(AfterGame::Leave(Outcome::Restart)),
                Command::UndoMove => {
                    let undone = if state == GameState::PlayerOneWin {
                        self.undo_user_move(board)?
                    } else {
                        self.undo_round(board)?
                    };
                    if undone {
                        return Ok(AfterGame::Resume);
                    }
                    writeln!(self.output, "Error: cannot undo previous move!")?;
                    return Ok(AfterGame::Leave(Outcome::Quit));
                }
                Command::AddDisc(_) | Command::SuggestMove => {
                    writeln!(self.output, "Error: the game is over")?
                }
                Command::Invalid => writeln!(self.output, "Error: invalid command")?,
            }
        }
    }
}
