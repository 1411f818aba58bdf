use anyhow::{anyhow, Result};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};
use log::error;

use std::fmt;
use std::io::Write;
use std::ops::{Deref, DerefMut};

use crate::error::{GameError, HistoryError};
use crate::history::MoveHistory;
use crate::{HEIGHT, SPAN, WIDTH};

/// Column and row steps of the four line families: horizontal, vertical,
/// diagonal `/` and diagonal `\`
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn symbol(self) -> char {
        Cell::from(self).symbol()
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::PlayerOne => 'X',
            Cell::PlayerTwo => 'O',
            Cell::Empty => ' ',
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameState::Playing)
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            GameState::PlayerOneWin => Some(Player::One),
            GameState::PlayerTwoWin => Some(Player::Two),
            _ => None,
        }
    }
}

/// A gravity-drop game board
///
/// Invariant: the cell at `row` in `column` is occupied iff
/// `row < heights[column]`, and every occupied cell's column is recorded in
/// the history in play order (up to the history capacity).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
    player: Player,
    history: MoveHistory,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            player: Player::One,
            history: MoveHistory::default(),
        }
    }

    pub fn with_history_capacity(capacity: usize) -> Result<Self, HistoryError> {
        Ok(Self {
            history: MoveHistory::new(capacity)?,
            ..Self::new()
        })
    }

    /// Builds a board from a string of 1-indexed column digits, e.g. `"4453"`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => board.make_move(column - 1)?,
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// A disposable copy for searching `depth` plies ahead
    ///
    /// The copy starts with an empty history large enough to undo every move
    /// the search will stack on top of the current position.
    pub fn clone_for_search(&self, depth: usize) -> Self {
        Self {
            cells: self.cells,
            heights: self.heights,
            player: self.player,
            history: MoveHistory::new(depth.max(1)).unwrap_or_default(),
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn current_player(&self) -> Player {
        self.player
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn num_moves(&self) -> usize {
        self.heights.iter().sum()
    }

    pub fn is_valid_move(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT
    }

    pub fn valid_moves(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WIDTH).filter(move |&column| self.is_valid_move(column))
    }

    /// Drops a disc of the current player into `column` and passes the turn
    pub fn make_move(&mut self, column: usize) -> Result<(), GameError> {
        if column >= WIDTH {
            return Err(GameError::InvalidArgument { column });
        }
        if self.heights[column] == HEIGHT {
            return Err(GameError::InvalidMove { column });
        }

        self.cells[column + WIDTH * self.heights[column]] = self.player.into();
        self.heights[column] += 1;
        self.history.push_evicting(column);
        self.player = self.player.opponent();
        Ok(())
    }

    /// Takes back the most recent move, returning its column
    pub fn undo_last(&mut self) -> Result<usize, GameError> {
        let column = self
            .history
            .pop_last()
            .map_err(|_| GameError::NoHistory)?;

        self.heights[column] -= 1;
        self.cells[column + WIDTH * self.heights[column]] = Cell::Empty;
        self.player = self.player.opponent();
        Ok(column)
    }

    /// Applies `column` (if any) for as long as the returned guard lives
    ///
    /// The move is undone when the guard is dropped, so the board is restored
    /// on every exit path of the caller.
    pub fn scoped_move(&mut self, column: Option<usize>) -> Result<ScopedMove<'_>, GameError> {
        if let Some(column) = column {
            self.make_move(column)?;
        }
        Ok(ScopedMove {
            board: self,
            applied: column.is_some(),
        })
    }

    pub fn check_winner(&self) -> GameState {
        if self.has_alignment(Player::One) {
            return GameState::PlayerOneWin;
        }
        if self.has_alignment(Player::Two) {
            return GameState::PlayerTwoWin;
        }
        if self.heights.iter().all(|&height| height == HEIGHT) {
            GameState::Draw
        } else {
            GameState::Playing
        }
    }

    pub fn on_board(column: isize, row: isize) -> bool {
        column >= 0 && column < WIDTH as isize && row >= 0 && row < HEIGHT as isize
    }

    fn has_alignment(&self, player: Player) -> bool {
        let target = Cell::from(player);

        for &(dx, dy) in DIRECTIONS.iter() {
            for column in 0..WIDTH as isize {
                for row in 0..HEIGHT as isize {
                    // walk each line once, from its first cell
                    if Self::on_board(column - dx, row - dy) {
                        continue;
                    }
                    let (mut x, mut y) = (column, row);
                    let mut run = 0;
                    while Self::on_board(x, y) {
                        if self.cells[x as usize + WIDTH * y as usize] == target {
                            run += 1;
                            if run == SPAN {
                                return true;
                            }
                        } else {
                            run = 0;
                        }
                        x += dx;
                        y += dy;
                    }
                }
            }
        }
        false
    }

    /// Draws the board to a terminal, with coloured discs if `colour` is set
    pub fn display<W: Write>(&self, out: &mut W, colour: bool) -> Result<()> {
        if !colour {
            write!(out, "{}", self)?;
            out.flush()?;
            return Ok(());
        }

        for row in (0..HEIGHT).rev() {
            out.queue(PrintStyledContent(style("| ")))?;
            for column in 0..WIDTH {
                let cell = self.cell(row, column);
                out.queue(PrintStyledContent(
                    style(cell.symbol())
                        .attribute(Attribute::Bold)
                        .with(match cell {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?
                .queue(PrintStyledContent(style(" ")))?;
            }
            out.queue(PrintStyledContent(style("|\n")))?;
        }
        write!(out, "{}", Footer)?;
        out.flush()?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

struct Footer;

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(2 * WIDTH + 3))?;
        let labels: String = (1..=WIDTH).map(|x| format!("{} ", x)).collect();
        writeln!(f, "  {} ", labels)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            write!(f, "| ")?;
            for column in 0..WIDTH {
                write!(f, "{} ", self.cell(row, column).symbol())?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "{}", Footer)
    }
}

/// A move applied to a board for the lifetime of the guard
pub struct ScopedMove<'a> {
    board: &'a mut Board,
    applied: bool,
}

impl Deref for ScopedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl DerefMut for ScopedMove<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        if self.applied {
            if let Err(err) = self.board.undo_last() {
                error!("failed to restore board after scoped move: {}", err);
            }
        }
    }
}
