//! A minimax move-suggestion engine for the board game 'Four in a Row'
//!
//! The engine builds the full game tree of every position reachable within a
//! depth budget, scores the leaves with a window-histogram heuristic and
//! propagates the scores back to the root to pick a column.
//!
//! # Basic Usage
//!
//! ```
//! use fiar_minimax::{board::Board, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // player 1 has three discs in the first column
//! let board = Board::from_moves("121212")?;
//! let best_move = Solver::new(1).suggest(&board)?;
//!
//! assert_eq!(best_move, 0);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod history;

pub mod board;

pub mod heuristic;

pub mod tree;

pub mod solver;

pub mod command;

pub mod session;


pub use board::{Board, GameState, Player};
pub use error::{GameError, HistoryError, SearchError};
pub use solver::{suggest, Solver};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of aligned tiles needed to win
pub const SPAN: usize = 4;

/// The number of buckets in the heuristic histogram, one per net window sum
pub const HISTOGRAM_SIZE: usize = 2 * SPAN + 1;

// a winning line has to fit on the board in every direction
const_assert!(SPAN <= WIDTH);
const_assert!(SPAN <= HEIGHT);
// column labels are printed and parsed as single digits
const_assert!(WIDTH <= 9);
