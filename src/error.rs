//! Error types for the board, its move history and the search

use thiserror::Error;

use crate::WIDTH;

/// Failures of the board state transitions
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("column {column} is out of range, columns must be between 0 and {}", WIDTH - 1)]
    InvalidArgument { column: usize },

    #[error("column {column} is full")]
    InvalidMove { column: usize },

    #[error("there is no move to undo")]
    NoHistory,
}

/// Failures of the bounded move history
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("invalid history argument: {0}")]
    InvalidArgument(&'static str),

    #[error("history is full")]
    Full,

    #[error("history is empty")]
    Empty,
}

/// Failures of a single move suggestion
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid search request: {0}")]
    InvalidArgument(&'static str),

    #[error("the game is already over")]
    GameOver,

    #[error("node allocation failed after {allocated} nodes")]
    AllocationFailure { allocated: usize },

    #[error("the search tree root has no score")]
    NoScore,

    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_error_display() {
        assert_eq!(
            GameError::InvalidArgument { column: 9 }.to_string(),
            "column 9 is out of range, columns must be between 0 and 6"
        );
        assert_eq!(GameError::InvalidMove { column: 3 }.to_string(), "column 3 is full");
    }

    #[test]
    fn search_error_wraps_game_error() {
        let err: SearchError = GameError::NoHistory.into();
        assert_eq!(err, SearchError::Game(GameError::NoHistory));
        assert_eq!(err.to_string(), "there is no move to undo");
    }

    #[test]
    fn allocation_failure_display() {
        let err = SearchError::AllocationFailure { allocated: 12 };
        assert_eq!(err.to_string(), "node allocation failed after 12 nodes");
    }
}
