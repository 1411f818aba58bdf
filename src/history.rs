//! A bounded record of played columns, used to undo moves

use std::collections::VecDeque;

use crate::error::HistoryError;

/// The history capacity of a live game
pub const DEFAULT_CAPACITY: usize = 20;

/// A fixed-capacity FIFO of column indices
///
/// The live game pushes with [`push_evicting`], which silently drops the
/// oldest column once the history is full, so only the most recent
/// `capacity` moves can be undone.
///
/// [`push_evicting`]: MoveHistory::push_evicting
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveHistory {
    moves: VecDeque<usize>,
    capacity: usize,
}

impl MoveHistory {
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::InvalidArgument("capacity must be positive"));
        }
        Ok(Self {
            moves: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Appends a column, failing if the history is already full
    pub fn push(&mut self, column: usize) -> Result<(), HistoryError> {
        if self.is_full() {
            return Err(HistoryError::Full);
        }
        self.moves.push_back(column);
        Ok(())
    }

    /// Appends a column, evicting the oldest one first if the history is full
    ///
    /// Returns the evicted column, if any.
    pub fn push_evicting(&mut self, column: usize) -> Option<usize> {
        let evicted = if self.is_full() {
            self.moves.pop_front()
        } else {
            None
        };
        self.moves.push_back(column);
        evicted
    }

    pub fn pop_last(&mut self) -> Result<usize, HistoryError> {
        self.moves.pop_back().ok_or(HistoryError::Empty)
    }

    pub fn pop_first(&mut self) -> Result<usize, HistoryError> {
        self.moves.pop_front().ok_or(HistoryError::Empty)
    }

    pub fn first(&self) -> Option<usize> {
        self.moves.front().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.moves.back().copied()
    }

    /// The column at `index`, counting from the oldest recorded move
    pub fn get(&self, index: usize) -> Option<usize> {
        self.moves.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.moves.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.moves.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self {
            moves: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
        }
    }
}
