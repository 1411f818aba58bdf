//! An agent to suggest moves in Four in a Row

use log::{debug, warn};

use crate::board::Board;
use crate::error::SearchError;
use crate::heuristic::Weights;
use crate::tree::{NodeAllocator, NodeStats, SearchTree};

/// Tuning of a search, shared by every call of a [`Solver`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Weights of the leaf heuristic
    pub weights: Weights,
    /// Maximum number of live tree nodes, unlimited if `None`
    pub node_limit: Option<usize>,
}

/// The outcome of one search
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// The suggested column, 0-indexed
    pub column: usize,
    /// The minimax score of the position for the player to move
    pub score: i32,
}

/// A full-width minimax agent
///
/// # Notes
/// Every call builds the complete game tree of the given depth over a private
/// copy of the board, scores the leaves with the window heuristic and picks
/// the leftmost of the best-scoring columns. The caller's board is never
/// modified.
#[derive(Clone, Debug)]
pub struct Solver {
    depth: usize,
    config: SearchConfig,

    /// Node counts of the most recent search (for diagnostics only)
    pub node_stats: NodeStats,
}

impl Solver {
    /// Creates a new `Solver` searching `depth` plies ahead
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            config: SearchConfig::default(),
            node_stats: NodeStats::default(),
        }
    }

    /// Replaces the search configuration of an existing `Solver`
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Calculates the best column for the player to move
    pub fn suggest(&mut self, board: &Board) -> Result<usize, SearchError> {
        self.analyse(board).map(|suggestion| suggestion.column)
    }

    /// Calculates the best column for the player to move, along with its score
    pub fn analyse(&mut self, board: &Board) -> Result<Suggestion, SearchError> {
        if self.depth == 0 {
            return Err(SearchError::InvalidArgument("search depth must be positive"));
        }
        if board.check_winner().is_over() {
            return Err(SearchError::GameOver);
        }

        let mut board = board.clone_for_search(self.depth);
        let mut allocator = NodeAllocator::new(self.config.node_limit);

        let result = SearchTree::build(&mut board, self.depth, &mut allocator).and_then(|mut tree| {
            let outcome = tree.score(&mut board, &self.config.weights).and_then(|score| {
                Ok(Suggestion {
                    column: tree.best_move(&board)?,
                    score,
                })
            });
            tree.teardown(&mut allocator);
            outcome
        });

        self.node_stats = allocator.stats();
        match &result {
            Ok(suggestion) => debug!(
                "depth {} search picked column {} with score {} ({} nodes)",
                self.depth, suggestion.column, suggestion.score, self.node_stats.constructed
            ),
            Err(err) => warn!("depth {} search failed: {}", self.depth, err),
        }
        result
    }
}

/// Suggests a column for the player to move in `board`, searching `depth` plies
///
/// Fails if there is no board, the depth is zero or the game is already over.
pub fn suggest(board: Option<&Board>, depth: usize) -> Result<usize, SearchError> {
    let board = board.ok_or(SearchError::InvalidArgument("no board to search"))?;
    Solver::new(depth).suggest(board)
}
