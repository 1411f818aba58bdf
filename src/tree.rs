//! The minimax game tree
//!
//! A tree is built depth-first over a single shared board: each node applies
//! its move on the way down and takes it back on the way up, so the board is
//! in the node's position exactly while the node is being expanded or scored.

use log::{trace, warn};

use crate::board::{Board, Player};
use crate::error::SearchError;
use crate::heuristic::{self, Weights};
use crate::WIDTH;

/// Whether a layer of the tree takes the maximum or the minimum of its children
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polarity {
    Max,
    Min,
}

impl Polarity {
    pub fn opposite(self) -> Self {
        match self {
            Polarity::Max => Polarity::Min,
            Polarity::Min => Polarity::Max,
        }
    }
}

/// A hypothetical position, reached from its parent by one disc drop
///
/// The root holds no move. Children are stored in the slot of the column that
/// produced them; columns that were full at this position have no child.
#[derive(Debug)]
pub struct Node {
    column: Option<usize>,
    polarity: Polarity,
    maximizer: Player,
    score: Option<i32>,
    children: [Option<Box<Node>>; WIDTH],
}

impl Node {
    fn new(column: Option<usize>, polarity: Polarity, maximizer: Player) -> Self {
        Self {
            column,
            polarity,
            maximizer,
            score: None,
            children: Default::default(),
        }
    }

    /// The column played to reach this node, `None` for the root
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// The player whose wins score `i32::MAX` everywhere in this tree
    pub fn maximizer(&self) -> Player {
        self.maximizer
    }

    pub fn score(&self) -> Option<i32> {
        self.score
    }

    pub fn child(&self, column: usize) -> Option<&Node> {
        self.children.get(column).and_then(|slot| slot.as_deref())
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> + '_ {
        self.children.iter().filter_map(|slot| slot.as_deref())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Number of nodes in the subtree rooted here, this node included
    pub fn count_nodes(&self) -> usize {
        1 + self.children().map(Node::count_nodes).sum::<usize>()
    }
}

/// Construction and destruction counts of one search
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub constructed: usize,
    pub destroyed: usize,
}

impl NodeStats {
    /// Nodes constructed but not yet destroyed
    pub fn live(&self) -> usize {
        self.constructed - self.destroyed
    }
}

/// Hands out tree nodes, failing once the live node count reaches its limit
#[derive(Clone, Debug, Default)]
pub struct NodeAllocator {
    limit: Option<usize>,
    stats: NodeStats,
}

impl NodeAllocator {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            stats: NodeStats::default(),
        }
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    fn allocate(
        &mut self,
        column: Option<usize>,
        polarity: Polarity,
        maximizer: Player,
    ) -> Result<Box<Node>, SearchError> {
        if let Some(limit) = self.limit {
            if self.stats.live() >= limit {
                return Err(SearchError::AllocationFailure {
                    allocated: self.stats.constructed,
                });
            }
        }
        self.stats.constructed += 1;
        Ok(Box::new(Node::new(column, polarity, maximizer)))
    }

    /// Destroys a node, its children first
    fn release(&mut self, mut node: Box<Node>) {
        self.release_children(&mut node);
        self.stats.destroyed += 1;
    }

    fn release_children(&mut self, node: &mut Node) {
        for slot in node.children.iter_mut() {
            if let Some(child) = slot.take() {
                self.release(child);
            }
        }
    }
}

/// A fully built minimax tree for one position
#[derive(Debug)]
pub struct SearchTree {
    root: Box<Node>,
}

impl SearchTree {
    /// Expands every position reachable from `board` within `depth` plies
    ///
    /// The root maximizes for the player to move. On failure every node built
    /// so far has already been released back to `allocator`. The board is
    /// left as it was in both cases.
    pub fn build(
        board: &mut Board,
        depth: usize,
        allocator: &mut NodeAllocator,
    ) -> Result<Self, SearchError> {
        let mut root = allocator.allocate(None, Polarity::Max, board.current_player())?;

        if let Err(err) = expand(&mut root, board, depth, allocator) {
            allocator.release(root);
            warn!("aborted tree build at depth {}: {}", depth, err);
            return Err(err);
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Scores every node bottom-up, returning the root's score
    pub fn score(&mut self, board: &mut Board, weights: &Weights) -> Result<i32, SearchError> {
        let score = score_node(&mut self.root, board, weights)?;
        for child in self.root.children() {
            trace!("column {} scored {:?}", child.column.unwrap_or(WIDTH), child.score);
        }
        Ok(score)
    }

    /// The leftmost root move whose score matches the root's
    ///
    /// Must be called after [`score`](SearchTree::score), with the board in
    /// the root position.
    pub fn best_move(&self, board: &Board) -> Result<usize, SearchError> {
        let score = self.root.score.ok_or(SearchError::NoScore)?;
        if board.check_winner().is_over() {
            return Err(SearchError::GameOver);
        }

        self.root
            .children()
            .find(|child| child.score == Some(score))
            .and_then(Node::column)
            .ok_or(SearchError::NoScore)
    }

    /// Destroys the whole tree, children before parents
    pub fn teardown(self, allocator: &mut NodeAllocator) {
        allocator.release(self.root);
    }
}

fn expand(
    node: &mut Node,
    board: &mut Board,
    depth: usize,
    allocator: &mut NodeAllocator,
) -> Result<(), SearchError> {
    let mut board = board.scoped_move(node.column)?;

    if board.check_winner().is_over() || depth == 0 {
        return Ok(());
    }

    for column in 0..WIDTH {
        if !board.is_valid_move(column) {
            continue;
        }

        let mut child =
            match allocator.allocate(Some(column), node.polarity.opposite(), node.maximizer) {
                Ok(child) => child,
                Err(err) => {
                    allocator.release_children(node);
                    return Err(err);
                }
            };

        if let Err(err) = expand(&mut child, &mut board, depth - 1, allocator) {
            allocator.release(child);
            allocator.release_children(node);
            return Err(err);
        }
        node.children[column] = Some(child);
    }
    Ok(())
}

fn score_node(node: &mut Node, board: &mut Board, weights: &Weights) -> Result<i32, SearchError> {
    let mut board = board.scoped_move(node.column)?;

    let score = if node.is_leaf() {
        heuristic::evaluate(&board, node.maximizer, weights)
    } else {
        let mut best: Option<i32> = None;
        // first populated child seeds, strict comparison keeps the leftmost on ties
        for child in node.children.iter_mut().flatten() {
            let value = score_node(child, &mut board, weights)?;
            best = Some(match (best, node.polarity) {
                (None, _) => value,
                (Some(current), Polarity::Max) if value > current => value,
                (Some(current), Polarity::Min) if value < current => value,
                (Some(current), _) => current,
            });
        }
        best.ok_or(SearchError::NoScore)?
    };

    node.score = Some(score);
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn build(board: &mut Board, depth: usize) -> Result<(SearchTree, NodeAllocator)> {
        let mut allocator = NodeAllocator::new(None);
        let tree = SearchTree::build(board, depth, &mut allocator)?;
        Ok((tree, allocator))
    }

    #[test]
    fn depth_one_expands_every_column() -> Result<()> {
        let mut board = Board::new();
        let (tree, _) = build(&mut board, 1)?;
        let root = tree.root();

        assert_eq!(root.column(), None);
        assert_eq!(root.polarity(), Polarity::Max);
        assert_eq!(root.children().count(), WIDTH);
        for (column, child) in root.children().enumerate() {
            assert_eq!(child.column(), Some(column));
            assert_eq!(child.polarity(), Polarity::Min);
            assert_eq!(child.maximizer(), Player::One);
            assert!(child.is_leaf());
        }
        Ok(())
    }

    #[test]
    fn node_count_grows_with_branching() -> Result<()> {
        let mut board = Board::new();
        let (tree, allocator) = build(&mut board, 3)?;
        assert_eq!(tree.root().count_nodes(), 1 + 7 + 49 + 343);
        assert_eq!(allocator.stats().constructed, 1 + 7 + 49 + 343);
        Ok(())
    }

    #[test]
    fn full_columns_leave_empty_slots() -> Result<()> {
        let mut board = Board::from_moves("333333")?;
        let (tree, _) = build(&mut board, 2)?;
        let root = tree.root();

        assert!(root.child(2).is_none());
        assert_eq!(root.children().count(), WIDTH - 1);
        for child in root.children() {
            assert_eq!(child.children().count(), WIDTH - 1);
            assert!(child.children().all(|grandchild| grandchild.polarity() == Polarity::Max));
        }
        Ok(())
    }

    #[test]
    fn terminal_positions_are_leaves() -> Result<()> {
        // player one completes a column by playing in column 1
        let mut board = Board::from_moves("121212")?;
        let (tree, _) = build(&mut board, 3)?;
        let root = tree.root();

        assert!(root.child(0).map(Node::is_leaf).unwrap_or(false));
        assert!(root.child(3).map(|child| !child.is_leaf()).unwrap_or(false));
        Ok(())
    }

    #[test]
    fn build_and_score_restore_the_board() -> Result<()> {
        let mut board = Board::from_moves("4455")?.clone_for_search(3);
        let before = board.clone();
        let (mut tree, _) = build(&mut board, 3)?;
        assert_eq!(board, before);
        tree.score(&mut board, &Weights::default())?;
        assert_eq!(board, before);
        Ok(())
    }

    #[test]
    fn scores_follow_minimax() -> Result<()> {
        let mut board = Board::from_moves("4453")?.clone_for_search(2);
        let (mut tree, _) = build(&mut board, 2)?;
        let root_score = tree.score(&mut board, &Weights::default())?;

        let root = tree.root();
        assert_eq!(root.score(), Some(root_score));
        for child in root.children() {
            let lowest = child.children().filter_map(Node::score).min();
            assert_eq!(child.score(), lowest);
        }
        let highest = root.children().filter_map(Node::score).max();
        assert_eq!(Some(root_score), highest);
        Ok(())
    }

    #[test]
    fn best_move_takes_the_leftmost_tie() -> Result<()> {
        // every column scores the same on an empty board with zero weights
        let mut board = Board::new().clone_for_search(1);
        let (mut tree, _) = build(&mut board, 1)?;
        tree.score(&mut board, &Weights::new([0; 6]))?;
        assert_eq!(tree.best_move(&board)?, 0);
        Ok(())
    }

    #[test]
    fn best_move_needs_a_score() -> Result<()> {
        let mut board = Board::new();
        let (tree, _) = build(&mut board, 1)?;
        assert_eq!(tree.best_move(&board), Err(SearchError::NoScore));
        Ok(())
    }

    #[test]
    fn best_move_rejects_finished_games() -> Result<()> {
        let mut board = Board::from_moves("1212121")?.clone_for_search(2);
        let (mut tree, _) = build(&mut board, 2)?;
        assert!(tree.root().is_leaf());
        assert_eq!(tree.score(&mut board, &Weights::default())?, i32::MIN);
        assert_eq!(tree.best_move(&board), Err(SearchError::GameOver));
        Ok(())
    }

    #[test]
    fn teardown_releases_every_node() -> Result<()> {
        let mut board = Board::from_moves("17")?;
        let (tree, mut allocator) = build(&mut board, 3)?;
        let count = tree.root().count_nodes();
        tree.teardown(&mut allocator);
        assert_eq!(
            allocator.stats(),
            NodeStats {
                constructed: count,
                destroyed: count
            }
        );
        Ok(())
    }

    #[test]
    fn failed_allocation_releases_partial_tree() -> Result<()> {
        for limit in &[1, 2, 10, 57, 100] {
            let mut board = Board::new().clone_for_search(3);
            let before = board.clone();
            let mut allocator = NodeAllocator::new(Some(*limit));

            let result = SearchTree::build(&mut board, 3, &mut allocator);
            assert_eq!(
                result.map(|_| ()),
                Err(SearchError::AllocationFailure { allocated: *limit })
            );
            assert_eq!(allocator.stats().live(), 0);
            assert_eq!(allocator.stats().constructed, *limit);
            assert_eq!(board, before);
        }
        Ok(())
    }

    #[test]
    fn zero_limit_fails_before_the_root() {
        let mut board = Board::new();
        let mut allocator = NodeAllocator::new(Some(0));
        let result = SearchTree::build(&mut board, 1, &mut allocator);
        assert_eq!(
            result.map(|_| ()),
            Err(SearchError::AllocationFailure { allocated: 0 })
        );
        assert_eq!(allocator.stats(), NodeStats::default());
    }

    #[test]
    fn limit_at_tree_size_succeeds() -> Result<()> {
        let mut board = Board::new();
        let mut allocator = NodeAllocator::new(Some(1 + WIDTH + WIDTH * WIDTH));
        let tree = SearchTree::build(&mut board, 2, &mut allocator)?;
        assert_eq!(tree.root().count_nodes(), 57);
        tree.teardown(&mut allocator);
        assert_eq!(allocator.stats().live(), 0);
        Ok(())
    }
}
