//! Static scoring of search leaves
//!
//! A non-terminal position is scored from a histogram of every length-`SPAN`
//! window on the board (rows, columns and both diagonals), bucketed by the
//! window's net disc count: +1 per player one disc, -1 per player two disc.
//! The fully-owned buckets are decisive positions and are scored as wins
//! instead, and the balanced bucket carries no information, so only the
//! remaining buckets are weighted.

use crate::board::{Board, Cell, GameState, Player, DIRECTIONS};
use crate::{HISTOGRAM_SIZE, SPAN};

/// Number of weighted histogram buckets (net sums `-SPAN+1..=-1` and `1..=SPAN-1`)
pub const NUM_WEIGHTS: usize = 2 * (SPAN - 1);

/// Weights of the net sums -3, -2, -1, +1, +2, +3, from player one's side
pub const DEFAULT_WEIGHTS: [i32; NUM_WEIGHTS] = [-5, -2, -1, 1, 2, 5];

/// The weight vector applied to the window histogram
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Weights([i32; NUM_WEIGHTS]);

impl Weights {
    pub const fn new(weights: [i32; NUM_WEIGHTS]) -> Self {
        Self(weights)
    }

    pub fn values(&self) -> &[i32; NUM_WEIGHTS] {
        &self.0
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self(DEFAULT_WEIGHTS)
    }
}

fn cell_value(cell: Cell) -> i32 {
    match cell {
        Cell::PlayerOne => 1,
        Cell::PlayerTwo => -1,
        Cell::Empty => 0,
    }
}

/// Counts every window on the board by its net disc sum, offset so that a
/// sum of `-SPAN` lands in bucket 0
pub fn histogram(board: &Board) -> [u32; HISTOGRAM_SIZE] {
    let mut histogram = [0; HISTOGRAM_SIZE];
    let span = SPAN as isize;

    for &(dx, dy) in DIRECTIONS.iter() {
        for column in 0..crate::WIDTH as isize {
            for row in 0..crate::HEIGHT as isize {
                if !Board::on_board(column + dx * (span - 1), row + dy * (span - 1)) {
                    continue;
                }
                let sum: i32 = (0..span)
                    .map(|m| {
                        let cell = board.cell((row + dy * m) as usize, (column + dx * m) as usize);
                        cell_value(cell)
                    })
                    .sum();
                histogram[(sum + SPAN as i32) as usize] += 1;
            }
        }
    }
    histogram
}

/// Combines a histogram into a score for `maximizer`
pub fn score_histogram(
    histogram: &[u32; HISTOGRAM_SIZE],
    maximizer: Player,
    weights: &Weights,
) -> i32 {
    // skip the -SPAN bucket, the balanced centre and the +SPAN bucket
    let buckets = histogram[1..SPAN]
        .iter()
        .chain(histogram[SPAN + 1..HISTOGRAM_SIZE - 1].iter());

    let score: i32 = buckets
        .zip(weights.values().iter())
        .map(|(&count, &weight)| count as i32 * weight)
        .sum();

    match maximizer {
        Player::One => score,
        Player::Two => -score,
    }
}

/// Scores a leaf position from the point of view of `maximizer`
///
/// Wins are scored as `i32::MAX` for the maximizer and `i32::MIN` for its
/// opponent, a draw as 0.
pub fn evaluate(board: &Board, maximizer: Player, weights: &Weights) -> i32 {
    match board.check_winner() {
        GameState::Draw => 0,
        GameState::Playing => score_histogram(&histogram(board), maximizer, weights),
        state => {
            if state.winner() == Some(maximizer) {
                i32::MAX
            } else {
                i32::MIN
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn empty_board_is_balanced() {
        let board = Board::new();
        let histogram = histogram(&board);
        // 24 horizontal, 21 vertical and 12 of each diagonal
        assert_eq!(histogram[SPAN], 69);
        assert_eq!(histogram.iter().sum::<u32>(), 69);
        assert_eq!(evaluate(&board, Player::One, &Weights::default()), 0);
    }

    #[test]
    fn single_disc_counts_every_window_through_it() -> Result<()> {
        let board = Board::from_moves("4")?;
        let histogram = histogram(&board);
        assert_eq!(histogram[SPAN + 1], 7);
        assert_eq!(histogram[SPAN], 62);
        assert_eq!(evaluate(&board, Player::One, &Weights::default()), 7);
        assert_eq!(evaluate(&board, Player::Two, &Weights::default()), -7);
        Ok(())
    }

    #[test]
    fn opposing_discs_share_windows() -> Result<()> {
        // player one at the bottom of column 4, player two on top of it
        let board = Board::from_moves("44")?;
        let histogram = histogram(&board);
        // the vertical window holding both discs nets to zero
        assert_eq!(histogram[SPAN + 1], 6);
        assert_eq!(histogram[SPAN - 1], 9);
        assert_eq!(histogram.iter().sum::<u32>(), 69);
        assert_eq!(evaluate(&board, Player::One, &Weights::default()), 6 - 9);
        Ok(())
    }

    #[test]
    fn custom_weights_are_applied() -> Result<()> {
        let board = Board::from_moves("4")?;
        let weights = Weights::new([0, 0, 0, 10, 0, 0]);
        assert_eq!(evaluate(&board, Player::One, &weights), 70);
        Ok(())
    }

    #[test]
    fn decisive_positions() -> Result<()> {
        let won = Board::from_moves("1122334")?;
        assert_eq!(evaluate(&won, Player::One, &Weights::default()), i32::MAX);
        assert_eq!(evaluate(&won, Player::Two, &Weights::default()), i32::MIN);
        Ok(())
    }
}
