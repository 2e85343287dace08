//! Parity test deciding reachability without searching.
//!
//! Sliding moves split the permutations of a grid into two classes. For odd
//! `n` the class is the parity of the inversion count. For even `n` a vertical
//! move shifts the blank one row and flips inversion parity at the same time,
//! so the invariant is the parity of inversions plus the blank's row.

use crate::board::Board;

/// Counts pairs of non-blank tiles that appear in descending order.
pub fn count_inversions(tiles: &[u8]) -> usize {
    let labels: Vec<u8> = tiles.iter().copied().filter(|&tile| tile != 0).collect();

    labels
        .iter()
        .enumerate()
        .map(|(i, &tile)| labels[i + 1..].iter().filter(|&&later| later < tile).count())
        .sum()
}

/// Parity class of a board under sliding moves.
fn parity(board: &Board) -> usize {
    let inversions = count_inversions(board.tiles());
    if board.n() % 2 == 1 {
        inversions % 2
    } else {
        (inversions + board.blank_row()) % 2
    }
}

/// Returns whether `goal` can be reached from `initial` by sliding moves.
///
/// Boards of different sizes are never mutually reachable.
pub fn is_solvable(initial: &Board, goal: &Board) -> bool {
    initial.n() == goal.n() && parity(initial) == parity(goal)
}
