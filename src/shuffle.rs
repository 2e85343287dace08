//! Random solvable instances for benchmarking.
//!
//! Instances are produced by walking the blank away from a goal, so they are
//! always in the goal's parity class.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Board;
use crate::moves::Move;

/// Default number of random moves applied to the goal.
pub const DEFAULT_SHUFFLES: usize = 30;

/// Applies `moves` random legal blank moves to `goal`.
///
/// The walk never immediately undoes its previous move, though it may still
/// wander back over earlier boards, so the optimal distance is at most `moves`.
pub fn random_walk<R: Rng + ?Sized>(goal: &Board, moves: usize, rng: &mut R) -> Board {
    let mut board = goal.clone();
    let mut last: Option<Move> = None;

    for _ in 0..moves {
        let candidates: Vec<Move> = board
            .legal_moves()
            .filter(|&mv| last.map_or(true, |prev| mv != prev.inverse()))
            .collect();
        // every cell of a grid with n >= 2 has at least two neighbors
        let Some(&mv) = candidates.choose(rng) else {
            break;
        };
        board = board.apply_move(mv);
        last = Some(mv);
    }

    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvability::is_solvable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_moves_returns_goal() {
        let goal = Board::solved(4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_walk(&goal, 0, &mut rng), goal);
    }

    #[test]
    fn test_walks_stay_solvable() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 2..=5 {
            let goal = Board::solved(n).unwrap();
            for moves in [1, 5, 30, 101] {
                let initial = random_walk(&goal, moves, &mut rng);
                assert!(
                    is_solvable(&initial, &goal),
                    "{n}x{n} walk of {moves} moves left the parity class"
                );
            }
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let goal = Board::solved(4).unwrap();
        let first = random_walk(&goal, 50, &mut StdRng::seed_from_u64(3));
        let second = random_walk(&goal, 50, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_move_changes_board() {
        let goal = Board::solved(3).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let moved = random_walk(&goal, 1, &mut rng);
        assert_ne!(moved, goal);
        assert!(goal.successors().any(|(_, board)| board == moved));
    }
}
