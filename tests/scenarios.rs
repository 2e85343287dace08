//! End-to-end scenarios through the public entry points.

use rand::rngs::StdRng;
use rand::SeedableRng;

use npuzzle::shuffle::random_walk;
use npuzzle::{
    is_solvable, search, solve, Algorithm, Board, Move, PuzzleError, SearchConfig,
    SearchOutcome, Solve,
};

fn board(tiles: &[u8], n: usize) -> Board {
    Board::new(tiles.to_vec(), n).unwrap()
}

fn found_path(algorithm: Algorithm, initial: &Board, goal: &Board) -> npuzzle::Path {
    match search(algorithm, initial, goal).unwrap() {
        SearchOutcome::Found(path) => path,
        SearchOutcome::NotFound => panic!("{algorithm} found no path"),
    }
}

#[test]
fn test_already_at_goal_2x2() {
    let goal = board(&[1, 2, 3, 0], 2);
    assert!(is_solvable(&goal, &goal));
    for algorithm in Algorithm::ALL {
        let path = found_path(algorithm, &goal, &goal);
        assert_eq!(path.steps().len(), 1, "{algorithm}");
        assert_eq!(path.steps()[0].mv, None);
        assert_eq!(path.move_count(), 0);
    }
}

#[test]
fn test_eight_puzzle_one_move() {
    let initial = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8], 3);
    let goal = board(&[1, 2, 3, 4, 5, 6, 7, 8, 0], 3);
    assert!(is_solvable(&initial, &goal));

    let path = found_path(Algorithm::Bfs, &initial, &goal);
    assert_eq!(path.moves(), vec![Move::Right]);
    assert_eq!(path.end(), Some(&goal));
}

#[test]
fn test_fifteen_puzzle_two_random_moves() {
    let goal = Board::solved(4).unwrap();
    for seed in 0..5 {
        let initial = random_walk(&goal, 2, &mut StdRng::seed_from_u64(seed));
        for algorithm in [Algorithm::Bfs, Algorithm::Bidirectional, Algorithm::Iddfs] {
            let path = found_path(algorithm, &initial, &goal);
            assert!(path.move_count() <= 2, "{algorithm} took {}", path.move_count());
            assert_eq!(path.end(), Some(&goal));
        }
    }
}

#[test]
fn test_swapped_adjacent_tiles_are_unreachable() {
    let goal = Board::solved(4).unwrap();
    let mut tiles = goal.tiles().to_vec();
    tiles.swap(4, 5);
    let initial = Board::new(tiles, 4).unwrap();

    assert!(!is_solvable(&initial, &goal));
    let result = solve(Algorithm::Bfs, &initial, &goal, SearchConfig::default()).unwrap();
    assert_eq!(result, Solve::Unreachable);
}

#[test]
fn test_optimal_algorithms_agree_on_random_eight_puzzles() {
    let goal = Board::solved(3).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..8 {
        let initial = random_walk(&goal, 14, &mut rng);
        assert!(is_solvable(&initial, &goal));

        let bfs = found_path(Algorithm::Bfs, &initial, &goal).move_count();
        assert!(bfs <= 14);
        assert_eq!(found_path(Algorithm::Iddfs, &initial, &goal).move_count(), bfs);
        assert_eq!(
            found_path(Algorithm::Bidirectional, &initial, &goal).move_count(),
            bfs
        );
        assert!(found_path(Algorithm::Dfs, &initial, &goal).move_count() >= bfs);
    }
}

#[test]
fn test_paths_replay_to_goal_with_custom_goal() {
    // the goal need not be the conventional ordering
    let goal = board(&[0, 8, 7, 6, 5, 4, 3, 2, 1], 3);
    let initial = random_walk(&goal, 10, &mut StdRng::seed_from_u64(77));
    for algorithm in Algorithm::ALL {
        let path = found_path(algorithm, &initial, &goal);
        let mut current = initial.clone();
        for mv in path.moves() {
            current = current.apply_move(mv);
        }
        assert_eq!(current, goal, "{algorithm}");
    }
}

#[test]
fn test_dimension_mismatch_is_rejected() {
    let small = Board::solved(2).unwrap();
    let large = Board::solved(3).unwrap();
    assert_eq!(
        search(Algorithm::Bfs, &small, &large),
        Err(PuzzleError::DimensionMismatch {
            initial: 2,
            goal: 3
        })
    );
}

#[test]
fn test_solve_reports_stats() {
    let goal = Board::solved(3).unwrap();
    let initial = board(&[1, 2, 3, 4, 0, 6, 7, 5, 8], 3);
    let Solve::Searched(report) =
        solve(Algorithm::Iddfs, &initial, &goal, SearchConfig::default()).unwrap()
    else {
        panic!("instance is solvable");
    };
    assert_eq!(report.outcome.path().unwrap().compact(), "DR");
    assert!(report.stats.expanded > 0);
}

#[test]
fn test_board_renders_as_grid() {
    let initial = board(&[1, 2, 3, 4, 5, 6, 7, 0, 8], 3);
    insta::assert_snapshot!(initial.to_string(), @r"
    1 2 3
    4 5 6
    7 . 8
    ");
}

#[test]
fn test_path_renders_each_step() {
    let initial = board(&[1, 2, 3, 4, 5, 6, 0, 7, 8], 3);
    let goal = Board::solved(3).unwrap();
    let path = found_path(Algorithm::Bfs, &initial, &goal);
    insta::assert_snapshot!(path.to_string(), @r"
    Start:
    1 2 3
    4 5 6
    . 7 8

    Move 1: Right
    1 2 3
    4 5 6
    7 . 8

    Move 2: Right
    1 2 3
    4 5 6
    7 8 .
    ");
}
