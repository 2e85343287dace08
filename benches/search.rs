//! Benchmarks for the search strategies.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use npuzzle::shuffle::random_walk;
use npuzzle::{is_solvable, Algorithm, Board, SearchConfig};

/// A fixed 8-puzzle instance twenty random moves from the goal.
fn eight_puzzle() -> (Board, Board) {
    let goal = Board::solved(3).unwrap();
    let initial = random_walk(&goal, 20, &mut StdRng::seed_from_u64(1));
    (initial, goal)
}

/// Benchmark each optimal strategy on the same 8-puzzle.
fn bench_strategies(c: &mut Criterion) {
    let (initial, goal) = eight_puzzle();
    let mut group = c.benchmark_group("eight_puzzle");
    group.sample_size(10);
    for algorithm in [Algorithm::Bfs, Algorithm::Iddfs, Algorithm::Bidirectional] {
        let strategy = algorithm.strategy(SearchConfig::default());
        group.bench_function(algorithm.to_string(), |b| {
            b.iter(|| strategy.search(black_box(&initial), black_box(&goal)))
        });
    }
    group.finish();
}

/// Benchmark bidirectional search on a shallow 15-puzzle.
fn bench_fifteen_bidirectional(c: &mut Criterion) {
    let goal = Board::solved(4).unwrap();
    let initial = random_walk(&goal, 16, &mut StdRng::seed_from_u64(2));
    let strategy = Algorithm::Bidirectional.strategy(SearchConfig::default());

    c.bench_function("fifteen_bidirectional", |b| {
        b.iter(|| strategy.search(black_box(&initial), black_box(&goal)))
    });
}

/// Benchmark the parity check on a 15-puzzle.
fn bench_is_solvable(c: &mut Criterion) {
    let goal = Board::solved(4).unwrap();
    let initial = random_walk(&goal, 60, &mut StdRng::seed_from_u64(3));

    c.bench_function("is_solvable", |b| {
        b.iter(|| is_solvable(black_box(&initial), black_box(&goal)))
    });
}

/// Benchmark computing the visited-set key of a board.
fn bench_board_key(c: &mut Criterion) {
    let board = Board::solved(4).unwrap();

    c.bench_function("board_key", |b| b.iter(|| black_box(&board).key()));
}

criterion_group!(
    benches,
    bench_strategies,
    bench_fifteen_bidirectional,
    bench_is_solvable,
    bench_board_key
);
criterion_main!(benches);
