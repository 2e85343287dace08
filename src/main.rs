//! Sliding-tile Puzzle Solver
//!
//! Command-line front end: solves a single instance with one algorithm,
//! compares all algorithms on one instance, or benchmarks them on random
//! solvable instances.

use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use npuzzle::harness::{self, BenchmarkSummary, Harness, RunResult, TimedRun};
use npuzzle::shuffle::DEFAULT_SHUFFLES;
use npuzzle::solver::DEFAULT_MAX_DEPTH;
use npuzzle::{is_solvable, Algorithm, Board, SearchConfig, SearchOutcome};

/// Solves the N-puzzle with uninformed search.
#[derive(Parser)]
#[command(name = "npuzzle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one instance with a single algorithm.
    Solve {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        #[arg(long, value_enum, default_value_t = Algorithm::Bfs)]
        algorithm: Algorithm,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Run every algorithm on one instance and print a comparison table.
    Compare {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Compare every algorithm on random solvable instances.
    Benchmark {
        /// Number of random instances.
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Random moves applied to the goal for each instance.
        #[arg(long, default_value_t = DEFAULT_SHUFFLES)]
        shuffles: usize,
        /// Seed for reproducible instances.
        #[arg(long)]
        seed: Option<u64>,
        /// Grid dimension.
        #[arg(long, short = 'n', default_value_t = 4)]
        size: usize,
        /// Goal tiles, row-major, 0 for the blank (default: 1..n*n-1 then 0).
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        goal: Option<Vec<u8>>,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Answer one search request on stdin; started by the other commands.
    #[command(hide = true)]
    Worker,
}

#[derive(Args)]
struct PuzzleArgs {
    /// Grid dimension.
    #[arg(long, short = 'n', default_value_t = 4)]
    size: usize,
    /// Initial tiles, row-major, 0 for the blank.
    #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
    initial: Vec<u8>,
    /// Goal tiles, row-major, 0 for the blank (default: 1..n*n-1 then 0).
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    goal: Option<Vec<u8>>,
}

#[derive(Args)]
struct LimitArgs {
    /// Deepest limit tried by iterative deepening.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Stop any search after expanding this many nodes.
    #[arg(long)]
    max_nodes: Option<usize>,
    /// Kill a search after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl LimitArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn harness(&self) -> anyhow::Result<Harness> {
        Harness::current_exe(self.config(), self.timeout()).context("cannot locate the search worker")
    }
}

fn parse_goal(goal: Option<Vec<u8>>, size: usize) -> anyhow::Result<Board> {
    match goal {
        Some(tiles) => Board::new(tiles, size).context("invalid goal board"),
        None => Board::solved(size).context("invalid grid size"),
    }
}

impl PuzzleArgs {
    fn boards(self) -> anyhow::Result<(Board, Board)> {
        let initial = Board::new(self.initial, self.size).context("invalid initial board")?;
        let goal = parse_goal(self.goal, self.size)?;
        Ok((initial, goal))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            puzzle,
            algorithm,
            limits,
        } => {
            let (initial, goal) = puzzle.boards()?;
            run_solve(algorithm, &initial, &goal, &limits)?;
        }
        Command::Compare { puzzle, limits } => {
            let (initial, goal) = puzzle.boards()?;
            run_compare(&initial, &goal, &limits)?;
        }
        Command::Benchmark {
            count,
            shuffles,
            seed,
            size,
            goal,
            limits,
        } => {
            let goal = parse_goal(goal, size)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            info!("benchmarking {count} puzzles of {shuffles} random moves");
            let summary = limits
                .harness()?
                .benchmark(&goal, count, shuffles, &mut rng)
                .context("benchmark failed")?;
            print_benchmark_summary(&summary);
        }
        Command::Worker => {
            harness::serve_worker(io::stdin().lock(), io::stdout().lock())
                .context("search worker failed")?;
        }
    }

    Ok(())
}

/// Gates on solvability, then reports a single timed run.
fn run_solve(
    algorithm: Algorithm,
    initial: &Board,
    goal: &Board,
    limits: &LimitArgs,
) -> anyhow::Result<()> {
    if !is_solvable(initial, goal) {
        println!("This puzzle configuration is NOT SOLVABLE.");
        return Ok(());
    }
    println!("Puzzle is solvable. Solving with {algorithm}.");

    let run = limits
        .harness()?
        .run_timed(algorithm, initial, goal)
        .with_context(|| format!("{algorithm} run failed"))?;
    println!("Time taken: {:.6} seconds", run.elapsed.as_secs_f64());

    match run.result {
        RunResult::TimedOut => println!("Timed out; no solution reported."),
        RunResult::Finished(report) => {
            println!(
                "Expanded {} nodes ({} generated).",
                report.stats.expanded, report.stats.generated
            );
            match report.outcome {
                SearchOutcome::Found(path) => {
                    println!("\n--- Solution found in {} moves ---", path.move_count());
                    println!("{}", path.compact());
                    println!();
                    print!("{path}");
                    println!("\n--- Goal reached ---");
                }
                SearchOutcome::NotFound => println!("No solution was found."),
            }
        }
    }
    Ok(())
}

fn run_compare(initial: &Board, goal: &Board, limits: &LimitArgs) -> anyhow::Result<()> {
    if !is_solvable(initial, goal) {
        println!("This puzzle configuration is NOT SOLVABLE.");
        return Ok(());
    }
    println!("Comparing search algorithms. DFS is not optimal and may be very slow.");

    let runs = limits
        .harness()?
        .compare(initial, goal)
        .context("comparison failed")?;
    print_comparison(&runs);
    Ok(())
}

fn print_comparison(runs: &[TimedRun]) {
    let rule = "-".repeat(62);
    println!("{rule}");
    println!(
        "{:<14} | {:<12} | {:<8} | {:<10} | {:<6}",
        "Algorithm", "Time (s)", "Moves", "Expanded", "Found"
    );
    println!("{rule}");
    for run in runs {
        let (moves, expanded, found) = match &run.result {
            RunResult::Finished(report) => (
                run.moves()
                    .map_or_else(|| "N/A".to_string(), |moves| moves.to_string()),
                report.stats.expanded.to_string(),
                if report.outcome.is_found() { "Yes" } else { "No" },
            ),
            RunResult::TimedOut => ("N/A".to_string(), "N/A".to_string(), "Timeout"),
        };
        println!(
            "{:<14} | {:<12.6} | {:<8} | {:<10} | {:<6}",
            run.algorithm.to_string().to_uppercase(),
            run.elapsed.as_secs_f64(),
            moves,
            expanded,
            found
        );
    }
    println!("{rule}");
}

fn print_benchmark_summary(summary: &BenchmarkSummary) {
    let rule = "=".repeat(72);
    println!("{rule}");
    println!("Benchmark summary ({} puzzles)", summary.puzzles);
    println!("{rule}");
    println!(
        "{:<14} | {:<14} | {:<10} | {:<12} | {:<8}",
        "Algorithm", "Avg time (s)", "Avg moves", "Found (%)", "Timeouts"
    );
    println!("{}", "-".repeat(72));
    for algorithm in &summary.algorithms {
        let average_time = algorithm
            .average_time()
            .map_or(0.0, |time| time.as_secs_f64());
        let average_moves = algorithm.average_moves().unwrap_or(0.0);
        let found_percent = if summary.puzzles == 0 {
            0.0
        } else {
            algorithm.found() as f64 * 100.0 / summary.puzzles as f64
        };
        println!(
            "{:<14} | {:<14.6} | {:<10.2} | {:<12.1} | {:<8}",
            algorithm.algorithm.to_string().to_uppercase(),
            average_time,
            average_moves,
            found_percent,
            algorithm.timed_out
        );
    }
    println!("{}", "-".repeat(72));
}
