//! Sliding-tile Puzzle Solver Library
//!
//! Solves the N-puzzle on an `n`x`n` grid with uninformed search: breadth-first,
//! depth-first, iterative deepening and bidirectional breadth-first. A parity
//! check rules out unreachable goals before any search starts.

pub mod arena;
pub mod board;
pub mod error;
pub mod harness;
pub mod moves;
pub mod shuffle;
pub mod solvability;
pub mod solver;

use std::fmt;

pub use arena::{Path, Step};
pub use board::Board;
pub use error::{HarnessError, PuzzleError};
pub use moves::Move;
pub use solvability::is_solvable;
pub use solver::{SearchConfig, SearchOutcome, SearchReport, SearchStats, SearchStrategy};

use solver::{Bidirectional, BreadthFirst, DepthFirst, IterativeDeepening};

/// Selects one of the interchangeable search strategies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Iddfs,
    Bidirectional,
}

impl Algorithm {
    /// Every algorithm, in reporting order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Iddfs,
        Algorithm::Bidirectional,
    ];

    /// Builds the strategy object for this algorithm.
    pub fn strategy(self, config: SearchConfig) -> Box<dyn SearchStrategy> {
        match self {
            Algorithm::Bfs => Box::new(BreadthFirst { config }),
            Algorithm::Dfs => Box::new(DepthFirst { config }),
            Algorithm::Iddfs => Box::new(IterativeDeepening { config }),
            Algorithm::Bidirectional => Box::new(Bidirectional { config }),
        }
    }

    /// Whether the algorithm always returns a shortest path.
    pub fn is_optimal(self) -> bool {
        !matches!(self, Algorithm::Dfs)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Iddfs => "iddfs",
            Algorithm::Bidirectional => "bidirectional",
        };
        f.write_str(name)
    }
}

/// Result of [`solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solve {
    /// The parity check ruled the goal out; no search was run.
    Unreachable,
    Searched(SearchReport),
}

fn check_dimensions(initial: &Board, goal: &Board) -> Result<(), PuzzleError> {
    if initial.n() != goal.n() {
        return Err(PuzzleError::DimensionMismatch {
            initial: initial.n(),
            goal: goal.n(),
        });
    }
    Ok(())
}

/// Runs `algorithm` with the default configuration.
///
/// This does not check solvability; see [`solve`] for the gated entry point.
pub fn search(
    algorithm: Algorithm,
    initial: &Board,
    goal: &Board,
) -> Result<SearchOutcome, PuzzleError> {
    check_dimensions(initial, goal)?;
    Ok(algorithm
        .strategy(SearchConfig::default())
        .search(initial, goal)
        .outcome)
}

/// Checks solvability and, if the goal is reachable, runs `algorithm`.
pub fn solve(
    algorithm: Algorithm,
    initial: &Board,
    goal: &Board,
    config: SearchConfig,
) -> Result<Solve, PuzzleError> {
    check_dimensions(initial, goal)?;
    if !is_solvable(initial, goal) {
        log::debug!("goal is in the other parity class; skipping search");
        return Ok(Solve::Unreachable);
    }
    Ok(Solve::Searched(algorithm.strategy(config).search(initial, goal)))
}
