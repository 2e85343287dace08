//! Errors raised while validating puzzle input or running timed searches.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Largest grid dimension whose tile labels fit in a `u8`.
pub const MAX_DIM: usize = 16;

/// Rejected puzzle input.
///
/// Only malformed boards are errors. An unreachable goal or an exhausted
/// search is reported as a result value, not through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("grid dimension {n} is out of range (expected 2..={max})", max = MAX_DIM)]
    DimensionOutOfRange { n: usize },
    #[error("expected {expected} tiles, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("tile {tile} is out of range (largest allowed label is {max})")]
    TileOutOfRange { tile: u8, max: usize },
    #[error("tile {tile} appears more than once")]
    DuplicateTile { tile: u8 },
    #[error("initial board is {initial}x{initial} but goal board is {goal}x{goal}")]
    DimensionMismatch { initial: usize, goal: usize },
}

/// Failure to run a search in a worker process.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("failed to launch search worker: {0}")]
    Spawn(#[source] io::Error),
    #[error("worker I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed worker message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("worker sent an unusable result: {0}")]
    Protocol(String),
    #[error("search worker exited with {0}")]
    WorkerFailed(ExitStatus),
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}
