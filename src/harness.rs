//! Timed search runs, algorithm comparison and benchmarking.
//!
//! Every timed search runs in its own worker process: the `npuzzle` binary
//! started with the hidden [`WORKER_SUBCOMMAND`]. The parent writes one JSON
//! [`WorkerRequest`] to the worker's stdin and reads one JSON
//! [`WorkerResponse`] back from its stdout. A worker that misses its deadline
//! is killed and reaped, which releases everything the search had allocated.
//! Such a run is reported as timed out, never as a partial path.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::Path;
use crate::board::Board;
use crate::error::HarnessError;
use crate::moves::Move;
use crate::shuffle::random_walk;
use crate::solver::{SearchConfig, SearchOutcome, SearchReport, SearchStats};
use crate::Algorithm;

/// Subcommand the binary answers with [`serve_worker`].
pub const WORKER_SUBCOMMAND: &str = "worker";

/// One search, as sent to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub algorithm: Algorithm,
    pub n: usize,
    pub initial: Vec<u8>,
    pub goal: Vec<u8>,
    pub max_depth: usize,
    pub max_nodes: Option<usize>,
}

impl WorkerRequest {
    pub fn new(algorithm: Algorithm, initial: &Board, goal: &Board, config: SearchConfig) -> Self {
        Self {
            algorithm,
            n: initial.n(),
            initial: initial.tiles().to_vec(),
            goal: goal.tiles().to_vec(),
            max_depth: config.max_depth,
            max_nodes: config.max_nodes,
        }
    }

    fn config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }
}

/// A finished search, as sent back by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResponse {
    /// Solution as move letters, `None` if nothing was found.
    pub moves: Option<String>,
    pub expanded: usize,
    pub generated: usize,
    pub elapsed_micros: u64,
}

impl WorkerResponse {
    fn new(report: &SearchReport, elapsed: Duration) -> Self {
        Self {
            moves: report.outcome.path().map(Path::compact),
            expanded: report.stats.expanded,
            generated: report.stats.generated,
            elapsed_micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_micros)
    }

    /// Rebuilds the report, replaying the solution from `initial`.
    pub fn into_report(self, initial: &Board) -> Result<SearchReport, HarnessError> {
        let outcome = match self.moves {
            None => SearchOutcome::NotFound,
            Some(letters) => {
                let moves = letters
                    .chars()
                    .map(|letter| {
                        Move::from_letter(letter).ok_or_else(|| {
                            HarnessError::Protocol(format!("unknown move letter {letter:?}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let path = Path::replay(initial, &moves).ok_or_else(|| {
                    HarnessError::Protocol(format!("{letters} is not playable from the initial board"))
                })?;
                SearchOutcome::Found(path)
            }
        };
        Ok(SearchReport {
            outcome,
            stats: SearchStats {
                expanded: self.expanded,
                generated: self.generated,
            },
        })
    }
}

/// Worker side: reads one request from `input`, searches, and writes the
/// response to `output`.
pub fn serve_worker<R: Read, W: Write>(input: R, mut output: W) -> Result<(), HarnessError> {
    let request: WorkerRequest = serde_json::from_reader(input)?;
    let initial = Board::new(request.initial.clone(), request.n)?;
    let goal = Board::new(request.goal.clone(), request.n)?;

    debug!("worker {} running {}", std::process::id(), request.algorithm);
    let started = Instant::now();
    let report = request
        .algorithm
        .strategy(request.config())
        .search(&initial, &goal);

    serde_json::to_writer(&mut output, &WorkerResponse::new(&report, started.elapsed()))?;
    output.flush()?;
    Ok(())
}

/// How a timed run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Finished(SearchReport),
    TimedOut,
}

/// One algorithm's run with its wall-clock time.
#[derive(Debug, Clone)]
pub struct TimedRun {
    pub algorithm: Algorithm,
    /// Search time reported by the worker, or the time until it was killed.
    pub elapsed: Duration,
    pub result: RunResult,
    /// Process id of the worker, already reaped when the run is returned.
    pub worker_pid: u32,
}

impl TimedRun {
    /// Move count of the solution, if one was found in time.
    pub fn moves(&self) -> Option<usize> {
        match &self.result {
            RunResult::Finished(report) => report.outcome.path().map(|path| path.move_count()),
            RunResult::TimedOut => None,
        }
    }
}

/// Launches search workers and enforces the wall-clock limit on them.
#[derive(Debug, Clone)]
pub struct Harness {
    program: PathBuf,
    config: SearchConfig,
    timeout: Option<Duration>,
}

impl Harness {
    /// Harness whose workers are started from `program`, which must answer
    /// [`WORKER_SUBCOMMAND`].
    pub fn new(program: impl Into<PathBuf>, config: SearchConfig, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            config,
            timeout,
        }
    }

    /// Harness that re-launches the running executable as its workers.
    pub fn current_exe(config: SearchConfig, timeout: Option<Duration>) -> Result<Self, HarnessError> {
        let program = std::env::current_exe().map_err(HarnessError::Spawn)?;
        Ok(Self::new(program, config, timeout))
    }

    fn deadline(&self) -> Option<Instant> {
        self.timeout.map(|timeout| Instant::now() + timeout)
    }

    /// Runs one algorithm, killing its worker once the timeout passes.
    pub fn run_timed(
        &self,
        algorithm: Algorithm,
        initial: &Board,
        goal: &Board,
    ) -> Result<TimedRun, HarnessError> {
        let deadline = self.deadline();
        self.spawn(algorithm, initial, goal)?.wait(deadline)
    }

    /// Runs every algorithm in parallel against the same instance.
    ///
    /// Results come back in [`Algorithm::ALL`] order. All runs share one deadline.
    pub fn compare(&self, initial: &Board, goal: &Board) -> Result<Vec<TimedRun>, HarnessError> {
        let deadline = self.deadline();
        let pending = Algorithm::ALL
            .into_iter()
            .map(|algorithm| self.spawn(algorithm, initial, goal))
            .collect::<Result<Vec<_>, _>>()?;

        pending.into_iter().map(|run| run.wait(deadline)).collect()
    }

    /// Compares all algorithms on `puzzles` random walks of `shuffles` moves
    /// away from `goal`.
    pub fn benchmark<R: Rng + ?Sized>(
        &self,
        goal: &Board,
        puzzles: usize,
        shuffles: usize,
        rng: &mut R,
    ) -> Result<BenchmarkSummary, HarnessError> {
        let mut algorithms: Vec<AlgorithmSummary> =
            Algorithm::ALL.into_iter().map(AlgorithmSummary::new).collect();

        for index in 0..puzzles {
            let initial = random_walk(goal, shuffles, rng);
            debug!("benchmark puzzle {}/{puzzles}: {:?}", index + 1, initial.tiles());
            for run in self.compare(&initial, goal)? {
                if let Some(summary) = algorithms
                    .iter_mut()
                    .find(|summary| summary.algorithm == run.algorithm)
                {
                    summary.record(&run);
                }
            }
        }

        Ok(BenchmarkSummary {
            puzzles,
            algorithms,
        })
    }

    fn spawn(&self, algorithm: Algorithm, initial: &Board, goal: &Board) -> Result<Pending, HarnessError> {
        let child = Command::new(&self.program)
            .arg(WORKER_SUBCOMMAND)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(HarnessError::Spawn)?;
        debug!("started {algorithm} worker {}", child.id());

        // the guard kills the worker if the request cannot be delivered
        let mut pending = Pending {
            algorithm,
            initial: initial.clone(),
            started: Instant::now(),
            receiver: None,
            child,
        };

        let mut stdin = pending
            .child
            .stdin
            .take()
            .ok_or_else(|| HarnessError::Protocol("worker stdin is not piped".to_string()))?;
        serde_json::to_writer(&mut stdin, &WorkerRequest::new(algorithm, initial, goal, self.config))?;
        drop(stdin);

        let stdout = pending
            .child
            .stdout
            .take()
            .ok_or_else(|| HarnessError::Protocol("worker stdout is not piped".to_string()))?;
        pending.receiver = Some(read_in_background(stdout));
        Ok(pending)
    }
}

/// Reads the worker's whole stdout on a helper thread. The thread ends once
/// the worker exits or is killed and the pipe closes.
fn read_in_background(mut stdout: ChildStdout) -> mpsc::Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut output = String::new();
        let result = stdout.read_to_string(&mut output).map(|_| output);
        // the receiver is gone if the run already timed out
        let _ = sender.send(result);
    });
    receiver
}

/// A search running in a worker process.
///
/// Dropping it kills and reaps the worker if it is still alive.
struct Pending {
    algorithm: Algorithm,
    initial: Board,
    started: Instant,
    receiver: Option<mpsc::Receiver<io::Result<String>>>,
    child: Child,
}

impl Pending {
    /// Waits for the result until `deadline`, or forever without one.
    fn wait(mut self, deadline: Option<Instant>) -> Result<TimedRun, HarnessError> {
        let received = match (&self.receiver, deadline) {
            (Some(receiver), Some(deadline)) => receiver
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .ok(),
            (Some(receiver), None) => receiver.recv().ok(),
            (None, _) => None,
        };

        let worker_pid = self.child.id();
        let Some(output) = received else {
            self.reap();
            info!(
                "{} worker {worker_pid} killed after {:?}",
                self.algorithm,
                self.started.elapsed()
            );
            return Ok(TimedRun {
                algorithm: self.algorithm,
                elapsed: self.started.elapsed(),
                result: RunResult::TimedOut,
                worker_pid,
            });
        };

        let output = output?;
        let status = self.child.wait()?;
        if !status.success() {
            return Err(HarnessError::WorkerFailed(status));
        }
        let response: WorkerResponse = serde_json::from_str(&output)?;
        let elapsed = response.elapsed();
        Ok(TimedRun {
            algorithm: self.algorithm,
            elapsed,
            result: RunResult::Finished(response.into_report(&self.initial)?),
            worker_pid,
        })
    }

    /// Kills the worker unless it already exited, then collects its status.
    fn reap(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(err) => warn!("could not poll worker {}: {err}", self.child.id()),
        }
        if let Err(err) = self.child.kill() {
            debug!("kill of worker {} failed: {err}", self.child.id());
        }
        if let Err(err) = self.child.wait() {
            warn!("could not reap worker {}: {err}", self.child.id());
        }
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.reap();
    }
}

/// Aggregated results of one algorithm across a benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSummary {
    pub algorithm: Algorithm,
    /// Times of runs that found a solution.
    pub times: Vec<Duration>,
    /// Move counts of runs that found a solution.
    pub moves: Vec<usize>,
    pub timed_out: usize,
}

impl AlgorithmSummary {
    fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            times: Vec::new(),
            moves: Vec::new(),
            timed_out: 0,
        }
    }

    pub fn found(&self) -> usize {
        self.moves.len()
    }

    pub fn average_time(&self) -> Option<Duration> {
        let count = u32::try_from(self.times.len()).ok().filter(|&count| count > 0)?;
        Some(self.times.iter().sum::<Duration>() / count)
    }

    pub fn average_moves(&self) -> Option<f64> {
        if self.moves.is_empty() {
            return None;
        }
        Some(self.moves.iter().sum::<usize>() as f64 / self.moves.len() as f64)
    }

    fn record(&mut self, run: &TimedRun) {
        match run.moves() {
            Some(moves) => {
                self.times.push(run.elapsed);
                self.moves.push(moves);
            }
            None if run.result == RunResult::TimedOut => self.timed_out += 1,
            None => {}
        }
    }
}

/// Summary of a benchmark over random instances.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    pub puzzles: usize,
    pub algorithms: Vec<AlgorithmSummary>,
}
