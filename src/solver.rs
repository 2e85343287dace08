//! Uninformed search strategies over sliding-tile boards.
//!
//! Every strategy owns its node arena and visited set for the duration of a
//! single call, so concurrent searches with different goals never share
//! state. Visited sets are keyed by [`BoardKey`] (board value, not identity).
//!
//! - Breadth-first: FIFO frontier, shortest path.
//! - Depth-first: LIFO frontier, any path. Useful only for comparison.
//! - Iterative deepening: depth-limited passes with growing limits,
//!   shortest path at a fraction of breadth-first's memory.
//! - Bidirectional: two breadth-first frontiers meeting in the middle.

use std::collections::VecDeque;

use log::{debug, trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::{NodeArena, NodeId, Path, Step};
use crate::board::{Board, BoardKey};
use crate::moves::Move;

/// Default deepest limit tried by iterative deepening.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Bounds applied to a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest limit iterative deepening tries (inclusive).
    pub max_depth: usize,
    /// Cap on expanded nodes for any strategy; `None` means unbounded.
    pub max_nodes: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: None,
        }
    }
}

impl SearchConfig {
    /// Returns true once `stats` has used up the node budget.
    fn out_of_budget(&self, stats: &SearchStats) -> bool {
        match self.max_nodes {
            Some(limit) if stats.expanded >= limit => {
                warn!("node budget of {limit} exhausted");
                true
            }
            _ => false,
        }
    }
}

/// Work counters for one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub expanded: usize,
    /// Successor boards produced, duplicates included.
    pub generated: usize,
}

/// Terminal state of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Path),
    /// Frontier, depth bound, or node budget exhausted without reaching the goal.
    NotFound,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Outcome of a search together with the work it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// A search strategy from an initial board to a goal board.
///
/// Callers are expected to have checked solvability first. Without that
/// check breadth-first and depth-first searches enumerate the entire parity
/// class before giving up.
pub trait SearchStrategy: Send + Sync {
    /// Short lowercase name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Runs the search to completion on the calling thread.
    fn search(&self, initial: &Board, goal: &Board) -> SearchReport;
}

/// Logs and wraps the result of a finished run.
fn finish(name: &str, outcome: SearchOutcome, stats: SearchStats) -> SearchReport {
    match outcome.path() {
        Some(path) => debug!(
            "{name}: found {} moves after expanding {} nodes ({} generated)",
            path.move_count(),
            stats.expanded,
            stats.generated
        ),
        None => debug!(
            "{name}: no path after expanding {} nodes ({} generated)",
            stats.expanded, stats.generated
        ),
    }
    SearchReport { outcome, stats }
}

/// Breadth-first search.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst {
    pub config: SearchConfig,
}

impl SearchStrategy for BreadthFirst {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn search(&self, initial: &Board, goal: &Board) -> SearchReport {
        debug!("bfs: searching {n}x{n} board", n = initial.n());
        let mut stats = SearchStats::default();
        let mut arena = NodeArena::new();
        let root = arena.root(initial.clone());

        let goal_key = goal.key();
        let root_key = initial.key();
        if root_key == goal_key {
            return finish(self.name(), SearchOutcome::Found(arena.path_to(root)), stats);
        }

        // states are marked when enqueued so nothing is queued twice
        let mut visited: FxHashSet<BoardKey> = FxHashSet::default();
        visited.insert(root_key);
        let mut frontier = VecDeque::from([root]);

        while let Some(id) = frontier.pop_front() {
            if self.config.out_of_budget(&stats) {
                break;
            }
            stats.expanded += 1;

            for mv in Move::ALL {
                let Some(board) = arena.board(id).try_apply(mv) else {
                    continue;
                };
                stats.generated += 1;
                let key = board.key();
                if key == goal_key {
                    let found = arena.child(id, mv, board);
                    return finish(self.name(), SearchOutcome::Found(arena.path_to(found)), stats);
                }
                if visited.insert(key) {
                    frontier.push_back(arena.child(id, mv, board));
                }
            }
        }

        finish(self.name(), SearchOutcome::NotFound, stats)
    }
}

/// Depth-first search.
///
/// Neither optimal nor practical beyond small boards; kept for comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirst {
    pub config: SearchConfig,
}

impl SearchStrategy for DepthFirst {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn search(&self, initial: &Board, goal: &Board) -> SearchReport {
        debug!("dfs: searching {n}x{n} board", n = initial.n());
        let mut stats = SearchStats::default();
        let mut arena = NodeArena::new();
        let root = arena.root(initial.clone());

        let goal_key = goal.key();
        let root_key = initial.key();
        if root_key == goal_key {
            return finish(self.name(), SearchOutcome::Found(arena.path_to(root)), stats);
        }

        let mut visited: FxHashSet<BoardKey> = FxHashSet::default();
        visited.insert(root_key);
        let mut frontier = vec![root];

        while let Some(id) = frontier.pop() {
            if self.config.out_of_budget(&stats) {
                break;
            }
            stats.expanded += 1;

            let first_child = frontier.len();
            for mv in Move::ALL {
                let Some(board) = arena.board(id).try_apply(mv) else {
                    continue;
                };
                stats.generated += 1;
                let key = board.key();
                if key == goal_key {
                    let found = arena.child(id, mv, board);
                    return finish(self.name(), SearchOutcome::Found(arena.path_to(found)), stats);
                }
                if visited.insert(key) {
                    frontier.push(arena.child(id, mv, board));
                }
            }

            // reverse the new children so the first declared move is popped first
            frontier[first_child..].reverse();
        }

        finish(self.name(), SearchOutcome::NotFound, stats)
    }
}

/// One level of the explicit depth-limited search stack.
struct Frame {
    board: Board,
    via: Option<Move>,
    /// Index into [`Move::ALL`] of the next move to try.
    next_move: usize,
}

/// Result of a single depth-limited pass.
enum Pass {
    Found(Path),
    /// Some node was left unexpanded because of the depth limit.
    CutOff,
    /// The whole reachable component fit under the limit.
    Exhausted,
    OutOfBudget,
}

/// Iterative-deepening depth-first search.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterativeDeepening {
    pub config: SearchConfig,
}

impl IterativeDeepening {
    /// Depth-limited search from `initial`, reporting the first goal seen.
    ///
    /// The memo records the most remaining depth each board was expanded
    /// with during this pass. A board is expanded again only when reached
    /// with strictly more depth to spare, so no board within the limit is
    /// missed and no shorter path is hidden behind a longer first visit.
    fn depth_limited(
        &self,
        initial: &Board,
        goal_key: &BoardKey,
        limit: usize,
        stats: &mut SearchStats,
    ) -> Pass {
        let root = Frame {
            board: initial.clone(),
            via: None,
            next_move: 0,
        };
        if initial.key() == *goal_key {
            return Pass::Found(Path::from_steps(vec![Step {
                mv: None,
                board: root.board,
            }]));
        }
        if limit == 0 {
            return Pass::CutOff;
        }

        let mut best_remaining: FxHashMap<BoardKey, usize> = FxHashMap::default();
        best_remaining.insert(initial.key(), limit);
        let mut cut_off = false;
        let mut stack = vec![root];
        if self.config.out_of_budget(stats) {
            return Pass::OutOfBudget;
        }
        stats.expanded += 1;

        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };

            let mut next = None;
            while frame.next_move < Move::ALL.len() {
                let mv = Move::ALL[frame.next_move];
                frame.next_move += 1;
                if let Some(board) = frame.board.try_apply(mv) {
                    next = Some((mv, board));
                    break;
                }
            }
            let Some((mv, board)) = next else {
                stack.pop();
                continue;
            };
            stats.generated += 1;

            let key = board.key();
            if key == *goal_key {
                stack.push(Frame {
                    board,
                    via: Some(mv),
                    next_move: 0,
                });
                let steps = stack
                    .into_iter()
                    .map(|frame| Step {
                        mv: frame.via,
                        board: frame.board,
                    })
                    .collect();
                return Pass::Found(Path::from_steps(steps));
            }

            let remaining = limit - depth;
            if best_remaining
                .get(&key)
                .is_some_and(|&seen| seen >= remaining)
            {
                continue;
            }
            if remaining == 0 {
                cut_off = true;
                continue;
            }
            if self.config.out_of_budget(stats) {
                return Pass::OutOfBudget;
            }
            best_remaining.insert(key, remaining);
            stats.expanded += 1;
            stack.push(Frame {
                board,
                via: Some(mv),
                next_move: 0,
            });
        }

        if cut_off {
            Pass::CutOff
        } else {
            Pass::Exhausted
        }
    }
}

impl SearchStrategy for IterativeDeepening {
    fn name(&self) -> &'static str {
        "iddfs"
    }

    fn search(&self, initial: &Board, goal: &Board) -> SearchReport {
        debug!(
            "iddfs: searching {n}x{n} board up to depth {max}",
            n = initial.n(),
            max = self.config.max_depth
        );
        let mut stats = SearchStats::default();
        let goal_key = goal.key();

        for limit in 0..=self.config.max_depth {
            trace!("iddfs: pass with depth limit {limit}");
            match self.depth_limited(initial, &goal_key, limit, &mut stats) {
                Pass::Found(path) => {
                    return finish(self.name(), SearchOutcome::Found(path), stats);
                }
                Pass::CutOff => {}
                Pass::Exhausted | Pass::OutOfBudget => break,
            }
        }

        finish(self.name(), SearchOutcome::NotFound, stats)
    }
}

/// One side of a bidirectional search.
struct Frontier {
    arena: NodeArena,
    queue: VecDeque<NodeId>,
    seen: FxHashMap<BoardKey, NodeId>,
}

/// Result of expanding one full layer of a frontier.
enum Layer {
    /// `ours` (just created on this side) holds the same board as `theirs`.
    Met { ours: NodeId, theirs: NodeId },
    Open,
    OutOfBudget,
}

impl Frontier {
    fn new(start: &Board) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.root(start.clone());
        let mut seen = FxHashMap::default();
        seen.insert(start.key(), root);
        Self {
            arena,
            queue: VecDeque::from([root]),
            seen,
        }
    }

    /// Expands every node currently queued, checking each successor against
    /// the opposite side's visited boards.
    fn expand_layer(
        &mut self,
        other: &Frontier,
        config: &SearchConfig,
        stats: &mut SearchStats,
    ) -> Layer {
        for _ in 0..self.queue.len() {
            let Some(id) = self.queue.pop_front() else {
                break;
            };
            if config.out_of_budget(stats) {
                return Layer::OutOfBudget;
            }
            stats.expanded += 1;

            for mv in Move::ALL {
                let Some(board) = self.arena.board(id).try_apply(mv) else {
                    continue;
                };
                stats.generated += 1;
                let key = board.key();
                if let Some(&theirs) = other.seen.get(&key) {
                    let ours = self.arena.child(id, mv, board);
                    return Layer::Met { ours, theirs };
                }
                if self.seen.contains_key(&key) {
                    continue;
                }
                let child = self.arena.child(id, mv, board);
                self.seen.insert(key, child);
                self.queue.push_back(child);
            }
        }
        Layer::Open
    }
}

/// Bidirectional breadth-first search.
///
/// Alternates one full layer forward from the initial board with one full
/// layer backward from the goal until the two visited sets share a board.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bidirectional {
    pub config: SearchConfig,
}

impl SearchStrategy for Bidirectional {
    fn name(&self) -> &'static str {
        "bidirectional"
    }

    fn search(&self, initial: &Board, goal: &Board) -> SearchReport {
        debug!("bidirectional: searching {n}x{n} board", n = initial.n());
        let mut stats = SearchStats::default();
        if initial.key() == goal.key() {
            let path = Path::from_steps(vec![Step {
                mv: None,
                board: initial.clone(),
            }]);
            return finish(self.name(), SearchOutcome::Found(path), stats);
        }

        let mut forward = Frontier::new(initial);
        let mut backward = Frontier::new(goal);

        let mut round = 0usize;
        while !forward.queue.is_empty() && !backward.queue.is_empty() {
            round += 1;
            trace!(
                "bidirectional: round {round}, frontiers {} forward / {} backward",
                forward.queue.len(),
                backward.queue.len()
            );

            match forward.expand_layer(&backward, &self.config, &mut stats) {
                Layer::Met { ours, theirs } => {
                    let path = backward
                        .arena
                        .extend_toward_root(forward.arena.path_to(ours), theirs);
                    return finish(self.name(), SearchOutcome::Found(path), stats);
                }
                Layer::OutOfBudget => break,
                Layer::Open => {}
            }

            match backward.expand_layer(&forward, &self.config, &mut stats) {
                Layer::Met { ours, theirs } => {
                    let path = backward
                        .arena
                        .extend_toward_root(forward.arena.path_to(theirs), ours);
                    return finish(self.name(), SearchOutcome::Found(path), stats);
                }
                Layer::OutOfBudget => break,
                Layer::Open => {}
            }
        }

        finish(self.name(), SearchOutcome::NotFound, stats)
    }
}
