//! Search node storage and path reconstruction.
//!
//! Nodes live in a flat arena and refer to their parent by index, so a
//! child never borrows its parent and the whole tree is dropped at once
//! when the search run ends.

use std::fmt;

use crate::board::Board;
use crate::moves::Move;

/// Handle to a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A board together with how the search reached it.
#[derive(Debug)]
struct Node {
    board: Board,
    /// `None` only for roots.
    parent: Option<NodeId>,
    /// Move that turned the parent's board into this one.
    via: Option<Move>,
}

/// Owning store for the nodes of one search direction.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a parentless node.
    pub fn root(&mut self, board: Board) -> NodeId {
        self.insert(Node {
            board,
            parent: None,
            via: None,
        })
    }

    /// Adds a node reached from `parent` by `via`.
    pub fn child(&mut self, parent: NodeId, via: Move, board: Board) -> NodeId {
        self.insert(Node {
            board,
            parent: Some(parent),
            via: Some(via),
        })
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn board(&self, id: NodeId) -> &Board {
        &self.nodes[id.0].board
    }

    /// Walks from `id` back to the root and returns the root-to-`id` path.
    pub fn path_to(&self, id: NodeId) -> Path {
        let mut steps = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            steps.push(Step {
                mv: node.via,
                board: node.board.clone(),
            });
            current = node.parent;
        }
        steps.reverse();
        Path { steps }
    }

    /// Continues `path`, which must end on the board of `meeting` in this
    /// arena, along `meeting`'s ancestry back to this arena's root.
    ///
    /// The stored moves lead away from the root, so each one is inverted to
    /// describe travel toward it.
    pub fn extend_toward_root(&self, mut path: Path, meeting: NodeId) -> Path {
        let mut current = &self.nodes[meeting.0];
        while let (Some(parent_id), Some(via)) = (current.parent, current.via) {
            let parent = &self.nodes[parent_id.0];
            path.steps.push(Step {
                mv: Some(via.inverse()),
                board: parent.board.clone(),
            });
            current = parent;
        }
        path
    }
}

/// One entry of a solution: the move taken and the board it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// `None` for the starting board.
    pub mv: Option<Move>,
    pub board: Board,
}

/// Ordered sequence of boards from the initial board to the goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    /// Path built from explicit steps, starting with the root board.
    pub(crate) fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Rebuilds the path that plays `moves` from `start`, or `None` if one
    /// of them is illegal where it is played.
    pub fn replay(start: &Board, moves: &[Move]) -> Option<Self> {
        let mut current = start.clone();
        let mut steps = vec![Step {
            mv: None,
            board: current.clone(),
        }];
        for &mv in moves {
            current = current.try_apply(mv)?;
            steps.push(Step {
                mv: Some(mv),
                board: current.clone(),
            });
        }
        Some(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of moves, one less than the number of boards.
    pub fn move_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The moves alone, in order.
    pub fn moves(&self) -> Vec<Move> {
        self.steps.iter().filter_map(|step| step.mv).collect()
    }

    /// Moves as a compact letter string, e.g. `"RDL"`.
    pub fn compact(&self) -> String {
        self.steps
            .iter()
            .filter_map(|step| step.mv.map(Move::letter))
            .collect()
    }

    pub fn start(&self) -> Option<&Board> {
        self.steps.first().map(|step| &step.board)
    }

    pub fn end(&self) -> Option<&Board> {
        self.steps.last().map(|step| &step.board)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            match step.mv {
                Some(mv) => writeln!(f, "Move {index}: {mv}")?,
                None => writeln!(f, "Start:")?,
            }
            write!(f, "{}", step.board)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_has_no_moves() {
        let mut arena = NodeArena::new();
        let root = arena.root(Board::solved(2).unwrap());
        let path = arena.path_to(root);
        assert_eq!(path.steps().len(), 1);
        assert_eq!(path.steps()[0].mv, None);
        assert_eq!(path.move_count(), 0);
    }

    #[test]
    fn test_path_is_root_first() {
        let start = Board::solved(3).unwrap();
        let mut arena = NodeArena::new();
        let root = arena.root(start.clone());
        let first = start.apply_move(Move::Left);
        let a = arena.child(root, Move::Left, first.clone());
        let second = first.apply_move(Move::Up);
        let b = arena.child(a, Move::Up, second.clone());

        let path = arena.path_to(b);
        assert_eq!(path.moves(), vec![Move::Left, Move::Up]);
        assert_eq!(path.compact(), "LU");
        assert_eq!(path.start(), Some(&start));
        assert_eq!(path.end(), Some(&second));
        assert_eq!(arena.board(a), &first);
    }

    #[test]
    fn test_ids_past_u16_range_resolve_to_their_node() {
        let start = Board::solved(3).unwrap();
        let other = start.apply_move(Move::Up);
        let mut arena = NodeArena::new();
        let mut parent = arena.root(start.clone());
        let mut ids = vec![parent];
        for index in 1..70_000 {
            let (via, board) = if index % 2 == 1 {
                (Move::Up, other.clone())
            } else {
                (Move::Down, start.clone())
            };
            parent = arena.child(parent, via, board);
            ids.push(parent);
        }

        assert_eq!(arena.len(), 70_000);
        assert_eq!(ids[69_999], NodeId(69_999));
        assert_eq!(arena.board(ids[69_999]), &other);
        assert_eq!(arena.board(ids[69_998]), &start);
        assert_eq!(arena.path_to(ids[69_999]).move_count(), 69_999);
    }

    #[test]
    fn test_replay_matches_reconstructed_path() {
        let start = Board::solved(3).unwrap();
        let mut arena = NodeArena::new();
        let root = arena.root(start.clone());
        let first = start.apply_move(Move::Up);
        let a = arena.child(root, Move::Up, first.clone());
        let b = arena.child(a, Move::Left, first.apply_move(Move::Left));

        let replayed = Path::replay(&start, &[Move::Up, Move::Left]).unwrap();
        assert_eq!(replayed, arena.path_to(b));
        assert_eq!(Path::replay(&start, &[]).unwrap(), arena.path_to(root));
        // the blank starts in the bottom-right corner
        assert_eq!(Path::replay(&start, &[Move::Down]), None);
    }

    #[test]
    fn test_extend_toward_root_inverts_moves() {
        let goal = Board::solved(3).unwrap();
        let mut backward = NodeArena::new();
        let root = backward.root(goal.clone());
        let away = goal.apply_move(Move::Up);
        let meeting = backward.child(root, Move::Up, away.clone());

        let mut forward = NodeArena::new();
        let start = forward.root(away);
        let path = backward.extend_toward_root(forward.path_to(start), meeting);

        assert_eq!(path.moves(), vec![Move::Down]);
        assert_eq!(path.end(), Some(&goal));
    }
}
