//! Board representation and blank-move operations.
//!
//! A board is a flat row-major array of `n * n` tile labels where 0 is the
//! blank. Cell `i` lives at row `i / n`, column `i % n`. Boards are immutable:
//! applying a move produces a new board.

use std::fmt;

use crate::error::{PuzzleError, MAX_DIM};
use crate::moves::Move;

/// Largest cell count that packs into a `u64` key at 4 bits per tile.
const PACKED_CELLS: usize = 16;

/// A validated sliding-tile configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: Box<[u8]>,
    n: usize,
    /// Linear index of the blank.
    gap: usize,
}

/// Value-based hash key for visited sets.
///
/// Boards up to 4x4 pack into a single integer; larger ones fall back to
/// the raw tile bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoardKey {
    Packed(u64),
    Tiles(Box<[u8]>),
}

impl Board {
    /// Builds a board from row-major tiles, checking that they form a
    /// permutation of `0..n*n`.
    pub fn new(tiles: Vec<u8>, n: usize) -> Result<Self, PuzzleError> {
        if !(2..=MAX_DIM).contains(&n) {
            return Err(PuzzleError::DimensionOutOfRange { n });
        }
        let cells = n * n;
        if tiles.len() != cells {
            return Err(PuzzleError::WrongLength {
                expected: cells,
                actual: tiles.len(),
            });
        }

        let mut seen = vec![false; cells];
        for &tile in &tiles {
            let slot = seen
                .get_mut(tile as usize)
                .ok_or(PuzzleError::TileOutOfRange {
                    tile,
                    max: cells - 1,
                })?;
            if *slot {
                return Err(PuzzleError::DuplicateTile { tile });
            }
            *slot = true;
        }

        // a full permutation always contains exactly one blank
        let gap = tiles.iter().position(|&tile| tile == 0).unwrap_or_default();

        Ok(Self {
            tiles: tiles.into_boxed_slice(),
            n,
            gap,
        })
    }

    /// The conventional goal: tiles `1..n*n` in order with the blank last.
    pub fn solved(n: usize) -> Result<Self, PuzzleError> {
        if !(2..=MAX_DIM).contains(&n) {
            return Err(PuzzleError::DimensionOutOfRange { n });
        }
        let cells = n * n;
        let tiles = (1..cells).map(|tile| tile as u8).chain([0]).collect();
        Self::new(tiles, n)
    }

    /// Grid dimension.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Row-major tile labels.
    #[inline]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Linear index of the blank.
    #[inline]
    pub fn gap(&self) -> usize {
        self.gap
    }

    /// Row of the blank, counted from 0 at the top.
    #[inline]
    pub fn blank_row(&self) -> usize {
        self.gap / self.n
    }

    /// Iterates the rows of the grid top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.tiles.chunks(self.n)
    }

    /// Moves the blank can take from here, in declaration order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        Move::ALL
            .into_iter()
            .filter(move |mv| mv.is_legal(self.gap, self.n))
    }

    /// Applies `mv`, or returns `None` if it would push the blank off the grid.
    pub fn try_apply(&self, mv: Move) -> Option<Self> {
        let target = mv.target(self.gap, self.n)?;
        let mut tiles = self.tiles.clone();
        tiles.swap(self.gap, target);
        Some(Self {
            tiles,
            n: self.n,
            gap: target,
        })
    }

    /// Applies a move already known to be legal.
    ///
    /// # Panics
    ///
    /// Panics if `mv` is not in [`Board::legal_moves`]; callers must only pass
    /// moves taken from there.
    pub fn apply_move(&self, mv: Move) -> Self {
        match self.try_apply(mv) {
            Some(board) => board,
            None => panic!(
                "illegal move {mv} for blank at index {} on a {}x{} board",
                self.gap, self.n, self.n
            ),
        }
    }

    /// Boards one move away, paired with the move that reaches them.
    pub fn successors(&self) -> impl Iterator<Item = (Move, Board)> + '_ {
        self.legal_moves().map(move |mv| (mv, self.apply_move(mv)))
    }

    /// Canonical hashable encoding of this board.
    pub fn key(&self) -> BoardKey {
        if self.tiles.len() <= PACKED_CELLS {
            let packed = self
                .tiles
                .iter()
                .fold(0u64, |acc, &tile| (acc << 4) | u64::from(tile));
            BoardKey::Packed(packed)
        } else {
            BoardKey::Tiles(self.tiles.clone())
        }
    }
}

impl fmt::Display for Board {
    /// Renders the grid one row per line, with the blank shown as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for row in self.rows() {
            for (col, &tile) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                if tile == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{:>width$}", tile)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
