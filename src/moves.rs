//! Blank moves on a square grid.
//!
//! A move names the direction the blank travels. The tile sitting on the
//! blank's target cell slides the opposite way into the blank's old cell.

use std::fmt;

/// Direction the blank moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

impl Move {
    /// All moves in declaration order.
    ///
    /// Successor generation follows this order, which fixes the tie-break
    /// between equally good paths in every strategy.
    pub const ALL: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

    /// The move that undoes this one.
    pub const fn inverse(self) -> Self {
        match self {
            Move::Left => Move::Right,
            Move::Right => Move::Left,
            Move::Up => Move::Down,
            Move::Down => Move::Up,
        }
    }

    /// Returns whether the blank at linear index `gap` can take this move
    /// on an `n`x`n` grid.
    #[inline(always)]
    pub const fn is_legal(self, gap: usize, n: usize) -> bool {
        match self {
            Move::Left => gap % n > 0,
            Move::Right => gap % n < n - 1,
            Move::Up => gap / n > 0,
            Move::Down => gap / n < n - 1,
        }
    }

    /// Linear index the blank lands on, or `None` if it would leave the grid.
    #[inline(always)]
    pub const fn target(self, gap: usize, n: usize) -> Option<usize> {
        if !self.is_legal(gap, n) {
            return None;
        }
        Some(match self {
            Move::Left => gap - 1,
            Move::Right => gap + 1,
            Move::Up => gap - n,
            Move::Down => gap + n,
        })
    }

    /// Short label used by compact path listings.
    pub const fn letter(self) -> char {
        match self {
            Move::Left => 'L',
            Move::Right => 'R',
            Move::Up => 'U',
            Move::Down => 'D',
        }
    }

    /// Parses a label produced by [`Move::letter`].
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'L' => Some(Move::Left),
            'R' => Some(Move::Right),
            'U' => Some(Move::Up),
            'D' => Some(Move::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Move::Left => "Left",
            Move::Right => "Right",
            Move::Up => "Up",
            Move::Down => "Down",
        };
        f.write_str(label)
    }
}
