//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental value types used throughout the workspace.
//! Everything here is plain data with no I/O, usable from the rules engine, the
//! terminal view and the network protocol alike.
//!
//! # Coordinates
//!
//! Positions are board-relative with `(0, 0)` in the top-left corner. `x` grows to
//! the right, `y` grows downwards. The same type doubles as a displacement vector,
//! so `to - from` of a move is itself a [`Position`].
//!
//! # Notation
//!
//! Cells are written in chess-like notation: a column letter followed by a row
//! digit, `"a1"` being `(0, 0)` and `"i9"` being `(8, 8)` on the standard board.
//!
//! # Move Shapes
//!
//! | Shape | Displacement | Effect |
//! |-------|--------------|--------|
//! | Clone | Chebyshev distance 1 | A new piece appears, the source stays |
//! | Jump | (±2, 0), (0, ±2), (±2, ±2) | The piece relocates, the source empties |
//!
//! # Examples
//!
//! ```
//! use ataxx_types::{Move, MoveKind, Position};
//!
//! let from: Position = "a1".parse().unwrap();
//! assert_eq!(from, Position::new(0, 0));
//!
//! let mv: Move = "a1-c3".parse().unwrap();
//! assert_eq!(mv.kind(), MoveKind::Jump);
//! assert!((mv.to - mv.from).is_move_vector());
//! assert_eq!(mv.to_string(), "a1-c3");
//! ```

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Standard board edge length (9x9).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Smallest playable board edge length.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest board edge length addressable by column letters `a..=z`.
pub const MAX_BOARD_SIZE: usize = 26;

/// Advisory think-time budget per move (10s). Exceeding it only produces a warning.
pub const MAX_THINKING_TIME_MS: u64 = 10_000;

/// Minimum pacing between two displayed moves.
pub const MOVE_DELAY_MS: u64 = 800;

/// A board coordinate or a displacement between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// True iff this displacement is a legal move shape.
    ///
    /// Even components are halved first, so a jump classifies like the unit step
    /// in the same direction. `(2, 1)` mixes parities and is rejected.
    ///
    /// ```
    /// use ataxx_types::Position;
    ///
    /// assert!(Position::new(2, 0).is_move_vector());
    /// assert!(Position::new(1, 1).is_move_vector());
    /// assert!(Position::new(2, 2).is_move_vector());
    /// assert!(!Position::new(2, 1).is_move_vector());
    /// assert!(!Position::new(0, 0).is_move_vector());
    /// ```
    pub fn is_move_vector(self) -> bool {
        let mut x = (self.x as i32).abs();
        let mut y = (self.y as i32).abs();
        if x % 2 == 0 && y % 2 == 0 {
            x /= 2;
            y /= 2;
        }
        (x == 1 && y <= 1) || (x <= 1 && y == 1)
    }

    /// Chebyshev (king-move) distance from the origin.
    pub fn chebyshev(self) -> u8 {
        (self.x as i16).unsigned_abs().max((self.y as i16).unsigned_abs()) as u8
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = (b'a' as i16 + self.x as i16) as u8 as char;
        write!(f, "{}{}", column, self.y as i16 + 1)
    }
}

/// Error returned when a cell name is not a column letter followed by a row number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell notation {input:?}: expected a column letter and a row number, e.g. \"e5\"")]
pub struct ParsePositionError {
    pub input: String,
}

impl FromStr for Position {
    type Err = ParsePositionError;

    /// Column `a..=z`, then row `1..=26` without leading zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError {
            input: s.to_string(),
        };
        let (&column, row) = s.as_bytes().split_first().ok_or_else(err)?;
        if !column.is_ascii_lowercase()
            || row.is_empty()
            || row.len() > 2
            || row[0] == b'0'
            || !row.iter().all(u8::is_ascii_digit)
        {
            return Err(err());
        }
        let row = row.iter().fold(0usize, |n, d| n * 10 + (d - b'0') as usize);
        if row > MAX_BOARD_SIZE {
            return Err(err());
        }
        Ok(Position::new((column - b'a') as i8, (row - 1) as i8))
    }
}

/// Offsets to the eight neighbouring cells. Used for capture scans.
pub const DIRECTIONS: [Position; 8] = [
    Position::new(-1, -1),
    Position::new(-1, 0),
    Position::new(-1, 1),
    Position::new(0, -1),
    Position::new(0, 1),
    Position::new(1, -1),
    Position::new(1, 0),
    Position::new(1, 1),
];

/// Every displacement in `-2..=2` squared that passes [`Position::is_move_vector`].
pub const MOVE_VECTORS: [Position; 16] = [
    Position::new(-2, -2),
    Position::new(-2, 0),
    Position::new(-2, 2),
    Position::new(-1, -1),
    Position::new(-1, 0),
    Position::new(-1, 1),
    Position::new(0, -2),
    Position::new(0, -1),
    Position::new(0, 1),
    Position::new(0, 2),
    Position::new(1, -1),
    Position::new(1, 0),
    Position::new(1, 1),
    Position::new(2, -2),
    Position::new(2, 0),
    Position::new(2, 2),
];

/// Clone or jump, decided by the move's displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Adjacent step; the source piece stays and a copy lands on the target.
    Clone,
    /// Two-cell leap; the source cell is emptied.
    Jump,
}

/// A move by the board's current player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Displacement from source to target.
    pub fn vector(&self) -> Position {
        self.to - self.from
    }

    pub fn kind(&self) -> MoveKind {
        let v = self.vector();
        if v.x.unsigned_abs() == 2 || v.y.unsigned_abs() == 2 {
            MoveKind::Jump
        } else {
            MoveKind::Clone
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Error returned when move text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseMoveError {
    #[error("invalid move {0:?}: expected two cells such as \"a1-b2\"")]
    Shape(String),
    #[error(transparent)]
    Cell(#[from] ParsePositionError),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Accepts `a1b2`, `a1-b2` and `a1 b2`; rows may have two digits (`l12-k11`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        let shape = || ParseMoveError::Shape(s.to_string());
        if !compact.is_ascii() {
            return Err(shape());
        }
        // The target cell starts at the second letter.
        let split = compact
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(i, _)| i)
            .ok_or_else(shape)?;
        let from = compact[..split].parse()?;
        let to = compact[split..].parse()?;
        Ok(Move::new(from, to))
    }
}

/// Player identity token. `Black` moves first on a freshly built board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Black, Side::White];

    pub fn other(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Stable index, 0 for `Black` and 1 for `White`.
    pub fn index(self) -> usize {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Black => "black",
            Side::White => "white",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Occupancy of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Permanently unplayable.
    Hole,
    Piece(Side),
}

impl Cell {
    pub fn owner(self) -> Option<Side> {
        match self {
            Cell::Piece(side) => Some(side),
            Cell::Empty | Cell::Hole => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}
