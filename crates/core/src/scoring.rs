//! Scoring module - piece counts and end-of-game detection
//!
//! Points are simply owned cells. The board itself never decides that a game is
//! over; these helpers are what the orchestrator consults after every move.

use crate::board::Board;
use crate::types::Side;

/// Piece count of both sides at one point in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Score {
    pub black: usize,
    pub white: usize,
}

impl Score {
    pub fn of_board(board: &Board) -> Self {
        Self {
            black: board.points(Side::Black),
            white: board.points(Side::White),
        }
    }

    pub fn of(&self, side: Side) -> usize {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    /// Side with more pieces, `None` on a tie.
    pub fn leader(&self) -> Option<Side> {
        use std::cmp::Ordering;
        match self.black.cmp(&self.white) {
            Ordering::Greater => Some(Side::Black),
            Ordering::Less => Some(Side::White),
            Ordering::Equal => None,
        }
    }
}

/// Why a game ended without a resignation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// No empty cell left.
    BoardFilled,
    /// The given side has no pieces left.
    Eliminated(Side),
    /// The side to move has no legal move even though cells remain empty.
    Stalemate,
}

/// End condition reached on `board`, if any.
///
/// Filled boards and eliminations are checked first; stalemate can only occur
/// when holes wall both sides off.
pub fn end_reason(board: &Board) -> Option<EndReason> {
    for side in Side::ALL {
        if board.points(side) == 0 {
            return Some(EndReason::Eliminated(side));
        }
    }
    if board.is_filled() {
        return Some(EndReason::BoardFilled);
    }
    if !board.has_legal_moves() {
        return Some(EndReason::Stalemate);
    }
    None
}

/// True iff the board is filled or one side has been wiped out.
pub fn is_terminal(board: &Board) -> bool {
    matches!(
        end_reason(board),
        Some(EndReason::BoardFilled | EndReason::Eliminated(_))
    )
}
