//! Reference bot - random legal moves
//!
//! Picks a random own piece and a random move vector, like a beginner throwing
//! darts at the board. After a bounded number of misses it falls back to a
//! uniform pick among all legal moves, so it never stalls.

use crate::core::{Board, SimpleRng};
use crate::player::{Bot, Decide};
use crate::types::{Move, Position, MOVE_VECTORS};

/// Darts thrown before falling back to full move enumeration.
const DEFAULT_ATTEMPTS: usize = 64;

#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: SimpleRng,
    attempts: usize,
}

impl RandomBot {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Wrap into a ready-to-play [`Bot`].
    pub fn into_player(self, name: impl Into<String>) -> Bot<RandomBot> {
        Bot::new(name, self)
    }
}

impl Decide for RandomBot {
    fn decide(&mut self, board: &Board) -> Option<Move> {
        let mine: Vec<Position> = board.pieces(board.current()).collect();
        if mine.is_empty() {
            return None;
        }

        for _ in 0..self.attempts {
            let piece = *self.rng.pick(&mine)?;
            let to = piece + *self.rng.pick(&MOVE_VECTORS)?;
            if board.is_move_legal(piece, to) {
                return Some(Move::new(piece, to));
            }
        }

        let legal = board.legal_moves();
        self.rng.pick(&legal).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn always_picks_a_legal_move() {
        let mut bot = RandomBot::new(12345);
        let mut board = Board::standard();
        for _ in 0..40 {
            if crate::core::end_reason(&board).is_some() {
                break;
            }
            let mv = bot.decide(&board).expect("a legal move exists");
            assert!(board.is_move_legal(mv.from, mv.to), "{mv} is illegal");
            board = board.play(mv).unwrap();
        }
    }

    #[test]
    fn falls_back_when_darts_miss() {
        // Zero attempts forces the enumeration path.
        let mut bot = RandomBot::new(1).with_attempts(0);
        let board = Board::standard();
        let mv = bot.decide(&board).unwrap();
        assert!(board.legal_moves().contains(&mv));
    }

    #[test]
    fn resigns_without_moves() {
        let mut bot = RandomBot::new(5);
        let board = Board::from_diagram("x##\n##.\n#.o", Side::Black).unwrap();
        assert_eq!(bot.decide(&board), None);
    }

    #[test]
    fn same_seed_same_choices() {
        let board = Board::standard();
        let a = RandomBot::new(99).decide(&board);
        let b = RandomBot::new(99).decide(&board);
        assert_eq!(a, b);
    }
}
