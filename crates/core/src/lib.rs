//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of the game and nothing else. It has **zero
//! dependencies** on threads, networking, or I/O, making it:
//!
//! - **Deterministic**: the same board and move always yield the same result
//! - **Shareable**: boards are immutable and can be read from any thread
//! - **Testable**: every rule is exercised by unit tests
//!
//! # Module Structure
//!
//! - [`board`]: immutable N x N board with holes, move legality, captures and forced passes
//! - [`scoring`]: piece counts and end-of-game detection
//! - [`rng`]: small seeded generator for reproducible bots
//!
//! # Game Rules
//!
//! - **Clone**: move to an adjacent cell (8 directions); the source piece stays
//! - **Jump**: move exactly two cells in a straight or diagonal line; the source empties
//! - **Capture**: every opposing piece adjacent to the landing cell flips to the mover
//! - **Forced pass**: if the opponent cannot move afterwards, the mover moves again
//! - **End**: the board is full or one side has no pieces; more pieces wins
//!
//! # Example
//!
//! ```
//! use ataxx_core::Board;
//! use ataxx_types::{Position, Side};
//!
//! let board = Board::new(9, []).unwrap();
//! let next = board
//!     .move_piece(Position::new(0, 0), Position::new(0, 1))
//!     .unwrap();
//!
//! // Clone step: both cells are Black, the turn passes.
//! assert_eq!(next.points(Side::Black), 3);
//! assert_eq!(next.current(), Side::White);
//!
//! // The starting board is untouched.
//! assert_eq!(board.points(Side::Black), 2);
//! ```

pub mod board;
pub mod rng;
pub mod scoring;

pub use ataxx_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError, IllegalReason, MoveError};
pub use rng::SimpleRng;
pub use scoring::{end_reason, is_terminal, EndReason, Score};
