use crate::core::{IllegalReason, MoveError};
use crate::types::{Move, Side};

/// Errors surfaced by the turn orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A player answered with a move the board refuses. Fatal for the game.
    #[error("{side} player {player:?} supplied an illegal move: {source}")]
    InvalidMove {
        side: Side,
        player: String,
        mv: Move,
        source: MoveError,
    },

    /// Interactive input that is not a legal move. The game carries on.
    #[error("move {mv} rejected: {reason}")]
    Rejected { mv: Move, reason: IllegalReason },

    #[error("the game is not waiting for interactive input")]
    NotAwaitingInput,

    /// `run` was asked to drive a game whose current player is interactive.
    #[error("{0} is played interactively and cannot be driven headlessly")]
    InputRequired(Side),

    #[error("the game was aborted by an earlier invalid move")]
    Faulted,
}
