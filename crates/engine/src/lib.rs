//! Game engine module - turn arbitration between players
//!
//! The engine sits between the rules in `ataxx-core` and whatever produces moves:
//! bots, remote peers, or a human at the keyboard. It hands the side to move an
//! immutable board, waits for exactly one answer, applies it and repeats until
//! the game is over.
//!
//! # Module Structure
//!
//! - [`player`]: the [`Player`] capability, one-shot move replies, [`Bot`] and [`HumanPlayer`]
//! - [`game`]: the [`Game`] orchestrator and its results
//! - [`bot`]: [`RandomBot`], the reference decision function
//! - [`clock`]: advisory think-time accounting
//! - [`config`]: [`GameConfig`] from environment variables
//!
//! # Threading
//!
//! Players may answer on any thread. The orchestrator itself is single-threaded:
//! drive it from one place with [`Game::poll`] (never blocks) or [`Game::wait`]
//! (blocks until the side to move answers).

pub mod bot;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod player;

pub use ataxx_core as core;
pub use ataxx_types as types;

pub use bot::RandomBot;
pub use clock::{Overrun, ThinkClock};
pub use config::{parse_holes, ConfigError, GameConfig};
pub use error::EngineError;
pub use game::{Game, GameOver, GameReport, Ply, Progress};
pub use player::{
    reply_channel, Answer, Bot, Control, Decide, HumanPlayer, MoveReply, MoveRequest,
    PendingMove, Player,
};
