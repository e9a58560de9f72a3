//! Player capability - how the orchestrator obtains moves
//!
//! Every request is answered through a one-shot [`MoveReply`]. Implementations
//! decide how and when to resolve it: a bot answers inline, a remote player
//! answers from a worker thread once the peer's move arrives, and an interactive
//! player is never asked at all (its moves are fed to the game directly).

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::oneshot;

use crate::core::Board;
use crate::game::GameOver;
use crate::types::Move;

/// Everything a player gets to see when asked for a move.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    /// Board with the asked player as `current()`.
    pub board: Arc<Board>,
    /// The opponent's move that handed over the turn.
    ///
    /// `None` on the first move and whenever the same player moves again after a
    /// forced pass.
    pub last_move: Option<Move>,
}

/// How a player produces moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Resolves [`Player::request_move`] by itself.
    Automatic,
    /// Moves arrive from outside via `Game::submit_move`.
    Interactive,
}

#[derive(Debug)]
struct Sent {
    choice: Option<Move>,
    at: Instant,
}

/// Resolution of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Move(Move),
    Resign,
    /// The reply handle was dropped without being used.
    Dropped,
}

/// Write half of a move request. Consumed on use, so it resolves at most once.
#[derive(Debug)]
pub struct MoveReply {
    tx: oneshot::Sender<Sent>,
}

impl MoveReply {
    /// Resolve with a move, or with `None` to resign.
    pub fn send(self, choice: Option<Move>) {
        // The game may already be gone; nothing to do then.
        let _ = self.tx.send(Sent {
            choice,
            at: Instant::now(),
        });
    }

    pub fn play(self, mv: Move) {
        self.send(Some(mv));
    }

    pub fn resign(self) {
        self.send(None);
    }
}

/// Read half of a move request, held by the orchestrator.
#[derive(Debug)]
pub struct PendingMove {
    rx: oneshot::Receiver<Sent>,
}

impl PendingMove {
    /// Non-blocking check. `None` while the player is still thinking.
    pub fn try_take(&mut self) -> Option<(Answer, Instant)> {
        match self.rx.try_recv() {
            Ok(sent) => Some(Self::answer(sent)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some((Answer::Dropped, Instant::now())),
        }
    }

    /// Block the calling thread until the player answers.
    ///
    /// Must not be called from inside an async runtime.
    pub fn wait(self) -> (Answer, Instant) {
        match self.rx.blocking_recv() {
            Ok(sent) => Self::answer(sent),
            Err(_) => (Answer::Dropped, Instant::now()),
        }
    }

    fn answer(sent: Sent) -> (Answer, Instant) {
        let answer = match sent.choice {
            Some(mv) => Answer::Move(mv),
            None => Answer::Resign,
        };
        (answer, sent.at)
    }
}

/// Create a connected reply/pending pair for one request.
pub fn reply_channel() -> (MoveReply, PendingMove) {
    let (tx, rx) = oneshot::channel();
    (MoveReply { tx }, PendingMove { rx })
}

/// A participant in a game.
pub trait Player: Send {
    fn name(&self) -> &str;

    fn control(&self) -> Control {
        Control::Automatic
    }

    /// Produce a move for `request.board.current()` by resolving `reply` exactly once.
    fn request_move(&mut self, request: MoveRequest, reply: MoveReply);

    /// Called on the waiting player after the other side's move was applied.
    fn opponent_moved(&mut self, _mv: Move) {}

    /// Called on both players once the game has ended.
    fn game_finished(&mut self, _result: &GameOver) {}
}

/// A pure decision function: board in, move out. `None` resigns.
pub trait Decide: Send {
    fn decide(&mut self, board: &Board) -> Option<Move>;
}

impl<F> Decide for F
where
    F: FnMut(&Board) -> Option<Move> + Send,
{
    fn decide(&mut self, board: &Board) -> Option<Move> {
        self(board)
    }
}

/// Synchronous player: runs its decision function on the caller's thread and
/// answers immediately.
pub struct Bot<D> {
    name: String,
    decide: D,
}

impl<D: Decide> Bot<D> {
    pub fn new(name: impl Into<String>, decide: D) -> Self {
        Self {
            name: name.into(),
            decide,
        }
    }
}

impl<D: Decide> Player for Bot<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self, request: MoveRequest, reply: MoveReply) {
        reply.send(self.decide.decide(&request.board));
    }
}

/// Human at the keyboard. Never asked for moves; input goes through the game.
pub struct HumanPlayer {
    name: String,
}

impl HumanPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for HumanPlayer {
    fn default() -> Self {
        Self::new("human")
    }
}

impl Player for HumanPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn control(&self) -> Control {
        Control::Interactive
    }

    fn request_move(&mut self, _request: MoveRequest, reply: MoveReply) {
        // Interactive players are fed through Game::submit_move. Reaching this means
        // the caller bypassed the game; resigning is the only answer that cannot stall.
        tracing::warn!(player = %self.name, "move requested from an interactive player");
        reply.resign();
    }
}
