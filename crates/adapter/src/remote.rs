//! Network-bridged player.
//!
//! Moves typed by the remote peer arrive through a [`MoveChannel`]. Each request
//! is served by a short-lived worker thread that blocks on the channel, so the
//! thread driving the [`Game`](crate::engine::Game) never blocks on the network.

use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::channel::MoveChannel;
use crate::core::IllegalReason;
use crate::engine::{GameOver, MoveReply, MoveRequest, Player};
use crate::types::Move;

/// What the game tells the connection serving a remote peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// The local side moved; forward it to the peer.
    OpponentMoved(Move),
    /// The peer sent a move the board refuses. The request stays open.
    Rejected { mv: Move, reason: IllegalReason },
    Finished(GameOver),
}

pub struct NetworkPlayer {
    name: String,
    game_id: String,
    channel: MoveChannel,
    events: mpsc::UnboundedSender<PeerEvent>,
}

impl NetworkPlayer {
    pub fn new(
        name: impl Into<String>,
        game_id: impl Into<String>,
        channel: MoveChannel,
        events: mpsc::UnboundedSender<PeerEvent>,
    ) -> Self {
        Self {
            name: name.into(),
            game_id: game_id.into(),
            channel,
            events,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn channel(&self) -> &MoveChannel {
        &self.channel
    }
}

impl Player for NetworkPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self, request: MoveRequest, reply: MoveReply) {
        let channel = self.channel.clone();
        let events = self.events.clone();
        let game_id = self.game_id.clone();

        let spawned = thread::Builder::new()
            .name(format!("ataxx-net-{}", self.game_id))
            .spawn(move || loop {
                let Some(mv) = channel.take_blocking() else {
                    debug!(%game_id, "move channel closed, resigning");
                    reply.resign();
                    return;
                };
                match request.board.check_move(mv.from, mv.to) {
                    None => {
                        reply.play(mv);
                        return;
                    }
                    Some(reason) => {
                        warn!(%game_id, %mv, %reason, "peer sent an illegal move");
                        let _ = events.send(PeerEvent::Rejected { mv, reason });
                    }
                }
            });

        // On failure the reply is dropped with the closure, which the game
        // treats as a resignation.
        if let Err(e) = spawned {
            error!(game_id = %self.game_id, error = %e, "failed to spawn move worker");
        }
    }

    fn opponent_moved(&mut self, mv: Move) {
        let _ = self.events.send(PeerEvent::OpponentMoved(mv));
    }

    fn game_finished(&mut self, result: &GameOver) {
        let _ = self.events.send(PeerEvent::Finished(*result));
        self.channel.close();
    }
}
