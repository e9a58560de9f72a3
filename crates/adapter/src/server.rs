//! TCP server for remote players
//!
//! Each connection plays exactly one game against the local side. After the
//! handshake the server creates the game, announces it with `game_start` and
//! hands it to the synchronous side as a [`RemoteGame`]. From then on the
//! connection task forwards the peer's moves into the game's [`MoveChannel`]
//! and the game's [`PeerEvent`]s back onto the socket.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::mpsc as std_mpsc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::channel::MoveChannel;
use crate::core::Board;
use crate::engine::{Game, GameConfig, Player};
use crate::protocol::*;
use crate::remote::{NetworkPlayer, PeerEvent};
use crate::types::Side;

/// Which side the remote peer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstMove {
    /// The local side moves first; the peer plays white.
    Local,
    /// The peer moves first and plays black.
    Remote,
    /// Alternates between started games, starting with the peer.
    Alternate,
}

impl FirstMove {
    fn remote_side(self, game_number: u64) -> Side {
        match self {
            FirstMove::Local => Side::White,
            FirstMove::Remote => Side::Black,
            FirstMove::Alternate if game_number % 2 == 1 => Side::Black,
            FirstMove::Alternate => Side::White,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Some(FirstMove::Local),
            "remote" => Some(FirstMove::Remote),
            "alternate" => Some(FirstMove::Alternate),
            _ => None,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub first: FirstMove,
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            first: FirstMove::Local,
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("ATAXX_HOST").unwrap_or(defaults.host);
        let port = lookup("ATAXX_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let first = lookup("ATAXX_FIRST")
            .and_then(|s| FirstMove::parse(&s))
            .unwrap_or(defaults.first);
        let game = GameConfig::from_lookup(&lookup).context("invalid game configuration")?;

        Ok(Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            first,
            game,
        })
    }

    /// Check if networking is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("ATAXX_NET_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// A game created for a remote peer, ready to be played on the synchronous side.
pub struct RemoteGame {
    pub game_id: String,
    pub board: Board,
    pub remote_side: Side,
    pub player: NetworkPlayer,
}

impl RemoteGame {
    /// Seat `local` opposite the peer.
    pub fn into_game(self, local: Box<dyn Player>) -> Game {
        let remote: Box<dyn Player> = Box::new(self.player);
        let (black, white) = match self.remote_side {
            Side::Black => (remote, local),
            Side::White => (local, remote),
        };
        Game::new(self.board, black, white)
    }
}

impl std::fmt::Debug for RemoteGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteGame")
            .field("game_id", &self.game_id)
            .field("remote_side", &self.remote_side)
            .finish_non_exhaustive()
    }
}

struct GameEntry {
    client_id: u64,
    channel: MoveChannel,
}

/// Shared server state
struct ServerState {
    config: ServerConfig,
    /// Live games keyed by game id.
    games: RwLock<HashMap<String, GameEntry>>,
    /// Handshakes completed so far; connections that never say hello don't count.
    games_started: AtomicU64,
}

impl ServerState {
    /// Channel of `game_id`, if that game belongs to `client_id`.
    async fn channel_for(&self, client_id: u64, game_id: &str) -> Option<MoveChannel> {
        let games = self.games.read().await;
        games
            .get(game_id)
            .filter(|g| g.client_id == client_id)
            .map(|g| g.channel.clone())
    }
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    session_tx: std_mpsc::Sender<RemoteGame>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "listening for remote players");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState {
        config,
        games: RwLock::new(HashMap::new()),
        games_started: AtomicU64::new(0),
    });
    let mut client_id_counter = 0u64;

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let session_tx = session_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, &state, session_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            // Close any game still bound to this connection.
            let mut games = state.games.write().await;
            games.retain(|_, g| {
                if g.client_id == client_id {
                    g.channel.close();
                    false
                } else {
                    true
                }
            });
            info!(client_id, "client disconnected");
        });
    }
}

/// Per-connection state after the handshake.
struct Session {
    game_id: String,
    events: mpsc::UnboundedReceiver<PeerEvent>,
}

/// Handle a single client connection
#[instrument(level = "debug", skip(socket, state, session_tx))]
async fn handle_client(
    socket: TcpStream,
    client_id: u64,
    state: &ServerState,
    session_tx: std_mpsc::Sender<RemoteGame>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut lines = BufReader::new(reader).lines();

    // Channel to send messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(256);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &msg).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut out_seq = 0u64;
    let mut next_seq = || {
        out_seq += 1;
        out_seq
    };
    let mut session: Option<Session> = None;

    loop {
        let line = match session.as_mut() {
            None => lines.next_line().await?,
            Some(s) => tokio::select! {
                line = lines.next_line() => line?,
                event = s.events.recv() => {
                    match event {
                        Some(PeerEvent::OpponentMoved(mv)) => {
                            let _ = tx.send(create_move(next_seq(), &s.game_id, mv));
                        }
                        Some(PeerEvent::Rejected { mv, reason }) => {
                            let message = format!("{mv}: {reason}");
                            let _ = tx.send(create_error(next_seq(), ErrorCode::InvalidMove, &message));
                        }
                        Some(PeerEvent::Finished(result)) => {
                            let _ = tx.send(create_game_end(next_seq(), &s.game_id, &result));
                            break;
                        }
                        // Player dropped without finishing the game.
                        None => break,
                    }
                    continue;
                }
            },
        };

        let Some(line) = line else {
            // Client disconnected
            break;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let msg = match parse_message(trimmed) {
            Ok(msg) => msg,
            Err(e) => {
                let error = create_error(
                    extract_seq_best_effort(trimmed),
                    ErrorCode::InvalidMessage,
                    &e.to_string(),
                );
                let _ = tx.send(error);
                continue;
            }
        };
        debug!(client_id, ?msg, "received");

        match msg {
            ClientMessage::Hello {
                seq,
                client,
                protocol_version,
                ..
            } => {
                if session.is_some() {
                    let error =
                        create_error(seq, ErrorCode::InvalidMessage, "handshake already done");
                    let _ = tx.send(error);
                    continue;
                }

                // Validate protocol version
                if major(&protocol_version) != major(&state.config.protocol_version) {
                    let error = create_error(
                        seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", protocol_version),
                    );
                    let _ = tx.send(error);
                    break;
                }

                let _ = tx.send(create_welcome(next_seq(), &state.config.protocol_version));

                let board = state.config.game.build_board()?;
                let game_number = state.games_started.fetch_add(1, Ordering::Relaxed) + 1;
                let remote_side = state.config.first.remote_side(game_number);
                let game_id = format!("g{client_id}");
                let channel = MoveChannel::new();
                let (events_tx, events_rx) = mpsc::unbounded_channel();

                state.games.write().await.insert(
                    game_id.clone(),
                    GameEntry {
                        client_id,
                        channel: channel.clone(),
                    },
                );

                let _ = tx.send(create_game_start(
                    next_seq(),
                    &game_id,
                    board.size(),
                    board.holes(),
                    remote_side == Side::Black,
                    "ataxx",
                ));

                let game = RemoteGame {
                    game_id: game_id.clone(),
                    board,
                    remote_side,
                    player: NetworkPlayer::new(client.name, game_id.clone(), channel, events_tx),
                };
                if session_tx.send(game).is_err() {
                    anyhow::bail!("game host is gone");
                }
                info!(client_id, %game_id, game_number, %remote_side, "game started");

                session = Some(Session {
                    game_id,
                    events: events_rx,
                });
            }

            ClientMessage::Move {
                seq,
                game_id,
                from,
                to,
                ..
            } => {
                if session.is_none() {
                    let error =
                        create_error(seq, ErrorCode::HandshakeRequired, "Send hello before move");
                    let _ = tx.send(error);
                    continue;
                }
                let Some(channel) = state.channel_for(client_id, &game_id).await else {
                    let error = create_error(seq, ErrorCode::UnknownGame, &game_id);
                    let _ = tx.send(error);
                    continue;
                };
                match decode_move(&from, &to) {
                    Ok(mv) => {
                        if !channel.push(mv) {
                            let error = create_error(seq, ErrorCode::UnknownGame, &game_id);
                            let _ = tx.send(error);
                        }
                    }
                    Err(e) => {
                        let error = create_error(seq, ErrorCode::InvalidMove, &e.to_string());
                        let _ = tx.send(error);
                    }
                }
            }

            ClientMessage::Resign { seq, game_id, .. } => {
                if session.is_none() {
                    let error = create_error(
                        seq,
                        ErrorCode::HandshakeRequired,
                        "Send hello before resign",
                    );
                    let _ = tx.send(error);
                    continue;
                }
                match state.channel_for(client_id, &game_id).await {
                    // The game reports the result through PeerEvent::Finished.
                    Some(channel) => channel.close(),
                    None => {
                        let error = create_error(seq, ErrorCode::UnknownGame, &game_id);
                        let _ = tx.send(error);
                    }
                }
            }
        }
    }

    drop(tx);
    let _ = write_task.await;
    Ok(())
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
