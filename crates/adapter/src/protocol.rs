//! Protocol module - JSON message types for remote players
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sequence number)
//! and `ts` (timestamp in ms). Cells are written in board notation (`"e5"`).

use serde::{Deserialize, Serialize};

use crate::engine::GameOver;
use crate::types::{Move, ParseMoveError, Position, Side};

/// Protocol version spoken by this server. Clients must share the major version.
pub const PROTOCOL_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    pub name: String,
    pub version: String,
}

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Hello {
        seq: u64,
        ts: u64,
        client: PeerInfo,
        protocol_version: String,
    },
    Move {
        seq: u64,
        ts: u64,
        game_id: String,
        from: String,
        to: String,
    },
    Resign {
        seq: u64,
        ts: u64,
        game_id: String,
    },
}

impl ClientMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ClientMessage::Hello { seq, .. }
            | ClientMessage::Move { seq, .. }
            | ClientMessage::Resign { seq, .. } => *seq,
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    InvalidMessage,
    InvalidMove,
    UnknownGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Victory,
    Draw,
    Resignation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        seq: u64,
        ts: u64,
        protocol_version: String,
        server: PeerInfo,
    },
    GameStart {
        seq: u64,
        ts: u64,
        game_id: String,
        size: usize,
        holes: Vec<String>,
        /// The client plays black and moves first.
        you_start: bool,
        opponent: String,
    },
    Move {
        seq: u64,
        ts: u64,
        game_id: String,
        from: String,
        to: String,
    },
    GameEnd {
        seq: u64,
        ts: u64,
        game_id: String,
        result: ResultKind,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        winner: Option<String>,
        black: usize,
        white: usize,
    },
    Error {
        seq: u64,
        ts: u64,
        code: ErrorCode,
        message: String,
    },
}

/// Parse one inbound line.
pub fn parse_message(json: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(json)
}

/// `seq` of a line that failed to parse, so the error reply can reference it.
pub fn extract_seq_best_effort(json: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .and_then(|v| v.get("seq")?.as_u64())
        .unwrap_or(0)
}

/// Decode a `from`/`to` pair.
pub fn decode_move(from: &str, to: &str) -> Result<Move, ParseMoveError> {
    let from: Position = from.parse()?;
    let to: Position = to.parse()?;
    Ok(Move::new(from, to))
}

// ============== Utility Functions ==============

pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> ClientMessage {
    ClientMessage::Hello {
        seq,
        ts: current_timestamp_ms(),
        client: PeerInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

pub fn create_client_move(seq: u64, game_id: &str, mv: Move) -> ClientMessage {
    ClientMessage::Move {
        seq,
        ts: current_timestamp_ms(),
        game_id: game_id.to_string(),
        from: mv.from.to_string(),
        to: mv.to.to_string(),
    }
}

pub fn create_resign(seq: u64, game_id: &str) -> ClientMessage {
    ClientMessage::Resign {
        seq,
        ts: current_timestamp_ms(),
        game_id: game_id.to_string(),
    }
}

pub fn create_welcome(seq: u64, protocol_version: &str) -> ServerMessage {
    ServerMessage::Welcome {
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        server: PeerInfo {
            name: "ataxx".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    }
}

pub fn create_game_start(
    seq: u64,
    game_id: &str,
    size: usize,
    holes: impl IntoIterator<Item = Position>,
    you_start: bool,
    opponent: &str,
) -> ServerMessage {
    ServerMessage::GameStart {
        seq,
        ts: current_timestamp_ms(),
        game_id: game_id.to_string(),
        size,
        holes: holes.into_iter().map(|p| p.to_string()).collect(),
        you_start,
        opponent: opponent.to_string(),
    }
}

pub fn create_move(seq: u64, game_id: &str, mv: Move) -> ServerMessage {
    ServerMessage::Move {
        seq,
        ts: current_timestamp_ms(),
        game_id: game_id.to_string(),
        from: mv.from.to_string(),
        to: mv.to.to_string(),
    }
}

pub fn create_game_end(seq: u64, game_id: &str, result: &GameOver) -> ServerMessage {
    let kind = match result {
        GameOver::Victory { .. } => ResultKind::Victory,
        GameOver::Draw { .. } => ResultKind::Draw,
        GameOver::Resignation { .. } => ResultKind::Resignation,
    };
    let score = result.score();
    ServerMessage::GameEnd {
        seq,
        ts: current_timestamp_ms(),
        game_id: game_id.to_string(),
        result: kind,
        winner: result.winner().map(|s: Side| s.name().to_string()),
        black: score.black,
        white: score.white,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ServerMessage {
    ServerMessage::Error {
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
