//! Adapter module - remote players via TCP socket with JSON protocol
//!
//! This crate lets a remote peer take one side of a game. The peer's moves are
//! delivered to the engine through a [`MoveChannel`], consumed by a
//! [`NetworkPlayer`] on its own worker thread.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Game start**: Server creates a game and sends `game_start`
//! 4. **Play**: Client sends `move` on its turn; server forwards the local side's moves
//! 5. **End**: Server sends `game_end` and closes the connection
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and protocol version
//! - **move**: A move in board notation (`"from":"a1","to":"b2"`)
//! - **resign**: Give up the game
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello
//! - **game_start**: Board size, holes, and whether the client moves first
//! - **move**: The local side's move
//! - **game_end**: Result and final piece counts
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `ATAXX_HOST`: Bind address (default: "127.0.0.1")
//! - `ATAXX_PORT`: Port number (default: 7878)
//! - `ATAXX_FIRST`: `local`, `remote` or `alternate` (default: `local`)
//! - `ATAXX_NET_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//! - Board settings as in [`GameConfig`](ataxx_engine::GameConfig)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"my-bot","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","server":{"name":"ataxx","version":"0.1.0"}}
//! Server -> Client: {"type":"game_start","seq":2,"ts":1234567890,"game_id":"g1","size":9,"holes":["e5"],"you_start":false,"opponent":"ataxx"}
//! Server -> Client: {"type":"move","seq":3,"ts":1234567891,"game_id":"g1","from":"a1","to":"b2"}
//! Client -> Server: {"type":"move","seq":2,"ts":1234567892,"game_id":"g1","from":"a9","to":"b8"}
//! ```

pub mod channel;
pub mod protocol;
pub mod remote;
pub mod runtime;
pub mod server;

pub use ataxx_core as core;
pub use ataxx_engine as engine;
pub use ataxx_types as types;

pub use channel::MoveChannel;
pub use protocol::*;
pub use remote::{NetworkPlayer, PeerEvent};
pub use runtime::Adapter;
pub use server::{run_server, FirstMove, RemoteGame, ServerConfig};
