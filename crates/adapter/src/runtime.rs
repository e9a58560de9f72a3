//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server.

use std::net::SocketAddr;
use std::sync::mpsc as std_mpsc;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::error;

use crate::server::{run_server, RemoteGame, ServerConfig};

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    addr: SocketAddr,
    games: std_mpsc::Receiver<RemoteGame>,
}

impl Adapter {
    /// Start the server on a background runtime and wait until it listens.
    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let (game_tx, games) = std_mpsc::channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, game_tx, Some(ready_tx)).await {
                error!(error = %format!("{e:#}"), "adapter server stopped");
            }
        });

        let addr = rt
            .block_on(ready_rx)
            .context("adapter server failed to start")?;

        Ok(Self {
            _rt: rt,
            addr,
            games,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the next remote peer has completed its handshake.
    pub fn next_game(&self) -> Option<RemoteGame> {
        self.games.recv().ok()
    }
}
