//! Move synchronization channel
//!
//! Bridges moves arriving on the network task to the worker thread of a
//! [`NetworkPlayer`](crate::remote::NetworkPlayer). The queue is unbounded and
//! FIFO. Closing it drops the sender half, so a consumer blocked in
//! [`MoveChannel::take_blocking`] wakes up once the queued moves are drained.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use tokio::sync::mpsc;

use crate::types::Move;

struct Inner {
    tx: Mutex<Option<mpsc::UnboundedSender<Move>>>,
    rx: Mutex<mpsc::UnboundedReceiver<Move>>,
}

/// Clonable handle; every clone refers to the same queue.
#[derive(Clone)]
pub struct MoveChannel {
    inner: Arc<Inner>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MoveChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(Inner {
                tx: Mutex::new(Some(tx)),
                rx: Mutex::new(rx),
            }),
        }
    }

    /// Append a move. Never blocks.
    ///
    /// Returns `false` if the channel is already closed; the move is discarded.
    pub fn push(&self, mv: Move) -> bool {
        match lock(&self.inner.tx).as_ref() {
            Some(tx) => tx.send(mv).is_ok(),
            None => false,
        }
    }

    /// Block until a move is available. `None` once closed and drained.
    ///
    /// Must not be called from inside an async runtime.
    pub fn take_blocking(&self) -> Option<Move> {
        lock(&self.inner.rx).blocking_recv()
    }

    /// Non-blocking variant of [`MoveChannel::take_blocking`].
    ///
    /// Returns `None` while another consumer is parked in `take_blocking`.
    pub fn try_take(&self) -> Option<Move> {
        let mut rx = match self.inner.rx.try_lock() {
            Ok(rx) => rx,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        rx.try_recv().ok()
    }

    /// Mark the channel closed. Idempotent.
    pub fn close(&self) {
        lock(&self.inner.tx).take();
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner.tx).is_none()
    }
}

impl Default for MoveChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveChannel")
            .field("closed", &self.is_closed())
            .finish()
    }
}
