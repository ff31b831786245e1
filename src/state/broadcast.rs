//! Snapshot fan-out.
//!
//! Transport-agnostic publish/subscribe registry. The store pushes every
//! committed state through here; the transport layer (WebSocket, SSE,
//! whatever) adapts a receiver to its own protocol. Every push is a
//! complete state replacement; no diffs, no replay.

use tokio::sync::broadcast;
use tracing::trace;

use crate::state::game::GameState;

/// Snapshots buffered per subscriber before a slow one starts lagging.
pub const BROADCAST_CAPACITY: usize = 64;

/// Fans committed snapshots out to all current subscribers.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<GameState>,
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver a snapshot to every current subscriber. Returns how many
    /// were reached; publishing with nobody connected is a no-op.
    pub fn publish(&self, state: GameState) -> usize {
        match self.tx.send(state) {
            Ok(reached) => {
                trace!(subscribers = reached, "snapshot published");
                reached
            }
            Err(_) => 0,
        }
    }

    /// A new receiver observing all subsequent publishes, in order.
    pub fn subscribe(&self) -> broadcast::Receiver<GameState> {
        self.tx.subscribe()
    }

    /// Current subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
