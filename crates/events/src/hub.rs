//! Per-lot publish/subscribe hub with per-client bounded channels.
//!
//! Each connected client gets its own bounded `mpsc` channel, so fan-out is
//! independent per client: a slow or unreachable client fills its own
//! backlog and gets evicted instead of stalling delivery to everyone else.
//! Events for one lot are delivered to a given subscriber in publish order
//! (the channel preserves ordering; publishers for a lot are serialized by
//! the store's per-lot write lock).

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, RwLock};

use spotwatch_core::types::{ClientId, LotId};

use crate::event::LotEvent;

/// Default per-client outbound buffer before the client counts as stuck.
pub const DEFAULT_CLIENT_BUFFER: usize = 64;

/// One connected client: its outbound channel and the lots it watches.
struct ClientHandle {
    sender: mpsc::Sender<LotEvent>,
    lots: HashSet<LotId>,
}

#[derive(Default)]
struct HubState {
    clients: HashMap<ClientId, ClientHandle>,
    /// Reverse index: lot id -> clients subscribed to it.
    by_lot: HashMap<LotId, HashSet<ClientId>>,
}

impl HubState {
    /// Remove every trace of a client. Total by construction: subscriber
    /// sets, the reverse index, and the channel all go together.
    fn remove_client(&mut self, client_id: ClientId) -> bool {
        let Some(handle) = self.clients.remove(&client_id) else {
            return false;
        };
        for lot_id in handle.lots {
            if let Some(subscribers) = self.by_lot.get_mut(&lot_id) {
                subscribers.remove(&client_id);
                if subscribers.is_empty() {
                    self.by_lot.remove(&lot_id);
                }
            }
        }
        true
    }
}

/// Tracks which connected clients are interested in which lots and fans
/// availability events out to them.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct SubscriptionHub {
    state: RwLock<HubState>,
    buffer: usize,
}

impl SubscriptionHub {
    /// Create a hub with a specific per-client buffer capacity.
    pub fn new(buffer: usize) -> Self {
        Self {
            state: RwLock::new(HubState::default()),
            buffer: buffer.max(1),
        }
    }

    /// Register a new client connection.
    ///
    /// Returns the receiver half of the client's event channel so the
    /// caller can forward events to its transport.
    pub async fn register(&self, client_id: ClientId) -> mpsc::Receiver<LotEvent> {
        let (tx, rx) = mpsc::channel(self.buffer);
        let handle = ClientHandle {
            sender: tx,
            lots: HashSet::new(),
        };
        self.state.write().await.clients.insert(client_id, handle);
        rx
    }

    /// Subscribe a registered client to a lot.
    ///
    /// Returns `false` for an unknown client (e.g. one already evicted).
    pub async fn subscribe(&self, client_id: ClientId, lot_id: LotId) -> bool {
        let mut state = self.state.write().await;
        let Some(handle) = state.clients.get_mut(&client_id) else {
            return false;
        };
        handle.lots.insert(lot_id);
        state.by_lot.entry(lot_id).or_default().insert(client_id);
        true
    }

    /// Drop a client's interest in a lot. Unknown pairs are a no-op.
    pub async fn unsubscribe(&self, client_id: ClientId, lot_id: LotId) {
        let mut state = self.state.write().await;
        if let Some(handle) = state.clients.get_mut(&client_id) {
            handle.lots.remove(&lot_id);
        }
        if let Some(subscribers) = state.by_lot.get_mut(&lot_id) {
            subscribers.remove(&client_id);
            if subscribers.is_empty() {
                state.by_lot.remove(&lot_id);
            }
        }
    }

    /// Remove a disconnected client and all of its subscriptions.
    pub async fn disconnect(&self, client_id: ClientId) {
        self.state.write().await.remove_client(client_id);
    }

    /// Deliver an event to every client subscribed to the lot.
    ///
    /// Clients whose backlog is full are evicted rather than awaited, so a
    /// stuck client never blocks delivery to the others. Returns the number
    /// of clients the event was handed to.
    pub async fn publish(&self, lot_id: LotId, event: LotEvent) -> usize {
        let mut stuck = Vec::new();
        let mut delivered = 0;

        {
            let state = self.state.read().await;
            let Some(subscribers) = state.by_lot.get(&lot_id) else {
                return 0;
            };
            for client_id in subscribers {
                let Some(handle) = state.clients.get(client_id) else {
                    continue;
                };
                match handle.sender.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_))
                    | Err(mpsc::error::TrySendError::Closed(_)) => {
                        stuck.push(*client_id);
                    }
                }
            }
        }

        if !stuck.is_empty() {
            let mut state = self.state.write().await;
            for client_id in stuck {
                if state.remove_client(client_id) {
                    tracing::warn!(%client_id, %lot_id, "Evicted unresponsive subscriber");
                }
            }
        }

        delivered
    }

    /// Number of clients currently subscribed to a lot.
    pub async fn subscriber_count(&self, lot_id: LotId) -> usize {
        self.state
            .read()
            .await
            .by_lot
            .get(&lot_id)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    /// Number of registered clients.
    pub async fn client_count(&self) -> usize {
        self.state.read().await.clients.len()
    }

    /// Drop every client channel, ending all forwarding tasks.
    ///
    /// Used during graceful shutdown after the server stops accepting new
    /// connections.
    pub async fn shutdown_all(&self) {
        let mut state = self.state.write().await;
        let count = state.clients.len();
        state.clients.clear();
        state.by_lot.clear();
        tracing::info!(count, "Closed all subscriber channels");
    }
}

impl Default for SubscriptionHub {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_BUFFER)
    }
}
