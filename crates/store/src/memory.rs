//! The in-process document store.
//!
//! Lots live behind one `RwLock` each so that availability mutations get
//! per-document read-modify-write atomicity: a writer holds the document's
//! write guard for the whole mutation, concurrent writers to the same lot
//! serialize, and writers to different lots do not contend. The outer maps
//! are only locked long enough to look up or insert handles.
//!
//! Reviews are small immutable-ish rows; they share a single map lock,
//! which also makes the (user, lot) uniqueness check atomic with insert.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use spotwatch_core::lot::ParkingLot;
use spotwatch_core::review::Review;
use spotwatch_core::types::{LotId, ReviewId};

/// Shared handle to one lot document.
pub type LotHandle = Arc<RwLock<ParkingLot>>;

/// In-memory document store for lots and reviews.
///
/// Designed to be wrapped in `Arc` and shared across the application.
#[derive(Default)]
pub struct MemoryStore {
    lots: RwLock<HashMap<LotId, LotHandle>>,
    pub(crate) reviews: RwLock<HashMap<ReviewId, Review>>,
}

impl MemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created lot document.
    pub(crate) async fn insert_lot(&self, lot: ParkingLot) -> LotHandle {
        let handle = Arc::new(RwLock::new(lot.clone()));
        self.lots.write().await.insert(lot.id, Arc::clone(&handle));
        handle
    }

    /// Look up the handle for a lot document.
    pub(crate) async fn lot_handle(&self, lot_id: LotId) -> Option<LotHandle> {
        self.lots.read().await.get(&lot_id).map(Arc::clone)
    }

    /// Snapshot every lot document.
    ///
    /// Handles are collected under the map lock, then each document is read
    /// individually, so a snapshot never blocks concurrent writers for
    /// longer than one document clone. Counts read this way may be a few
    /// milliseconds stale, which callers tolerate.
    pub(crate) async fn snapshot_lots(&self) -> Vec<ParkingLot> {
        let handles: Vec<LotHandle> = self.lots.read().await.values().map(Arc::clone).collect();

        let mut lots = Vec::with_capacity(handles.len());
        for handle in handles {
            lots.push(handle.read().await.clone());
        }
        lots
    }
}
