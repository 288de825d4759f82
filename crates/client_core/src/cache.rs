//! Local record cache: versioned, wholesale-replaced snapshots.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::domain::PassengerRecord;
use tokio::sync::RwLock;
use tracing::debug;

/// Immutable view of the passenger list as of one applied refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    pub version: u64,
    pub records: Vec<PassengerRecord>,
}

impl RecordSnapshot {
    pub fn new(version: u64, records: Vec<PassengerRecord>) -> Self {
        Self { version, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Sequence number handed out when a refresh is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

struct CacheState {
    snapshot: Arc<RecordSnapshot>,
    last_applied: u64,
}

/// Single-writer cache. Responses are applied only if they were issued after
/// the last applied one, so a slow early refresh cannot overwrite a newer list.
pub struct RecordCache {
    next_sequence: AtomicU64,
    state: RwLock<CacheState>,
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordCache {
    pub fn new() -> Self {
        Self {
            next_sequence: AtomicU64::new(0),
            state: RwLock::new(CacheState {
                snapshot: Arc::new(RecordSnapshot::default()),
                last_applied: 0,
            }),
        }
    }

    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replaces the snapshot unless a later-issued refresh already landed.
    /// Returns the new snapshot, or `None` when the response was stale.
    pub async fn apply(
        &self,
        ticket: RefreshTicket,
        records: Vec<PassengerRecord>,
    ) -> Option<Arc<RecordSnapshot>> {
        let mut state = self.state.write().await;
        if ticket.0 < state.last_applied {
            debug!(
                sequence = ticket.0,
                last_applied = state.last_applied,
                "discarding stale refresh response"
            );
            return None;
        }
        let snapshot = Arc::new(RecordSnapshot::new(state.snapshot.version + 1, records));
        state.snapshot = Arc::clone(&snapshot);
        state.last_applied = ticket.0;
        Some(snapshot)
    }

    pub async fn snapshot(&self) -> Arc<RecordSnapshot> {
        Arc::clone(&self.state.read().await.snapshot)
    }
}
