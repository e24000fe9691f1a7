use std::sync::Arc;
use tokio::sync::RwLock;

use crate::stats::Snapshot;

/// Single-slot store for the most recent snapshot analysis.
///
/// Clones share the same slot. Each `store` replaces the previous entry
/// whole; nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    slot: Arc<RwLock<Option<Snapshot>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, snapshot: Snapshot) {
        *self.slot.write().await = Some(snapshot);
    }

    /// `None` until the first `store`.
    pub async fn retrieve(&self) -> Option<Snapshot> {
        self.slot.read().await.clone()
    }
}
