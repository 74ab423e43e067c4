//! Per-board mutual exclusion.
//!
//! Every mutating operation holds the lock for its target board across
//! the whole load → transform → replace sequence, so the two-step move
//! protocol can never interleave with another mutation on the same
//! board. Operations on different boards share nothing and run in
//! parallel.
//!
//! The map is lazily populated and purged on each acquisition: an entry
//! whose mutex is neither held nor awaited has a strong count of one
//! (the map's own) and is dropped.

use crate::board::BoardId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed lock map: board id → exclusive section.
#[derive(Default)]
pub struct BoardLocks {
    inner: Mutex<HashMap<BoardId, Arc<Mutex<()>>>>,
}

impl BoardLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive section for one board, waiting if another
    /// operation on the same board is in flight.
    pub async fn acquire(&self, id: BoardId) -> OwnedMutexGuard<()> {
        let cell = {
            let mut map = self.inner.lock().await;
            // Drop idle entries before (possibly re-)creating this one.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(id).or_default())
        };
        cell.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
