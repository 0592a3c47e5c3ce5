/*!
 * Accumulating flat index of discovered shelf entries
 */

use std::sync::Mutex;

use crate::types::Entry;

/// Flat, append-only registry of every entry discovered so far.
///
/// Fetches complete in arbitrary order, so the index is only eventually
/// consistent with the remote tree; a search evaluated mid-crawl may
/// under-report matches. Duplicates from repeated fetches are tolerated and
/// never compacted. The index grows monotonically for the life of the
/// session and is only reset by restarting.
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Mutex<Vec<Entry>>,
}

impl SearchIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of discovered entries. No dedup, no ordering guarantee.
    pub fn append(&self, batch: &[Entry]) {
        if batch.is_empty() {
            return;
        }
        let mut entries = self.entries.lock().unwrap();
        entries.extend_from_slice(batch);
    }

    /// Snapshot of every entry discovered so far
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of entries discovered so far
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether nothing has been discovered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
