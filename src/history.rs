use std::collections::VecDeque;

use crate::error::{ArtError, ArtResult};
use crate::pixels::PixelBuffer;

/// Default number of snapshot slots
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Bounded undo stack of pixel snapshots.
///
/// Only pixel content is recorded; palette edits are not undoable. The oldest
/// snapshot is evicted once the stack reaches `limit` entries, so at most
/// `limit - 1` snapshots survive a push.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<PixelBuffer>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Store an independent copy of `buffer`
    pub fn record_snapshot(&mut self, buffer: &PixelBuffer) {
        self.snapshots.push_back(buffer.clone());
        if self.snapshots.len() >= self.limit {
            self.snapshots.pop_front();
        }
        log::trace!("history holds {} snapshots", self.snapshots.len());
    }

    /// Pop the most recent snapshot
    pub fn undo(&mut self) -> ArtResult<PixelBuffer> {
        self.snapshots.pop_back().ok_or(ArtError::HistoryEmpty)
    }

    /// Drop the most recent snapshot without restoring it
    pub fn discard_latest(&mut self) -> Option<PixelBuffer> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns true if there are snapshots that can be restored
    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
