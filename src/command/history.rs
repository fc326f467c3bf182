use std::collections::VecDeque;

use crate::error::HistoryError;
use crate::surface::Snapshot;

/// Linear undo/redo over full-surface snapshots.
///
/// The cursor points at the snapshot that is on the surface whenever no
/// preview is being drawn. Committing after an undo throws away everything
/// past the cursor, so there is never more than one redo branch.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    snapshots: VecDeque<Snapshot>,
    cursor: Option<usize>,
    /// Maximum number of snapshots kept; oldest are dropped first
    limit: Option<usize>,
}

impl HistoryStore {
    /// Unbounded history, not yet initialized
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` snapshots (at least one)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Drop everything and seed the history with `snapshot` at cursor 0
    pub fn initialize(&mut self, snapshot: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push_back(snapshot);
        self.cursor = Some(0);
    }

    /// Append `snapshot` after the cursor, discarding the redo branch
    pub fn commit(&mut self, snapshot: Snapshot) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push_back(snapshot);

        if let Some(limit) = self.limit {
            while self.snapshots.len() > limit {
                self.snapshots.pop_front();
            }
        }
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Step back one snapshot and return it
    pub fn undo(&mut self) -> Result<&Snapshot, HistoryError> {
        let cursor = self.cursor.ok_or(HistoryError::Empty)?;
        if cursor == 0 {
            return Err(HistoryError::NoEarlierState);
        }
        self.cursor = Some(cursor - 1);
        Ok(&self.snapshots[cursor - 1])
    }

    /// Step forward one snapshot and return it
    pub fn redo(&mut self) -> Result<&Snapshot, HistoryError> {
        let cursor = self.cursor.ok_or(HistoryError::Empty)?;
        if cursor + 1 >= self.snapshots.len() {
            return Err(HistoryError::NoLaterState);
        }
        self.cursor = Some(cursor + 1);
        Ok(&self.snapshots[cursor + 1])
    }

    /// The snapshot at the cursor
    pub fn peek_current(&self) -> Result<&Snapshot, HistoryError> {
        self.cursor
            .and_then(|cursor| self.snapshots.get(cursor))
            .ok_or(HistoryError::Empty)
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor + 1 < self.snapshots.len())
    }
}
