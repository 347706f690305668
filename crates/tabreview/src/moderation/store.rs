//! Moderation store: verdict state for every (row, image column) pair.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReviewError, Result};
use crate::ingest::Dataset;

use super::verdict::{CellKey, ReviewState, Verdict};

/// Counts of images by verdict and selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Every (row, image column) pair.
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Pairs whose selection flag is set.
    pub selected: usize,
    /// Decided pairs whose exported verdict contradicts the stored verdict.
    pub divergent: usize,
}

impl ReviewSummary {
    /// Number of decided pairs (not pending).
    pub fn decided(&self) -> usize {
        self.approved + self.rejected
    }

    /// Get progress as a fraction (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.decided() as f64 / self.total as f64
    }
}

/// Holds review state keyed by [`CellKey`], separate from row data.
#[derive(Debug, Clone, Default)]
pub struct ModerationStore {
    states: IndexMap<CellKey, ReviewState>,
}

impl ModerationStore {
    /// Initialize a pending state for every row and image column of `dataset`.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let mut states = IndexMap::with_capacity(dataset.row_count() * dataset.image_columns.len());
        for row in &dataset.rows {
            for &column in &dataset.image_columns {
                states.insert(CellKey::new(row.origin, column), ReviewState::pending());
            }
        }
        Self { states }
    }

    /// Number of tracked pairs.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Get the state of one image.
    pub fn state(&self, key: CellKey) -> Option<&ReviewState> {
        self.states.get(&key)
    }

    /// Iterate over every pair in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &ReviewState)> {
        self.states.iter()
    }

    /// Approve one image.
    pub fn approve(&mut self, key: CellKey) -> Result<()> {
        self.state_mut(key)?.approve();
        debug!(row = key.row, column = key.column, "approved");
        Ok(())
    }

    /// Reject one image with a reason (may be empty).
    pub fn reject(&mut self, key: CellKey, reason: &str) -> Result<()> {
        self.state_mut(key)?.reject(reason);
        debug!(row = key.row, column = key.column, reason, "rejected");
        Ok(())
    }

    /// Flip the selection flag of one image. Returns the new flag.
    pub fn toggle_selected(&mut self, key: CellKey) -> Result<bool> {
        Ok(self.state_mut(key)?.toggle_selected())
    }

    /// Set the selection flag of one image.
    pub fn set_selected(&mut self, key: CellKey, selected: bool) -> Result<()> {
        self.state_mut(key)?.selected = selected;
        Ok(())
    }

    /// Set the selection flag of every listed pair. Returns how many were set.
    pub fn set_selected_all(&mut self, keys: &[CellKey], selected: bool) -> Result<usize> {
        if let Some(missing) = keys.iter().find(|k| !self.states.contains_key(*k)) {
            return Err(unknown(*missing));
        }
        for key in keys {
            self.set_selected(*key, selected)?;
        }
        Ok(keys.len())
    }

    /// Every selected pair across the whole dataset, in row-major order.
    pub fn selected_cells(&self) -> Vec<CellKey> {
        self.states
            .iter()
            .filter(|(_, s)| s.selected)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Approve every listed pair. Returns how many were approved.
    pub fn approve_all(&mut self, keys: &[CellKey]) -> Result<usize> {
        if let Some(missing) = keys.iter().find(|k| !self.states.contains_key(*k)) {
            return Err(unknown(*missing));
        }
        for key in keys {
            self.approve(*key)?;
        }
        Ok(keys.len())
    }

    /// Counts over every pair.
    pub fn summary(&self) -> ReviewSummary {
        let mut summary = ReviewSummary {
            total: self.states.len(),
            ..ReviewSummary::default()
        };

        for state in self.states.values() {
            match state.verdict {
                Verdict::Pending => summary.pending += 1,
                Verdict::Approved => summary.approved += 1,
                Verdict::Rejected => summary.rejected += 1,
            }
            if state.selected {
                summary.selected += 1;
            }
            if state.is_divergent() {
                summary.divergent += 1;
            }
        }

        summary
    }

    fn state_mut(&mut self, key: CellKey) -> Result<&mut ReviewState> {
        self.states.get_mut(&key).ok_or_else(|| unknown(key))
    }
}

fn unknown(key: CellKey) -> ReviewError {
    ReviewError::UnknownCell {
        row: key.row,
        column: key.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{FieldSchema, Row, SourceInfo};

    fn dataset() -> Dataset {
        let schema = FieldSchema::new(vec!["front".into(), "name".into(), "back".into()]);
        let rows = (0..3)
            .map(|i| {
                Row::new(
                    i,
                    vec![format!("f{i}.jpg"), format!("n{i}"), format!("b{i}.jpg")],
                )
            })
            .collect();
        Dataset::new(schema, rows, vec![0, 2], SourceInfo::describe("", 3, 3))
    }

    #[test]
    fn test_every_pair_starts_pending() {
        let store = ModerationStore::for_dataset(&dataset());
        assert_eq!(store.len(), 6);
        assert!(store.iter().all(|(_, s)| *s == ReviewState::pending()));
        assert!(store.state(CellKey::new(1, 1)).is_none());
    }

    #[test]
    fn test_approve_is_idempotent() {
        let mut store = ModerationStore::for_dataset(&dataset());
        let key = CellKey::new(1, 2);

        store.approve(key).unwrap();
        let once = store.state(key).cloned();
        store.approve(key).unwrap();

        assert_eq!(store.state(key).cloned(), once);
    }

    #[test]
    fn test_reject_is_idempotent_with_same_reason() {
        let mut store = ModerationStore::for_dataset(&dataset());
        let key = CellKey::new(0, 0);

        store.reject(key, "cropped").unwrap();
        let once = store.state(key).cloned();
        store.reject(key, "cropped").unwrap();

        assert_eq!(store.state(key).cloned(), once);
    }

    #[test]
    fn test_columns_are_independent() {
        let mut store = ModerationStore::for_dataset(&dataset());
        store.approve(CellKey::new(0, 0)).unwrap();
        store.reject(CellKey::new(0, 2), "").unwrap();

        assert_eq!(store.state(CellKey::new(0, 0)).unwrap().verdict, Verdict::Approved);
        assert_eq!(store.state(CellKey::new(0, 2)).unwrap().verdict, Verdict::Rejected);
    }

    #[test]
    fn test_unknown_cell_is_rejected() {
        let mut store = ModerationStore::for_dataset(&dataset());
        assert!(matches!(
            store.approve(CellKey::new(9, 0)),
            Err(ReviewError::UnknownCell { row: 9, column: 0 })
        ));
        // Non-image columns are not tracked.
        assert!(store.toggle_selected(CellKey::new(0, 1)).is_err());
    }

    #[test]
    fn test_approve_all_checks_every_key_first() {
        let mut store = ModerationStore::for_dataset(&dataset());
        let keys = [CellKey::new(0, 0), CellKey::new(7, 0)];

        assert!(store.approve_all(&keys).is_err());
        assert_eq!(store.summary().approved, 0);
    }

    #[test]
    fn test_set_selected_all_checks_every_key_first() {
        let mut store = ModerationStore::for_dataset(&dataset());

        let keys = [CellKey::new(0, 0), CellKey::new(0, 1)];
        assert!(matches!(
            store.set_selected_all(&keys, true),
            Err(ReviewError::UnknownCell { row: 0, column: 1 })
        ));
        assert!(store.selected_cells().is_empty());

        let keys = [CellKey::new(0, 0), CellKey::new(2, 2)];
        assert_eq!(store.set_selected_all(&keys, true).unwrap(), 2);
        assert_eq!(store.selected_cells(), keys.to_vec());
        assert_eq!(store.set_selected_all(&keys[..1], false).unwrap(), 1);
        assert_eq!(store.selected_cells(), vec![CellKey::new(2, 2)]);
    }

    #[test]
    fn test_selected_cells_and_summary() {
        let mut store = ModerationStore::for_dataset(&dataset());
        store.toggle_selected(CellKey::new(2, 0)).unwrap();
        store.approve(CellKey::new(0, 2)).unwrap();
        store.reject(CellKey::new(1, 0), "dup").unwrap();

        assert_eq!(
            store.selected_cells(),
            vec![CellKey::new(0, 2), CellKey::new(2, 0)]
        );

        let summary = store.summary();
        assert_eq!(summary.total, 6);
        assert_eq!(summary.pending, 4);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.selected, 2);
        assert_eq!(summary.divergent, 0);
        assert_eq!(summary.decided(), 2);
        assert!((summary.progress() - 2.0 / 6.0).abs() < 1e-9);
    }
}
