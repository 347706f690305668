//! Multi-select facet filtering.

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::{ReviewError, Result};
use crate::ingest::{Dataset, Row};

use super::stats::FacetValue;

/// Included values per filterable field.
///
/// An empty selection means the field imposes no restriction.
#[derive(Debug, Clone, Default)]
pub struct FacetSelections {
    selections: IndexMap<usize, IndexSet<FacetValue>>,
}

impl FacetSelections {
    /// Empty selections for every filterable field of `dataset`.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let selections = dataset
            .filterable_fields()
            .into_iter()
            .map(|p| (p, IndexSet::new()))
            .collect();
        Self { selections }
    }

    /// Schema positions of the filterable fields.
    pub fn fields(&self) -> impl Iterator<Item = usize> + '_ {
        self.selections.keys().copied()
    }

    /// Whether the field at `position` accepts facet selections.
    pub fn is_filterable(&self, position: usize) -> bool {
        self.selections.contains_key(&position)
    }

    /// Current selection for one field.
    pub fn selection(&self, position: usize) -> Option<&IndexSet<FacetValue>> {
        self.selections.get(&position)
    }

    /// Replace the selection for one field.
    pub fn set(
        &mut self,
        position: usize,
        values: impl IntoIterator<Item = FacetValue>,
    ) -> Result<()> {
        let selection = self.selection_mut(position)?;
        selection.clear();
        selection.extend(values);
        Ok(())
    }

    /// Add or remove one value. Returns whether it is now included.
    pub fn toggle(&mut self, position: usize, value: FacetValue) -> Result<bool> {
        let selection = self.selection_mut(position)?;
        if selection.shift_remove(&value) {
            Ok(false)
        } else {
            selection.insert(value);
            Ok(true)
        }
    }

    /// Reset one field to unrestricted.
    pub fn clear_field(&mut self, position: usize) -> Result<()> {
        self.selection_mut(position)?.clear();
        Ok(())
    }

    /// Reset every field to unrestricted.
    pub fn clear(&mut self) {
        for selection in self.selections.values_mut() {
            selection.clear();
        }
    }

    /// Whether any field currently restricts the view.
    pub fn is_active(&self) -> bool {
        self.selections.values().any(|s| !s.is_empty())
    }

    /// Whether `row` passes every non-empty selection.
    pub fn matches(&self, row: &Row) -> bool {
        self.selections.iter().all(|(&position, selection)| {
            selection.is_empty() || selection.iter().any(|v| v.matches_cell(row.value(position)))
        })
    }

    /// Origin indexes of the rows passing every selection, in origin order.
    pub fn apply(&self, dataset: &Dataset) -> Vec<usize> {
        let view: Vec<usize> = dataset
            .rows
            .iter()
            .filter(|row| self.matches(row))
            .map(|row| row.origin)
            .collect();
        debug!(
            total = dataset.row_count(),
            kept = view.len(),
            active = self.is_active(),
            "applied facets"
        );
        view
    }

    fn selection_mut(&mut self, position: usize) -> Result<&mut IndexSet<FacetValue>> {
        self.selections
            .get_mut(&position)
            .ok_or_else(|| ReviewError::UnknownField(format!("#{position}")))
    }
}
