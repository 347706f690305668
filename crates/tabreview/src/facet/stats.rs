//! Per-field value statistics for facet choice lists.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ingest::Dataset;

/// Label shown for the empty-value facet choice.
pub const EMPTY_LABEL: &str = "(empty)";

/// A facet choice: either a concrete value or the single empty marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetValue {
    /// Every empty cell normalizes to this one marker.
    Empty,
    Text(String),
}

impl FacetValue {
    /// Normalize a raw cell value.
    pub fn from_cell(value: &str) -> Self {
        if value.is_empty() {
            FacetValue::Empty
        } else {
            FacetValue::Text(value.to_string())
        }
    }

    /// Whether a raw cell value normalizes to this choice.
    pub fn matches_cell(&self, value: &str) -> bool {
        match self {
            FacetValue::Empty => value.is_empty(),
            FacetValue::Text(text) => text == value,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FacetValue::Empty)
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Empty => f.write_str(EMPTY_LABEL),
            FacetValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        FacetValue::from_cell(value)
    }
}

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: FacetValue,
    pub count: usize,
}

/// Distinct values of one field over the full dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStatistics {
    /// Field name.
    pub field: String,
    /// Field position in the schema.
    pub position: usize,
    /// Values ordered by count descending, ties in first-seen order.
    pub values: Vec<ValueCount>,
}

impl FieldStatistics {
    /// Count the values of the field at `position` across every row of `dataset`.
    pub fn compute(dataset: &Dataset, position: usize) -> Self {
        let mut counts: IndexMap<FacetValue, usize> = IndexMap::new();
        for value in dataset.column_values(position) {
            *counts.entry(FacetValue::from_cell(value)).or_insert(0) += 1;
        }

        let mut values: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount { value, count })
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        values.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            field: dataset.schema.name(position).unwrap_or_default().to_string(),
            position,
            values,
        }
    }

    /// Number of distinct values.
    pub fn distinct(&self) -> usize {
        self.values.len()
    }

    /// Occurrences of one value.
    pub fn count_of(&self, value: &FacetValue) -> usize {
        self.values
            .iter()
            .find(|v| &v.value == value)
            .map(|v| v.count)
            .unwrap_or(0)
    }
}
