//! Facet filter engine: value statistics and multi-select inclusion filtering.
//!
//! Statistics are always computed over the full dataset so choice lists never
//! shrink as filters are applied. Filtering is a full pass on every apply.

mod filter;
mod stats;

pub use filter::FacetSelections;
pub use stats::{EMPTY_LABEL, FacetValue, FieldStatistics, ValueCount};
