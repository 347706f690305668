//! Ingested dataset: field schema, rows, and source metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata about the text a dataset was ingested from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// SHA-256 hash of the ingested text.
    pub hash: String,
    /// Size of the ingested text in bytes.
    pub size_bytes: u64,
    /// Number of rows kept (excluding header).
    pub row_count: usize,
    /// Number of fields in the header.
    pub column_count: usize,
    /// When the dataset was ingested.
    pub loaded_at: DateTime<Utc>,
}

impl SourceInfo {
    /// Describe the given source text.
    pub fn describe(text: &str, row_count: usize, column_count: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());

        Self {
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes: text.len() as u64,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// The ordered field names from the input header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    names: Vec<String>,
}

impl FieldSchema {
    /// Create a schema from header names.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Field name at a position.
    pub fn name(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(|s| s.as_str())
    }

    /// Position of the first field with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// All field names in header order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One input record with its stable origin index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Position among kept rows at ingestion; never changes afterwards.
    pub origin: usize,
    /// Values aligned with the field schema.
    values: Vec<String>,
}

impl Row {
    /// Create a row. `values` must already be aligned with the schema.
    pub fn new(origin: usize, values: Vec<String>) -> Self {
        Self { origin, values }
    }

    /// Value at a field position; missing values read as the empty string.
    pub fn value(&self, position: usize) -> &str {
        self.values.get(position).map(|s| s.as_str()).unwrap_or("")
    }

    /// All values in schema order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A fully ingested dataset with its detected image columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Field names in header order.
    pub schema: FieldSchema,
    /// Rows in origin order.
    pub rows: Vec<Row>,
    /// Schema positions of detected image columns, in header order.
    pub image_columns: Vec<usize>,
    /// Where the rows came from.
    pub source: SourceInfo,
}

impl Dataset {
    /// Assemble a dataset from its parts.
    pub fn new(
        schema: FieldSchema,
        rows: Vec<Row>,
        image_columns: Vec<usize>,
        source: SourceInfo,
    ) -> Self {
        Self {
            schema,
            rows,
            image_columns,
            source,
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a row by origin index.
    pub fn row(&self, origin: usize) -> Option<&Row> {
        self.rows.get(origin)
    }

    /// Get a specific cell value by origin index and field position.
    pub fn get(&self, origin: usize, position: usize) -> Option<&str> {
        self.rows
            .get(origin)
            .filter(|_| position < self.schema.len())
            .map(|r| r.value(position))
    }

    /// Get a cell value by field name.
    pub fn get_by_name(&self, origin: usize, field: &str) -> Option<&str> {
        let position = self.schema.position(field)?;
        self.get(origin, position)
    }

    /// Whether the field at `position` is a detected image column.
    pub fn is_image_column(&self, position: usize) -> bool {
        self.image_columns.contains(&position)
    }

    /// Names of the detected image columns.
    pub fn image_column_names(&self) -> Vec<&str> {
        self.image_columns
            .iter()
            .filter_map(|&p| self.schema.name(p))
            .collect()
    }

    /// Positions of every field that is not an image column.
    pub fn filterable_fields(&self) -> Vec<usize> {
        (0..self.schema.len())
            .filter(|p| !self.is_image_column(*p))
            .collect()
    }

    /// All values for a field position, in origin order.
    pub fn column_values(&self, position: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row.value(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let schema = FieldSchema::new(vec!["name".into(), "photo_url".into(), "age".into()]);
        let rows = vec![
            Row::new(0, vec!["Alice".into(), "http://x/a.jpg".into(), "30".into()]),
            Row::new(1, vec!["Bob".into(), String::new(), "40".into()]),
        ];
        let source = SourceInfo::describe("", 2, 3);
        Dataset::new(schema, rows, vec![1], source)
    }

    #[test]
    fn test_lookup_by_name_and_position() {
        let ds = sample();
        assert_eq!(ds.get(0, 0), Some("Alice"));
        assert_eq!(ds.get_by_name(1, "age"), Some("40"));
        assert_eq!(ds.get(0, 7), None);
        assert_eq!(ds.get(5, 0), None);
        assert_eq!(ds.get_by_name(0, "missing"), None);
    }

    #[test]
    fn test_filterable_fields_exclude_image_columns() {
        let ds = sample();
        assert_eq!(ds.filterable_fields(), vec![0, 2]);
        assert_eq!(ds.image_column_names(), vec!["photo_url"]);
        assert!(ds.is_image_column(1));
        assert!(!ds.is_image_column(0));
    }

    #[test]
    fn test_source_hash_is_stable() {
        let a = SourceInfo::describe("a,b\n1,2", 1, 2);
        let b = SourceInfo::describe("a,b\n1,2", 1, 2);
        assert_eq!(a.hash, b.hash);
        assert!(a.hash.starts_with("sha256:"));
        assert_eq!(a.size_bytes, 7);
    }
}
