//! Table ingestion: decode delimited text and locate image columns.

mod detect;
mod parser;
mod table;

pub use detect::{ColumnAssessment, DetectionConfig, ImageColumnDetector};
pub use parser::{BOM, ParsedTable, Parser, ParserConfig};
pub use table::{Dataset, FieldSchema, Row, SourceInfo};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ReviewError, Result};

/// What ingestion kept, dropped, and detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Rows kept.
    pub rows_kept: usize,
    /// Records dropped for a field-count mismatch.
    pub rows_dropped: usize,
    /// Names of the detected image columns.
    pub image_columns: Vec<String>,
    /// Names of the fields available for faceting.
    pub filterable_fields: Vec<String>,
}

impl IngestReport {
    fn for_dataset(dataset: &Dataset, rows_dropped: usize) -> Self {
        let name = |p: &usize| dataset.schema.name(*p).unwrap_or_default().to_string();
        Self {
            rows_kept: dataset.row_count(),
            rows_dropped,
            image_columns: dataset.image_columns.iter().map(name).collect(),
            filterable_fields: dataset.filterable_fields().iter().map(name).collect(),
        }
    }
}

/// Parse `text` and detect its image columns.
///
/// Fails with [`ReviewError::NoImageColumn`] when no field qualifies.
pub fn ingest(
    text: &str,
    parser: &Parser,
    detector: &ImageColumnDetector,
) -> Result<(Dataset, IngestReport)> {
    let ParsedTable {
        schema,
        rows,
        dropped,
    } = parser.parse_str(text)?;

    let image_columns = detector.detect(&schema, &rows);
    if image_columns.is_empty() {
        warn!(fields = schema.len(), rows = rows.len(), "no image column found");
        return Err(ReviewError::NoImageColumn);
    }

    let source = SourceInfo::describe(text, rows.len(), schema.len());
    let dataset = Dataset::new(schema, rows, image_columns, source);
    let report = IngestReport::for_dataset(&dataset, dropped);

    Ok((dataset, report))
}
