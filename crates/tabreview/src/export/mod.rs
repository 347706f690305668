//! Export serializer: the original table annotated with per-image verdicts.
//!
//! Every ingested row is written in origin order, whatever the current facet
//! selections or page. A verdict column follows each image column. The
//! exported verdict comes from the image's selection flag, not its stored
//! [`Verdict`](crate::moderation::Verdict): selected images export as approved
//! and everything else as rejected.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::ingest::{BOM, Dataset};
use crate::moderation::{CellKey, ModerationStore, Verdict};

/// Prefix of suggested export file names.
pub const FILE_NAME_PREFIX: &str = "review-results";

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Appended to an image column's name to name its verdict column.
    pub verdict_suffix: String,
    /// Verdict cell text for selected images.
    pub approved_label: String,
    /// Verdict cell text for unselected images.
    pub rejected_label: String,
    /// Also write a rejection-reason column after each verdict column.
    pub include_reasons: bool,
    /// Appended to an image column's name to name its reason column.
    pub reason_suffix: String,
    /// Prefix the output with a UTF-8 byte-order mark.
    pub byte_order_mark: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            verdict_suffix: "_review_result".to_string(),
            approved_label: "approved".to_string(),
            rejected_label: "rejected".to_string(),
            include_reasons: false,
            reason_suffix: "_reject_reason".to_string(),
            byte_order_mark: true,
        }
    }
}

/// Encoded export text plus a suggested file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub file_name: String,
    pub text: String,
    /// Data rows written (excluding header).
    pub rows: usize,
}

/// Writes verdict-annotated tables.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    /// Create an exporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter with custom configuration.
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Export with a file name stamped from the local clock.
    pub fn export(&self, dataset: &Dataset, store: &ModerationStore) -> Result<ExportPayload> {
        self.export_at(dataset, store, Local::now().naive_local())
    }

    /// Export with a file name stamped from `at`.
    pub fn export_at(
        &self,
        dataset: &Dataset,
        store: &ModerationStore,
        at: NaiveDateTime,
    ) -> Result<ExportPayload> {
        let divergent = store.summary().divergent;
        if divergent > 0 {
            warn!(
                divergent,
                "exported verdicts follow the selection flag and differ from stored verdicts"
            );
        }

        let mut body = self.encode(dataset, store)?;
        if self.config.byte_order_mark {
            body.insert(0, BOM);
        }

        let payload = ExportPayload {
            file_name: suggested_file_name(at),
            text: body,
            rows: dataset.row_count(),
        };
        info!(rows = payload.rows, file = %payload.file_name, "exported review results");
        Ok(payload)
    }

    /// Header row: every field in schema order, each image column followed
    /// by its verdict column (and reason column when enabled).
    pub fn header(&self, dataset: &Dataset) -> Vec<String> {
        let mut header = Vec::with_capacity(dataset.schema.len() + dataset.image_columns.len() * 2);
        for (position, name) in dataset.schema.names().iter().enumerate() {
            header.push(name.clone());
            if dataset.is_image_column(position) {
                header.push(format!("{name}{}", self.config.verdict_suffix));
                if self.config.include_reasons {
                    header.push(format!("{name}{}", self.config.reason_suffix));
                }
            }
        }
        header
    }

    /// Encode the annotated table without a byte-order mark.
    pub fn encode(&self, dataset: &Dataset, store: &ModerationStore) -> Result<String> {
        let mut writer = table_writer();
        writer.write_record(self.header(dataset))?;

        for row in &dataset.rows {
            let mut record: Vec<&str> = Vec::with_capacity(dataset.schema.len() + 2);
            for position in 0..dataset.schema.len() {
                record.push(row.value(position));
                if dataset.is_image_column(position) {
                    let state = store.state(CellKey::new(row.origin, position));
                    let selected = state.is_some_and(|s| s.exports_as_approved());
                    record.push(if selected {
                        self.config.approved_label.as_str()
                    } else {
                        self.config.rejected_label.as_str()
                    });
                    if self.config.include_reasons {
                        record.push(match state {
                            Some(s) if s.verdict == Verdict::Rejected => s.reason.as_str(),
                            _ => "",
                        });
                    }
                }
            }
            writer.write_record(&record)?;
        }

        finish(writer)
    }
}

/// Encode a dataset's own fields, with no verdict columns.
pub fn encode_table(dataset: &Dataset) -> Result<String> {
    let mut writer = table_writer();
    writer.write_record(dataset.schema.names())?;
    for row in &dataset.rows {
        writer.write_record(row.values())?;
    }
    finish(writer)
}

/// `review-results_YYYYMMDD_HHMMSS.csv`
pub fn suggested_file_name(at: NaiveDateTime) -> String {
    format!("{FILE_NAME_PREFIX}_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

fn table_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // Every field written came from a `str`.
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}
