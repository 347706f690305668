//! Main review engine and public API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ReviewError, Result};
use crate::export::{ExportConfig, ExportPayload, Exporter};
use crate::ingest::{
    self, ColumnAssessment, DetectionConfig, ImageColumnDetector, IngestReport, Parser,
    ParserConfig,
};
use crate::session::ReviewSession;
use crate::view::DEFAULT_PAGE_SIZE;

/// Configuration for the review engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Image column detection configuration.
    pub detection: DetectionConfig,
    /// Export configuration.
    pub export: ExportConfig,
    /// Rows per page for newly loaded datasets.
    pub page_size: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            detection: DetectionConfig::default(),
            export: ExportConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ReviewConfig {
    /// Parse a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ReviewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no dataset could be reviewed with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.min_match_ratio) {
            return Err(ReviewError::Config(format!(
                "min_match_ratio must be within 0.0..=1.0, got {}",
                self.detection.min_match_ratio
            )));
        }
        if self.detection.sample_size == 0 {
            return Err(ReviewError::Config("sample_size must be at least 1".to_string()));
        }
        if self.detection.name_tokens.iter().all(|t| t.is_empty()) {
            return Err(ReviewError::Config(
                "name_tokens must contain a non-empty token".to_string(),
            ));
        }
        if self.export.verdict_suffix.is_empty() {
            return Err(ReviewError::Config("verdict_suffix must not be empty".to_string()));
        }
        if self.parser.delimiter == self.parser.quote {
            return Err(ReviewError::Config(
                "delimiter and quote must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// The review engine: owns at most one active [`ReviewSession`].
///
/// A successful [`ingest`](Self::ingest) replaces the whole session at once; a
/// failed one leaves the previous session untouched.
pub struct ReviewEngine {
    config: ReviewConfig,
    parser: Parser,
    detector: ImageColumnDetector,
    exporter: Exporter,
    session: Option<ReviewSession>,
}

impl ReviewEngine {
    /// Create a review engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReviewConfig::default())
    }

    /// Create a review engine with custom configuration.
    pub fn with_config(config: ReviewConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let detector = ImageColumnDetector::with_config(config.detection.clone());
        let exporter = Exporter::with_config(config.export.clone());

        Self {
            config,
            parser,
            detector,
            exporter,
            session: None,
        }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Load a dataset from decoded text and make it the active session.
    pub fn ingest(&mut self, text: &str) -> Result<IngestReport> {
        let (dataset, report) = ingest::ingest(text, &self.parser, &self.detector)?;
        let session = ReviewSession::new(dataset, self.config.page_size);
        self.session = Some(session);

        info!(
            rows = report.rows_kept,
            dropped = report.rows_dropped,
            image_columns = ?report.image_columns,
            "ingested dataset"
        );
        Ok(report)
    }

    /// How each field of `text` fares against image column detection,
    /// without touching the active session.
    pub fn assess_columns(&self, text: &str) -> Result<Vec<ColumnAssessment>> {
        let table = self.parser.parse_str(text)?;
        Ok(self.detector.assess(&table.schema, &table.rows))
    }

    /// Whether a dataset is loaded.
    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Result<&ReviewSession> {
        self.session.as_ref().ok_or(ReviewError::NoDataset)
    }

    pub fn session_mut(&mut self) -> Result<&mut ReviewSession> {
        self.session.as_mut().ok_or(ReviewError::NoDataset)
    }

    /// Export the full dataset with verdict columns.
    pub fn export(&self) -> Result<ExportPayload> {
        let session = self.session()?;
        self.exporter.export(session.dataset(), session.store())
    }

    /// Export with a file name stamped from `at`.
    pub fn export_at(&self, at: NaiveDateTime) -> Result<ExportPayload> {
        let session = self.session()?;
        self.exporter.export_at(session.dataset(), session.store(), at)
    }
}

impl Default for ReviewEngine {
    fn default() -> Self {
        Self::new()
    }
}
