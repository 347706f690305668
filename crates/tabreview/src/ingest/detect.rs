//! Image column detection.
//!
//! A field is an image column when its name mentions an image-like token and
//! a sample of its values looks like image references. Both checks must pass.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::table::{FieldSchema, Row};

static URL_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Configuration for image column detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Case-insensitive tokens; a field name must contain at least one.
    pub name_tokens: Vec<String>,
    /// Fields starting with this prefix are internal and never qualify.
    pub reserved_prefix: String,
    /// Number of leading non-empty values to inspect.
    pub sample_size: usize,
    /// Fraction of sampled values that must look like image references.
    pub min_match_ratio: f64,
    /// File extensions (without dot) recognised as images.
    pub image_extensions: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            name_tokens: [
                "url", "image", "img", "photo", "picture", "pic", "cover", "thumbnail", "图片",
                "照片", "封面",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reserved_prefix: "_".to_string(),
            sample_size: 10,
            min_match_ratio: 0.3,
            image_extensions: ["jpg", "jpeg", "png", "gif", "webp", "bmp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// How a single field fared against both detection checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAssessment {
    /// Field position in the schema.
    pub position: usize,
    /// Field name.
    pub name: String,
    /// Field is internal and was skipped.
    pub reserved: bool,
    /// Name contains an image-like token.
    pub name_match: bool,
    /// Non-empty values inspected.
    pub sampled: usize,
    /// Inspected values that look like image references.
    pub matched: usize,
    /// Both checks passed.
    pub qualifies: bool,
}

/// Detects which fields hold image references.
#[derive(Debug, Clone)]
pub struct ImageColumnDetector {
    config: DetectionConfig,
    tokens: Vec<String>,
}

impl ImageColumnDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: DetectionConfig) -> Self {
        let tokens = config.name_tokens.iter().map(|t| t.to_lowercase()).collect();
        Self { config, tokens }
    }

    /// Positions of every qualifying field, in header order.
    pub fn detect(&self, schema: &FieldSchema, rows: &[Row]) -> Vec<usize> {
        self.assess(schema, rows)
            .into_iter()
            .filter(|a| a.qualifies)
            .map(|a| a.position)
            .collect()
    }

    /// Assess every field in the schema.
    pub fn assess(&self, schema: &FieldSchema, rows: &[Row]) -> Vec<ColumnAssessment> {
        schema
            .names()
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let assessment = self.assess_column(position, name, rows);
                debug!(
                    field = %assessment.name,
                    name_match = assessment.name_match,
                    sampled = assessment.sampled,
                    matched = assessment.matched,
                    qualifies = assessment.qualifies,
                    "assessed image column candidate"
                );
                assessment
            })
            .collect()
    }

    fn assess_column(&self, position: usize, name: &str, rows: &[Row]) -> ColumnAssessment {
        let reserved =
            !self.config.reserved_prefix.is_empty() && name.starts_with(&self.config.reserved_prefix);
        let name_match = !reserved && self.name_matches(name);

        let mut sampled = 0;
        let mut matched = 0;
        if name_match {
            for value in rows
                .iter()
                .map(|r| r.value(position))
                .filter(|v| !v.is_empty())
                .take(self.config.sample_size)
            {
                sampled += 1;
                if self.looks_like_image(value) {
                    matched += 1;
                }
            }
        }

        let qualifies = name_match
            && sampled > 0
            && matched as f64 / sampled as f64 >= self.config.min_match_ratio;

        ColumnAssessment {
            position,
            name: name.to_string(),
            reserved,
            name_match,
            sampled,
            matched,
            qualifies,
        }
    }

    /// Whether a field name contains one of the image-like tokens.
    pub fn name_matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.tokens.iter().any(|t| lower.contains(t.as_str()))
    }

    /// Whether a value looks like an image reference: an http(s) URL or a
    /// path ending in a known image extension.
    pub fn looks_like_image(&self, value: &str) -> bool {
        if URL_SCHEME.is_match(value) {
            return true;
        }
        let lower = value.to_lowercase();
        match lower.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .config
                .image_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

impl Default for ImageColumnDetector {
    fn default() -> Self {
        Self::new()
    }
}
