//! Per-image verdict state.

use serde::{Deserialize, Serialize};

/// Identifies one image: a row by origin index and an image column by schema position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    /// Row origin index.
    pub row: usize,
    /// Schema position of the image column.
    pub column: usize,
}

impl CellKey {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Reviewer verdict on one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Not yet reviewed.
    #[default]
    Pending,
    /// Image accepted.
    Approved,
    /// Image refused.
    Rejected,
}

impl Verdict {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pending => "Pending",
            Verdict::Approved => "Approved",
            Verdict::Rejected => "Rejected",
        }
    }

    /// Check if this is a terminal verdict (not pending).
    pub fn is_decided(&self) -> bool {
        !matches!(self, Verdict::Pending)
    }
}

/// Verdict, rejection reason, and batch-selection flag for one image.
///
/// The reason is non-empty only while the verdict is `Rejected`, and
/// approving always marks the image selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub selected: bool,
}

impl ReviewState {
    /// Initial state: pending, no reason, not selected.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Mark approved. Clears any reason and selects the image.
    pub fn approve(&mut self) {
        self.verdict = Verdict::Approved;
        self.reason.clear();
        self.selected = true;
    }

    /// Mark rejected with a (possibly empty) reason. Deselects the image.
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.verdict = Verdict::Rejected;
        self.reason = reason.into();
        self.selected = false;
    }

    /// Flip the selection flag, leaving the verdict alone.
    pub fn toggle_selected(&mut self) -> bool {
        self.selected = !self.selected;
        self.selected
    }

    /// Whether export would report this image as passing.
    pub fn exports_as_approved(&self) -> bool {
        self.selected
    }

    /// A decided verdict that export will contradict, because the
    /// selection flag and the verdict disagree.
    pub fn is_divergent(&self) -> bool {
        match self.verdict {
            Verdict::Pending => false,
            Verdict::Approved => !self.selected,
            Verdict::Rejected => self.selected,
        }
    }
}
