//! Read-only card data for one row: its images with their review state,
//! plus the row's other non-empty fields.

use serde::{Deserialize, Serialize};

use crate::ingest::Dataset;
use crate::moderation::{CellKey, ModerationStore, ReviewState};

/// One image on a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCell {
    pub key: CellKey,
    /// Image column name.
    pub column: String,
    /// Image reference as ingested; may be empty.
    pub reference: String,
    pub state: ReviewState,
}

impl ImageCell {
    /// Whether the row has no reference in this column.
    pub fn is_missing(&self) -> bool {
        self.reference.is_empty()
    }
}

/// A label/value pair shown on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    pub label: String,
    pub value: String,
}

/// Everything a renderer needs to draw one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Row origin index.
    pub origin: usize,
    pub images: Vec<ImageCell>,
    pub fields: Vec<CardField>,
}

impl Card {
    /// Build the card for row `origin`, or `None` if no such row exists.
    pub fn build(dataset: &Dataset, store: &ModerationStore, origin: usize) -> Option<Self> {
        let row = dataset.row(origin)?;

        let images = dataset
            .image_columns
            .iter()
            .map(|&column| {
                let key = CellKey::new(origin, column);
                ImageCell {
                    key,
                    column: dataset.schema.name(column).unwrap_or_default().to_string(),
                    reference: row.value(column).to_string(),
                    state: store.state(key).cloned().unwrap_or_default(),
                }
            })
            .collect();

        let fields = dataset
            .filterable_fields()
            .into_iter()
            .filter(|&p| !row.value(p).is_empty())
            .map(|p| CardField {
                label: dataset.schema.name(p).unwrap_or_default().to_string(),
                value: row.value(p).to_string(),
            })
            .collect();

        Some(Self {
            origin,
            images,
            fields,
        })
    }
}
