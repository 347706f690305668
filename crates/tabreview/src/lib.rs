//! Tabreview: a review engine for images referenced from tabular datasets.
//!
//! Load a delimited table, find the fields that hold image references, and
//! approve or reject each image independently while filtering and paging
//! through the rows. Export writes the original table back out with a
//! verdict column after every image column.
//!
//! # Core Principles
//!
//! - **Non-destructive**: Row data is never modified; review state lives beside it
//! - **Global selection**: Batch selection survives filtering and paging
//! - **Full export**: Export always covers every ingested row
//!
//! # Example
//!
//! ```
//! use tabreview::{FacetValue, ReviewEngine};
//!
//! let mut engine = ReviewEngine::new();
//! engine
//!     .ingest("name,photo_url,age\nAlice,http://x/a.jpg,30\nBob,,40\n")
//!     .unwrap();
//!
//! let session = engine.session_mut().unwrap();
//! let alice = session.cell(0, "photo_url").unwrap();
//! session.approve(alice).unwrap();
//!
//! session.set_facet("age", [FacetValue::from("30")]).unwrap();
//! session.apply_facets();
//! assert_eq!(session.filtered_view(), &[0]);
//!
//! let payload = engine.export().unwrap();
//! assert!(payload.text.contains("Alice,http://x/a.jpg,approved,30"));
//! ```

pub mod error;
pub mod export;
pub mod facet;
pub mod ingest;
pub mod moderation;
pub mod view;

mod engine;
mod session;

pub use crate::engine::{ReviewConfig, ReviewEngine};
pub use crate::session::{BatchOutcome, PageInfo, ReviewSession};
pub use error::{Result, ReviewError};
pub use export::{ExportConfig, ExportPayload, Exporter};
pub use facet::{FacetValue, FieldStatistics};
pub use ingest::{Dataset, IngestReport};
pub use moderation::{CellKey, ReviewState, ReviewSummary, Verdict};
pub use view::{Card, PageLink};
