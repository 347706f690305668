//! Moderation store: per-image verdicts, rejection reasons, and selection flags.
//!
//! State lives in a map keyed by (row origin index, image column position) and
//! is never mixed into the row's own field data.
//!
//! # Usage
//!
//! ```
//! use tabreview::moderation::{CellKey, ModerationStore, Verdict};
//! use tabreview::ingest::{ingest, ImageColumnDetector, Parser};
//!
//! let text = "name,photo_url\nAlice,http://x/a.jpg\n";
//! let (dataset, _) = ingest(text, &Parser::new(), &ImageColumnDetector::new()).unwrap();
//! let mut store = ModerationStore::for_dataset(&dataset);
//!
//! let key = CellKey::new(0, 1);
//! store.reject(key, "blurry").unwrap();
//! assert_eq!(store.state(key).unwrap().verdict, Verdict::Rejected);
//! ```

mod store;
mod verdict;

pub use store::{ModerationStore, ReviewSummary};
pub use verdict::{CellKey, ReviewState, Verdict};
