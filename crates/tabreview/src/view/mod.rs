//! Pagination and card views over the filtered rows.

mod card;
mod pagination;

pub use card::{Card, CardField, ImageCell};
pub use pagination::{DEFAULT_PAGE_SIZE, PageLink, Pager};
