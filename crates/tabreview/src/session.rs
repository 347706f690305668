//! Review session: one loaded dataset with its verdicts, facets, and page pointer.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ReviewError, Result};
use crate::facet::{FacetSelections, FacetValue, FieldStatistics};
use crate::ingest::Dataset;
use crate::moderation::{CellKey, ModerationStore, ReviewState, ReviewSummary};
use crate::view::{Card, PageLink, Pager};

/// Result of a batch approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// The reviewer confirmed and this many images were approved.
    Approved { count: usize },
    /// The reviewer declined; nothing changed.
    Cancelled { pending: usize },
}

/// Page position and view sizes for a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Rows in the filtered view.
    pub filtered_rows: usize,
    /// Rows in the full dataset.
    pub total_rows: usize,
}

/// State for one loaded dataset.
///
/// Holds the full dataset, the moderation store, the facet selections, the
/// filtered view derived from them, and the page pointer over that view.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    dataset: Dataset,
    store: ModerationStore,
    facets: FacetSelections,
    view: Vec<usize>,
    pager: Pager,
}

impl ReviewSession {
    /// Start a session over `dataset` with every image pending and no facets.
    pub fn new(dataset: Dataset, page_size: usize) -> Self {
        let store = ModerationStore::for_dataset(&dataset);
        let facets = FacetSelections::for_dataset(&dataset);
        let view = (0..dataset.row_count()).collect();

        info!(
            rows = dataset.row_count(),
            image_columns = dataset.image_columns.len(),
            "activated dataset"
        );

        Self {
            dataset,
            store,
            facets,
            view,
            pager: Pager::new(page_size),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn store(&self) -> &ModerationStore {
        &self.store
    }

    pub fn facets(&self) -> &FacetSelections {
        &self.facets
    }

    // =========================================================================
    // Field lookup
    // =========================================================================

    /// Schema position of a filterable field.
    pub fn facet_field(&self, name: &str) -> Result<usize> {
        self.dataset
            .schema
            .position(name)
            .filter(|p| self.facets.is_filterable(*p))
            .ok_or_else(|| ReviewError::UnknownField(name.to_string()))
    }

    /// Schema position of an image column.
    pub fn image_column(&self, name: &str) -> Result<usize> {
        self.dataset
            .schema
            .position(name)
            .filter(|p| self.dataset.is_image_column(*p))
            .ok_or_else(|| ReviewError::UnknownField(name.to_string()))
    }

    /// Key for a row and an image column named `column`.
    pub fn cell(&self, row: usize, column: &str) -> Result<CellKey> {
        let key = CellKey::new(row, self.image_column(column)?);
        self.store
            .state(key)
            .map(|_| key)
            .ok_or(ReviewError::UnknownCell {
                row: key.row,
                column: key.column,
            })
    }

    // =========================================================================
    // Moderation
    // =========================================================================

    pub fn state(&self, key: CellKey) -> Option<&ReviewState> {
        self.store.state(key)
    }

    pub fn approve(&mut self, key: CellKey) -> Result<()> {
        self.store.approve(key)
    }

    pub fn reject(&mut self, key: CellKey, reason: &str) -> Result<()> {
        self.store.reject(key, reason)
    }

    pub fn toggle_selected(&mut self, key: CellKey) -> Result<bool> {
        self.store.toggle_selected(key)
    }

    /// Approve every selected image in the dataset, on any page.
    ///
    /// `confirm` receives the number of selected images and decides whether to
    /// go ahead. With nothing selected it is never called and
    /// [`ReviewError::NothingSelected`] is returned.
    pub fn batch_approve(&mut self, confirm: impl FnOnce(usize) -> bool) -> Result<BatchOutcome> {
        let selected = self.store.selected_cells();
        if selected.is_empty() {
            return Err(ReviewError::NothingSelected);
        }

        if !confirm(selected.len()) {
            debug!(pending = selected.len(), "batch approval cancelled");
            return Ok(BatchOutcome::Cancelled {
                pending: selected.len(),
            });
        }

        let count = self.store.approve_all(&selected)?;
        info!(count, "batch approved");
        Ok(BatchOutcome::Approved { count })
    }

    /// Number of selected images across the dataset.
    pub fn selected_count(&self) -> usize {
        self.store.selected_cells().len()
    }

    /// Select every image of every row on the current page. Returns how many
    /// images that covers.
    pub fn select_all_on_page(&mut self) -> Result<usize> {
        self.set_page_selection(true)
    }

    /// Deselect every image of every row on the current page.
    pub fn clear_selection_on_page(&mut self) -> Result<usize> {
        self.set_page_selection(false)
    }

    fn set_page_selection(&mut self, selected: bool) -> Result<usize> {
        let keys: Vec<CellKey> = self
            .pager
            .slice(&self.view)
            .iter()
            .flat_map(|&row| {
                self.dataset
                    .image_columns
                    .iter()
                    .map(move |&column| CellKey::new(row, column))
            })
            .collect();

        self.store.set_selected_all(&keys, selected)
    }

    /// Verdict counts over the full dataset.
    pub fn summary(&self) -> ReviewSummary {
        self.store.summary()
    }

    // =========================================================================
    // Facets
    // =========================================================================

    /// Value counts for one filterable field over the full dataset.
    pub fn field_statistics(&self, field: &str) -> Result<FieldStatistics> {
        let position = self.facet_field(field)?;
        Ok(FieldStatistics::compute(&self.dataset, position))
    }

    /// Value counts for every filterable field, in header order.
    pub fn all_field_statistics(&self) -> Vec<FieldStatistics> {
        self.facets
            .fields()
            .map(|p| FieldStatistics::compute(&self.dataset, p))
            .collect()
    }

    /// Replace one field's selection. Takes effect on [`apply_facets`](Self::apply_facets).
    pub fn set_facet(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = FacetValue>,
    ) -> Result<()> {
        let position = self.facet_field(field)?;
        self.facets.set(position, values)
    }

    /// Add or remove one value from a field's selection. Returns whether it is now included.
    pub fn toggle_facet_value(&mut self, field: &str, value: FacetValue) -> Result<bool> {
        let position = self.facet_field(field)?;
        self.facets.toggle(position, value)
    }

    /// Reset one field's selection to unrestricted.
    pub fn clear_facet(&mut self, field: &str) -> Result<()> {
        let position = self.facet_field(field)?;
        self.facets.clear_field(position)
    }

    /// Recompute the filtered view from the current selections and return to page 1.
    pub fn apply_facets(&mut self) {
        self.view = self.facets.apply(&self.dataset);
        self.pager.reset();
    }

    /// Clear every selection, recompute the view, and return to page 1.
    pub fn clear_facets(&mut self) {
        self.facets.clear();
        self.apply_facets();
    }

    /// Origin indexes of the rows in the filtered view.
    pub fn filtered_view(&self) -> &[usize] {
        &self.view
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pager.set_page_size(page_size);
    }

    /// Move to `page`, clamped into range. Returns the page landed on.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.pager.go_to(page, self.view.len())
    }

    pub fn next_page(&mut self) -> usize {
        self.pager.next(self.view.len())
    }

    pub fn prev_page(&mut self) -> usize {
        self.pager.prev(self.view.len())
    }

    /// Origin indexes of the rows on the current page.
    pub fn current_page_rows(&self) -> &[usize] {
        self.pager.slice(&self.view)
    }

    /// Cards for the rows on the current page.
    pub fn current_page_cards(&self) -> Vec<Card> {
        self.current_page_rows()
            .iter()
            .filter_map(|&origin| Card::build(&self.dataset, &self.store, origin))
            .collect()
    }

    /// Card for any row in the dataset.
    pub fn card(&self, origin: usize) -> Option<Card> {
        Card::build(&self.dataset, &self.store, origin)
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.pager.page(),
            total_pages: self.pager.total_pages(self.view.len()),
            page_size: self.pager.page_size(),
            filtered_rows: self.view.len(),
            total_rows: self.dataset.row_count(),
        }
    }

    pub fn page_links(&self, max_buttons: usize) -> Vec<PageLink> {
        self.pager.page_links(self.view.len(), max_buttons)
    }

    pub fn has_next_page(&self) -> bool {
        self.pager.has_next(self.view.len())
    }

    pub fn has_prev_page(&self) -> bool {
        self.pager.has_prev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{ImageColumnDetector, Parser, ingest};
    use crate::moderation::Verdict;

    fn session(text: &str, page_size: usize) -> ReviewSession {
        let (dataset, _) = ingest(text, &Parser::new(), &ImageColumnDetector::new()).unwrap();
        ReviewSession::new(dataset, page_size)
    }

    fn gallery(rows: usize) -> String {
        let mut text = String::from("id,image_url,group\n");
        for i in 0..rows {
            text.push_str(&format!("{i},https://img/{i}.png,g{}\n", i % 3));
        }
        text
    }

    #[test]
    fn test_batch_approve_with_nothing_selected() {
        let mut s = session(&gallery(4), 2);
        let before = s.summary();
        let mut asked = false;

        let result = s.batch_approve(|_| {
            asked = true;
            true
        });

        assert!(matches!(result, Err(ReviewError::NothingSelected)));
        assert!(!asked);
        assert_eq!(s.summary(), before);
    }

    #[test]
    fn test_batch_approve_spans_pages() {
        let mut s = session(&gallery(6), 2);
        s.select_all_on_page().unwrap();
        s.go_to_page(3);
        s.select_all_on_page().unwrap();
        s.go_to_page(2);

        let outcome = s.batch_approve(|n| n == 4).unwrap();
        assert_eq!(outcome, BatchOutcome::Approved { count: 4 });

        let approved: Vec<usize> = s
            .store()
            .iter()
            .filter(|(_, st)| st.verdict == Verdict::Approved)
            .map(|(k, _)| k.row)
            .collect();
        assert_eq!(approved, vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_batch_approve_cancelled() {
        let mut s = session(&gallery(3), 10);
        s.toggle_selected(CellKey::new(1, 1)).unwrap();

        let outcome = s.batch_approve(|_| false).unwrap();
        assert_eq!(outcome, BatchOutcome::Cancelled { pending: 1 });
        assert_eq!(s.summary().approved, 0);
        assert_eq!(s.selected_count(), 1);
    }

    #[test]
    fn test_facets_reset_page_but_keep_selection() {
        let mut s = session(&gallery(9), 2);
        s.go_to_page(2);
        s.select_all_on_page().unwrap();
        assert_eq!(s.selected_count(), 2);

        s.set_facet("group", [FacetValue::from("g0")]).unwrap();
        s.apply_facets();

        assert_eq!(s.page_info().page, 1);
        assert_eq!(s.filtered_view(), &[0, 3, 6]);
        assert_eq!(s.selected_count(), 2);

        s.go_to_page(2);
        s.clear_facets();
        assert_eq!(s.page_info().page, 1);
        assert_eq!(s.filtered_view().len(), 9);
    }

    #[test]
    fn test_facet_on_image_column_is_rejected() {
        let mut s = session(&gallery(2), 2);
        assert!(matches!(
            s.set_facet("image_url", [FacetValue::Empty]),
            Err(ReviewError::UnknownField(_))
        ));
        assert!(s.field_statistics("image_url").is_err());
        assert!(s.field_statistics("nope").is_err());
    }

    #[test]
    fn test_statistics_ignore_filters() {
        let mut s = session(&gallery(6), 10);
        s.set_facet("group", [FacetValue::from("g1")]).unwrap();
        s.apply_facets();

        let stats = s.field_statistics("group").unwrap();
        assert_eq!(stats.distinct(), 3);
        assert_eq!(stats.count_of(&FacetValue::from("g0")), 2);
        assert_eq!(s.all_field_statistics().len(), 2);
    }

    #[test]
    fn test_page_info_and_cards() {
        let mut s = session(&gallery(5), 2);
        assert_eq!(s.go_to_page(10), 3);
        assert_eq!(s.current_page_rows(), &[4]);

        let info = s.page_info();
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.filtered_rows, 5);
        assert!(!s.has_next_page());
        assert!(s.has_prev_page());

        let cards = s.current_page_cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].images[0].reference, "https://img/4.png");

        s.set_page_size(10);
        assert_eq!(s.page_info().page, 1);
        assert_eq!(s.current_page_rows().len(), 5);
    }

    #[test]
    fn test_clear_selection_on_page() {
        let mut s = session(&gallery(4), 2);
        s.select_all_on_page().unwrap();
        s.next_page();
        s.select_all_on_page().unwrap();
        s.prev_page();
        assert_eq!(s.clear_selection_on_page().unwrap(), 2);
        assert_eq!(s.selected_count(), 2);
    }

    #[test]
    fn test_cell_lookup_by_name() {
        let s = session(&gallery(2), 2);
        assert_eq!(s.cell(1, "image_url").unwrap(), CellKey::new(1, 1));
        assert!(s.cell(5, "image_url").is_err());
        assert!(s.cell(0, "group").is_err());
    }
}
