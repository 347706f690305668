//! Integration tests for the review workflow.

use std::io::Write;
use tempfile::NamedTempFile;

use tabreview::{
    BatchOutcome, CellKey, FacetValue, ReviewConfig, ReviewEngine, ReviewError, Verdict,
};

const PEOPLE: &str = "name,photo_url,age\n\
                      Alice,http://x/a.jpg,30\n\
                      Bob,,40\n";

/// Build a catalogue with two image columns and a few facetable fields.
fn catalogue(rows: usize) -> String {
    let mut text = String::from("sku,cover_image,category,detail_photo,status\n");
    for i in 0..rows {
        let category = ["shoes", "bags", "hats"][i % 3];
        let status = if i % 4 == 0 { "" } else { "live" };
        text.push_str(&format!(
            "SKU{i:03},https://cdn.example.com/c/{i}.jpg,{category},https://cdn.example.com/d/{i}.png,{status}\n"
        ));
    }
    text
}

fn loaded(text: &str) -> ReviewEngine {
    let mut engine = ReviewEngine::new();
    engine.ingest(text).expect("ingest failed");
    engine
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_image_column_scenario() {
    let mut engine = ReviewEngine::new();
    let report = engine.ingest(PEOPLE).unwrap();

    assert_eq!(report.image_columns, vec!["photo_url"]);
    assert_eq!(report.rows_kept, 2);

    let session = engine.session_mut().unwrap();
    let bob = session.card(1).unwrap();
    assert!(bob.images[0].is_missing());

    let alice = session.cell(0, "photo_url").unwrap();
    session.approve(alice).unwrap();

    let payload = engine.export().unwrap();
    let body = payload.text.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "name,photo_url,photo_url_review_result,age");
    assert_eq!(lines[1], "Alice,http://x/a.jpg,approved,30");
    assert_eq!(lines[2], "Bob,,rejected,40");
}

#[test]
fn test_facet_scenario() {
    let mut engine = loaded(PEOPLE);
    let session = engine.session_mut().unwrap();

    session.set_facet("age", [FacetValue::from("30")]).unwrap();
    session.apply_facets();
    assert_eq!(session.filtered_view(), &[0]);

    session.clear_facets();
    assert_eq!(session.filtered_view(), &[0, 1]);
}

#[test]
fn test_batch_approve_with_empty_selection() {
    let mut engine = loaded(PEOPLE);
    let session = engine.session_mut().unwrap();
    let before: Vec<_> = session.store().iter().map(|(k, s)| (*k, s.clone())).collect();

    let result = session.batch_approve(|_| true);
    assert!(matches!(result, Err(ReviewError::NothingSelected)));

    let after: Vec<_> = session.store().iter().map(|(k, s)| (*k, s.clone())).collect();
    assert_eq!(before, after);
}

// =============================================================================
// Multi-column review
// =============================================================================

#[test]
fn test_multiple_image_columns_reviewed_independently() {
    let mut engine = loaded(&catalogue(6));
    let session = engine.session_mut().unwrap();

    assert_eq!(
        session.dataset().image_column_names(),
        vec!["cover_image", "detail_photo"]
    );

    let cover = session.cell(2, "cover_image").unwrap();
    let detail = session.cell(2, "detail_photo").unwrap();
    session.approve(cover).unwrap();
    session.reject(detail, "wrong product").unwrap();

    assert_eq!(session.state(cover).unwrap().verdict, Verdict::Approved);
    let detail_state = session.state(detail).unwrap();
    assert_eq!(detail_state.verdict, Verdict::Rejected);
    assert_eq!(detail_state.reason, "wrong product");

    let payload = engine.export().unwrap();
    let row = payload.text.lines().nth(3).unwrap();
    assert_eq!(
        row,
        "SKU002,https://cdn.example.com/c/2.jpg,approved,hats,https://cdn.example.com/d/2.png,rejected,live"
    );
}

#[test]
fn test_select_page_then_batch_approve_after_filtering() {
    let mut engine = loaded(&catalogue(12));
    let session = engine.session_mut().unwrap();
    session.set_page_size(2);

    // Select the first page of shoes, then move the filter elsewhere.
    session.set_facet("category", [FacetValue::from("shoes")]).unwrap();
    session.apply_facets();
    assert_eq!(session.current_page_rows(), &[0, 3]);
    assert_eq!(session.select_all_on_page().unwrap(), 4);

    session.set_facet("category", [FacetValue::from("bags")]).unwrap();
    session.apply_facets();
    assert_eq!(session.page_info().page, 1);

    let outcome = session.batch_approve(|n| n == 4).unwrap();
    assert_eq!(outcome, BatchOutcome::Approved { count: 4 });

    let summary = session.summary();
    assert_eq!(summary.approved, 4);
    assert_eq!(summary.pending, 20);
}

#[test]
fn test_empty_marker_facet() {
    let mut engine = loaded(&catalogue(8));
    let session = engine.session_mut().unwrap();

    let stats = session.field_statistics("status").unwrap();
    assert_eq!(stats.values[0].value, FacetValue::from("live"));
    assert_eq!(stats.count_of(&FacetValue::Empty), 2);

    session.toggle_facet_value("status", FacetValue::Empty).unwrap();
    session.apply_facets();
    assert_eq!(session.filtered_view(), &[0, 4]);
}

#[test]
fn test_export_ignores_filters_and_paging() {
    let mut engine = loaded(&catalogue(10));
    {
        let session = engine.session_mut().unwrap();
        session.set_facet("category", [FacetValue::from("hats")]).unwrap();
        session.apply_facets();
        session.set_page_size(1);
        session.go_to_page(2);
    }

    let payload = engine.export().unwrap();
    assert_eq!(payload.rows, 10);
    assert_eq!(payload.text.lines().count(), 11);
}

#[test]
fn test_malformed_rows_are_dropped() {
    let text = "name,photo_url,age\n\
                Alice,http://x/a.jpg,30\n\
                Broken,http://x/b.jpg\n\
                Carol,\"http://x/c.jpg\",22,extra\n\
                Dan,http://x/d.jpg,51\n";
    let mut engine = ReviewEngine::new();
    let report = engine.ingest(text).unwrap();

    assert_eq!(report.rows_kept, 2);
    assert_eq!(report.rows_dropped, 2);
    let dataset = engine.session().unwrap().dataset();
    assert_eq!(dataset.get_by_name(1, "name"), Some("Dan"));
}

#[test]
fn test_spaced_quoted_value_survives_to_export() {
    let text = "name,photo_url,note\n\
                Bob,http://x/b.jpg,plain\n\
                Alice,http://x/a.jpg, \"x, y\"\n";
    let mut engine = ReviewEngine::new();
    let report = engine.ingest(text).unwrap();

    assert_eq!(report.rows_kept, 2);
    assert_eq!(report.rows_dropped, 0);

    let payload = engine.export().unwrap();
    assert!(payload.text.ends_with("Alice,http://x/a.jpg,rejected,\"x, y\"\n"));
}

#[test]
fn test_single_column_quoted_empty_is_kept() {
    let mut engine = ReviewEngine::new();
    let report = engine.ingest("photo\na.jpg\n\"\"\nb.jpg\n").unwrap();

    assert_eq!(report.rows_kept, 3);
    let session = engine.session().unwrap();
    assert!(session.card(1).unwrap().images[0].is_missing());
}

#[test]
fn test_reason_cleared_on_approve() {
    let mut engine = loaded(PEOPLE);
    let session = engine.session_mut().unwrap();
    let key = CellKey::new(0, 1);

    session.reject(key, "blurry").unwrap();
    assert!(!session.state(key).unwrap().selected);
    session.approve(key).unwrap();

    let state = session.state(key).unwrap();
    assert_eq!(state.verdict, Verdict::Approved);
    assert!(state.reason.is_empty());
    assert!(state.selected);
}

#[test]
fn test_divergence_is_reported() {
    let mut engine = loaded(PEOPLE);
    let session = engine.session_mut().unwrap();
    let key = CellKey::new(0, 1);

    session.approve(key).unwrap();
    session.toggle_selected(key).unwrap();
    assert_eq!(session.summary().divergent, 1);

    let payload = engine.export().unwrap();
    assert!(payload.text.contains("Alice,http://x/a.jpg,rejected,30"));
}

#[test]
fn test_file_round_trip_with_config() {
    let config = ReviewConfig::from_json(
        r#"{"export": {"verdict_suffix": "_verdict", "include_reasons": true, "byte_order_mark": false}}"#,
    )
    .unwrap();
    let mut engine = ReviewEngine::with_config(config);

    let mut input = NamedTempFile::new().expect("Failed to create temp file");
    input.write_all(PEOPLE.as_bytes()).expect("Failed to write temp file");
    let text = std::fs::read_to_string(input.path()).unwrap();

    engine.ingest(&text).unwrap();
    engine
        .session_mut()
        .unwrap()
        .reject(CellKey::new(1, 1), "no image")
        .unwrap();

    let payload = engine.export().unwrap();
    let out = NamedTempFile::new().unwrap();
    std::fs::write(out.path(), &payload.text).unwrap();
    let written = std::fs::read_to_string(out.path()).unwrap();

    assert_eq!(
        written,
        "name,photo_url,photo_url_verdict,photo_url_reject_reason,age\n\
         Alice,http://x/a.jpg,rejected,,30\n\
         Bob,,rejected,no image,40\n"
    );
    assert!(payload.file_name.starts_with("review-results_"));
    assert!(payload.file_name.ends_with(".csv"));
}
