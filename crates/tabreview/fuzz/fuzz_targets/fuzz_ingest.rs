//! Fuzz target for ingestion and export.
//!
//! Any text that ingests must survive a full review pass: paging, facet
//! statistics, selecting every image, and export.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabreview::ReviewEngine;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut engine = ReviewEngine::new();
    let Ok(report) = engine.ingest(text) else {
        return;
    };

    let Ok(session) = engine.session_mut() else {
        return;
    };
    assert_eq!(session.dataset().row_count(), report.rows_kept);

    let _ = session.all_field_statistics();
    session.set_page_size(3);
    while session.has_next_page() {
        let _ = session.select_all_on_page();
        session.next_page();
    }
    let _ = session.batch_approve(|_| true);

    if let Ok(payload) = engine.export() {
        assert_eq!(payload.rows, report.rows_kept);
    }
});
