//! Fuzz target for image column detection.
//!
//! Assessment must never panic, and its verdicts must agree with `detect`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabreview::ingest::{ImageColumnDetector, Parser};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(table) = Parser::new().parse_str(text) else {
        return;
    };

    let detector = ImageColumnDetector::new();
    let assessed: Vec<usize> = detector
        .assess(&table.schema, &table.rows)
        .into_iter()
        .filter(|a| a.qualifies)
        .map(|a| a.position)
        .collect();
    assert_eq!(assessed, detector.detect(&table.schema, &table.rows));
});
