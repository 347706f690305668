//! Example: Load a table, review a few images, and print the export.
//!
//! Usage:
//!   cargo run --example review -- <file_path>

use std::env;
use std::fs;

use tabreview::{FacetValue, ReviewEngine, ReviewError};

fn main() -> tabreview::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example review -- <file_path>");
        std::process::exit(1);
    }

    let path = &args[1];
    let text = fs::read_to_string(path).map_err(|source| ReviewError::Io {
        path: path.into(),
        source,
    })?;

    let mut engine = ReviewEngine::new();
    let report = engine.ingest(&text)?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Review: {}", path);
    println!("{}", separator);
    println!("  Rows kept:      {}", report.rows_kept);
    println!("  Rows dropped:   {}", report.rows_dropped);
    println!("  Image columns:  {}", report.image_columns.join(", "));
    println!();

    let session = engine.session_mut()?;

    println!("## Facets");
    for stats in session.all_field_statistics() {
        let top: Vec<String> = stats
            .values
            .iter()
            .take(3)
            .map(|v| format!("{} ({})", v.value, v.count))
            .collect();
        println!("  {:20} {}", stats.field, top.join(", "));
    }
    println!();

    // Approve every image on the first page, reject anything with a blank reference.
    println!("## Page 1");
    for card in session.current_page_cards() {
        for image in &card.images {
            if image.is_missing() {
                session.reject(image.key, "missing reference")?;
            } else {
                session.approve(image.key)?;
            }
        }
    }

    if let Some(first) = session.all_field_statistics().first() {
        if let Some(top) = first.values.first() {
            let field = first.field.clone();
            let value: FacetValue = top.value.clone();
            session.set_facet(&field, [value])?;
            session.apply_facets();
            println!(
                "  Filter {} -> {} of {} rows",
                field,
                session.page_info().filtered_rows,
                session.page_info().total_rows
            );
        }
    }

    let summary = session.summary();
    println!(
        "  Approved {}  Rejected {}  Pending {}",
        summary.approved, summary.rejected, summary.pending
    );
    println!();

    let payload = engine.export()?;
    println!("## Export ({})", payload.file_name);
    for line in payload.text.trim_start_matches('\u{feff}').lines().take(5) {
        println!("  {}", line);
    }

    Ok(())
}
