//! Inspect command - load a table and report what was found.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::{load_config, read_text};
use tabreview::ReviewEngine;

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_text(&file)?;
    let mut engine = ReviewEngine::with_config(load_config(config)?);

    // Assess before ingesting so a table without image columns still gets a report.
    let assessments = engine.assess_columns(&text)?;
    let report = engine.ingest(&text);

    if json_output {
        let status = serde_json::json!({
            "file": file.display().to_string(),
            "loaded": report.is_ok(),
            "report": report.as_ref().ok(),
            "error": report.as_ref().err().map(|e| e.to_string()),
            "source": engine.session().ok().map(|s| &s.dataset().source),
            "columns": assessments,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Inspecting".cyan().bold(),
        file.display().to_string().white()
    );
    println!();

    println!("{}", "Columns:".yellow().bold());
    for a in &assessments {
        let marker = if a.qualifies {
            "image".green().bold()
        } else if a.reserved {
            "reserved".dimmed()
        } else {
            "field".normal()
        };
        println!(
            "  {:24} {:10} name match: {:5} sampled: {:3} matched: {:3}",
            a.name, marker, a.name_match, a.sampled, a.matched
        );
    }
    println!();

    let report = report?;
    println!("{}", "Dataset:".yellow().bold());
    println!("  Rows:           {}", report.rows_kept.to_string().white());
    if report.rows_dropped > 0 {
        println!(
            "  Dropped rows:   {}",
            report.rows_dropped.to_string().red()
        );
    }
    println!("  Image columns:  {}", report.image_columns.join(", ").green());
    println!("  Facet fields:   {}", report.filterable_fields.join(", "));

    let source = &engine.session()?.dataset().source;
    println!("  Hash:           {}", source.hash.dimmed());

    Ok(())
}
