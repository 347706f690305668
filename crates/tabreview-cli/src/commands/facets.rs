//! Facets command - value counts for filterable fields.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::open;

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    field: Option<String>,
    top: usize,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, report) = open(&file, config)?;
    let session = engine.session()?;

    let stats = match field {
        Some(ref name) => vec![session.field_statistics(name)?],
        None => session.all_field_statistics(),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows)",
        "Facets for".cyan().bold(),
        file.display().to_string().white(),
        report.rows_kept
    );

    for field_stats in &stats {
        println!();
        println!(
            "{} {}",
            field_stats.field.yellow().bold(),
            format!("({} distinct)", field_stats.distinct()).dimmed()
        );

        let width = field_stats
            .values
            .first()
            .map(|v| v.count.to_string().len())
            .unwrap_or(1);
        for value_count in field_stats.values.iter().take(top) {
            let label = if value_count.value.is_empty() {
                value_count.value.to_string().dimmed()
            } else {
                value_count.value.to_string().normal()
            };
            println!("  {:>width$}  {}", value_count.count, label, width = width);
        }

        let hidden = field_stats.distinct().saturating_sub(top);
        if hidden > 0 {
            println!("  {}", format!("... {} more", hidden).dimmed());
        }
    }

    Ok(())
}
