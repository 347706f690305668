//! Export command - headless review pass and annotated table output.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use tabreview::{BatchOutcome, ReviewError, ReviewSession, Verdict};
use tracing::info;

use super::{apply_filters, open};

/// Options for a headless review pass.
pub struct ExportOptions {
    pub output: Option<PathBuf>,
    pub filters: Vec<String>,
    pub approve: bool,
    pub reject_missing: Option<String>,
    pub reasons: bool,
    pub yes: bool,
}

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    options: ExportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, report) = open(&file, config)?;
    let session = engine.session_mut()?;
    apply_filters(session, &options.filters)?;

    if let Some(reason) = &options.reject_missing {
        let rejected = reject_missing(session, reason)?;
        println!("Rejected {} images with no reference", rejected.to_string().red());
    }

    if options.approve {
        select_filtered(session)?;
        let yes = options.yes;
        match session.batch_approve(|count| yes || confirm(count)) {
            Ok(BatchOutcome::Approved { count }) => {
                println!("Approved {} images", count.to_string().green());
            }
            Ok(BatchOutcome::Cancelled { pending }) => {
                println!("{}", format!("Cancelled; {} images left selected", pending).yellow());
            }
            Err(ReviewError::NothingSelected) => {
                println!("{}", "No images to approve in the filtered rows.".yellow());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let summary = session.summary();
    if summary.divergent > 0 {
        println!(
            "{}",
            format!(
                "{} images export with a verdict different from the one recorded",
                summary.divergent
            )
            .yellow()
        );
    }

    let mut export_config = engine.config().export.clone();
    export_config.include_reasons |= options.reasons;
    let exporter = tabreview::Exporter::with_config(export_config);
    let session = engine.session()?;
    let payload = exporter.export(session.dataset(), session.store())?;

    let output = options
        .output
        .unwrap_or_else(|| PathBuf::from(&payload.file_name));
    fs::write(&output, &payload.text).map_err(|source| ReviewError::Io {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), rows = payload.rows, "wrote export");

    println!(
        "{} {} rows to {}",
        "Exported".green().bold(),
        report.rows_kept,
        output.display().to_string().white()
    );
    println!(
        "  Approved: {}  Rejected: {}  Pending: {}",
        summary.approved.to_string().green(),
        summary.rejected.to_string().red(),
        summary.pending
    );

    Ok(())
}

/// Select every image in the filtered view that has not been rejected.
fn select_filtered(session: &mut ReviewSession) -> Result<usize, ReviewError> {
    let keys: Vec<_> = session
        .filtered_view()
        .iter()
        .filter_map(|&origin| session.card(origin))
        .flat_map(|card| card.images)
        .filter(|image| image.state.verdict != Verdict::Rejected)
        .map(|image| (image.key, image.state.selected))
        .collect();

    for (key, selected) in &keys {
        if !selected {
            session.toggle_selected(*key)?;
        }
    }
    Ok(keys.len())
}

/// Reject every blank image reference in the filtered view.
fn reject_missing(session: &mut ReviewSession, reason: &str) -> Result<usize, ReviewError> {
    let keys: Vec<_> = session
        .filtered_view()
        .iter()
        .filter_map(|&origin| session.card(origin))
        .flat_map(|card| card.images)
        .filter(|image| image.is_missing())
        .map(|image| image.key)
        .collect();

    for key in &keys {
        session.reject(*key, reason)?;
    }
    Ok(keys.len())
}

fn confirm(count: usize) -> bool {
    print!("Approve {} selected images? [y/N] ", count);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
