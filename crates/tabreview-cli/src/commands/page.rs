//! Page command - show one page of review cards.

use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use tabreview::{PageLink, ReviewState, Verdict};

use super::{apply_filters, open};

/// Buttons in the centered run of the page strip.
const MAX_PAGE_BUTTONS: usize = 5;

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    page: usize,
    page_size: Option<usize>,
    filters: Vec<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _) = open(&file, config)?;
    let session = engine.session_mut()?;

    if let Some(size) = page_size {
        session.set_page_size(size);
    }
    apply_filters(session, &filters)?;
    session.go_to_page(page);

    let info = session.page_info();
    let cards = session.current_page_cards();
    let links = session.page_links(MAX_PAGE_BUTTONS);

    if json_output {
        let out = serde_json::json!({
            "page": info,
            "links": links,
            "cards": cards,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {} of {}  ({} of {} rows)",
        "Page".cyan().bold(),
        info.page.to_string().white().bold(),
        info.total_pages,
        info.filtered_rows,
        info.total_rows
    );
    println!();

    if cards.is_empty() {
        println!("{}", "No rows match the current filters.".yellow());
    }

    for card in &cards {
        println!("{}", format!("Row {}", card.origin + 1).yellow().bold());
        for image in &card.images {
            let reference = if image.is_missing() {
                "(no image)".dimmed()
            } else {
                image.reference.normal()
            };
            println!(
                "  {:20} {} {}",
                image.column,
                verdict_badge(&image.state),
                reference
            );
            if !image.state.reason.is_empty() {
                println!("  {:20} reason: {}", "", image.state.reason.red());
            }
        }
        for field in &card.fields {
            println!("  {:20} {}", field.label.dimmed(), field.value);
        }
        println!();
    }

    println!("{}", render_links(&links));
    Ok(())
}

fn verdict_badge(state: &ReviewState) -> ColoredString {
    let badge = match state.verdict {
        Verdict::Pending => "[pending] ".normal(),
        Verdict::Approved => "[approved]".green(),
        Verdict::Rejected => "[rejected]".red(),
    };
    if state.is_divergent() {
        badge.underline()
    } else {
        badge
    }
}

fn render_links(links: &[PageLink]) -> String {
    links
        .iter()
        .map(|link| match link {
            PageLink::Page {
                number,
                current: true,
            } => format!("[{}]", number).cyan().bold().to_string(),
            PageLink::Page { number, .. } => number.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
