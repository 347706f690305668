//! CLI command implementations.

pub mod export;
pub mod facets;
pub mod inspect;
pub mod page;

use std::fs;
use std::path::Path;

use tabreview::{FacetValue, IngestReport, ReviewConfig, ReviewEngine, ReviewError, ReviewSession};
use tracing::debug;

/// Read a text file, attaching its path to any failure.
pub fn read_text(path: &Path) -> Result<String, ReviewError> {
    fs::read_to_string(path).map_err(|source| ReviewError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the configuration file if one was given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ReviewConfig, ReviewError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            ReviewConfig::from_json(&read_text(path)?)
        }
        None => Ok(ReviewConfig::default()),
    }
}

/// Build an engine from the configuration and ingest `file` into it.
pub fn open(
    file: &Path,
    config: Option<&Path>,
) -> Result<(ReviewEngine, IngestReport), ReviewError> {
    let mut engine = ReviewEngine::with_config(load_config(config)?);
    let text = read_text(file)?;
    let report = engine.ingest(&text)?;
    Ok((engine, report))
}

/// Split `FIELD=VALUE`. An empty value selects rows where the field is empty.
pub fn parse_filter(spec: &str) -> Result<(String, FacetValue), String> {
    let (field, value) = spec
        .split_once('=')
        .ok_or_else(|| format!("Invalid filter '{}': expected FIELD=VALUE", spec))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("Invalid filter '{}': missing field name", spec));
    }
    Ok((field.to_string(), FacetValue::from_cell(value.trim())))
}

/// Set one facet per named field (values for the same field combine) and
/// recompute the filtered view.
pub fn apply_filters(
    session: &mut ReviewSession,
    filters: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut grouped: Vec<(String, Vec<FacetValue>)> = Vec::new();
    for spec in filters {
        let (field, value) = parse_filter(spec)?;
        match grouped.iter_mut().find(|(f, _)| *f == field) {
            Some((_, values)) => values.push(value),
            None => grouped.push((field, vec![value])),
        }
    }

    for (field, values) in grouped {
        session.set_facet(&field, values)?;
    }
    session.apply_facets();
    Ok(())
}
