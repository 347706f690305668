//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tabreview: approve or reject images referenced from tabular data
#[derive(Parser)]
#[command(name = "tabreview")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (parser, detection, export, page size)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a table and report rows, image columns, and detection details
    Inspect {
        /// Path to the data file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show value counts for filterable fields
    Facets {
        /// Path to the data file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only show this field
        #[arg(short, long)]
        field: Option<String>,

        /// Number of values to show per field
        #[arg(long, default_value = "10")]
        top: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one page of review cards
    Page {
        /// Path to the data file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page number (clamped into range)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (overrides the configured page size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Facet filter as FIELD=VALUE; repeat to combine. FIELD= matches empty values
        #[arg(short = 'F', long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review rows matching the filters and write the annotated table
    Export {
        /// Path to the data file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: ./review-results_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Facet filter as FIELD=VALUE; repeat to combine. FIELD= matches empty values
        #[arg(short = 'F', long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Select and approve every image in the filtered rows
        #[arg(long)]
        approve: bool,

        /// Reject images with a blank reference, using this reason
        #[arg(long, value_name = "REASON")]
        reject_missing: Option<String>,

        /// Write a rejection-reason column after each verdict column
        #[arg(long)]
        reasons: bool,

        /// Skip the confirmation prompt before batch approval
        #[arg(short, long)]
        yes: bool,
    },
}
