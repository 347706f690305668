//! Tabreview CLI - image review over tabular data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Inspect { file, json } => commands::inspect::run(file, config, json),

        Commands::Facets {
            file,
            field,
            top,
            json,
        } => commands::facets::run(file, config, field, top, json),

        Commands::Page {
            file,
            page,
            page_size,
            filters,
            json,
        } => commands::page::run(file, config, page, page_size, filters, json),

        Commands::Export {
            file,
            output,
            filters,
            approve,
            reject_missing,
            reasons,
            yes,
        } => commands::export::run(
            file,
            config,
            commands::export::ExportOptions {
                output,
                filters,
                approve,
                reject_missing,
                reasons,
                yes,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `--verbose` raises the library to debug, otherwise `RUST_LOG` applies.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if verbose {
        EnvFilter::new("tabreview=debug,tabreview_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabreview=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
