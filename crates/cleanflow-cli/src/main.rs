//! CleanFlow CLI - quarantine CSV validation, annotation and editing.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Validate { file, legacy, json } => commands::validate::run(file, legacy, json),

        Commands::Stats { file, legacy, json } => commands::stats::run(file, legacy, json),

        Commands::Rules {
            rule_id,
            severity,
            json,
        } => commands::rules::run(rule_id, severity, json),

        Commands::Annotate {
            file,
            metadata,
            legacy,
            flagged_only,
            json,
        } => commands::annotate::run(file, metadata, legacy, flagged_only, json),

        Commands::Edit {
            file,
            set,
            output,
            legacy,
            save_drafts,
            json,
        } => commands::edit::run(file, set, output, legacy, save_drafts, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
