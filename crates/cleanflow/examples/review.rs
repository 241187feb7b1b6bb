//! Example: Review a quarantine CSV file with CleanFlow.
//!
//! Usage:
//!   cargo run --example review -- <file_path>
//!
//! Prints the provenance summary and every flagged cell with its rule.

use std::env;

use cleanflow::{rule_meta, CellStatus, ParserConfig, QuarantineFile};

fn main() -> cleanflow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example review -- <file_path>");
        std::process::exit(1);
    }

    let quarantine = QuarantineFile::load(&args[1], &ParserConfig::default())?;
    let summary = quarantine.annotated.summary();

    println!("File: {} ({})", quarantine.source.file, quarantine.source.hash);
    println!(
        "Rows: {} ({} fixed, {} quarantined)",
        summary.total_rows, summary.fixed_rows, summary.quarantined_rows
    );
    println!();

    for cell in quarantine.annotated.flagged_cells() {
        let rule = rule_meta(cell.status.rule_id());
        match &cell.status {
            CellStatus::Fixed { original_value, .. } => println!(
                "[fixed] row {} {}: {:?} -> {:?} ({})",
                cell.row_id, cell.column, original_value, cell.value, rule.name
            ),
            CellStatus::Quarantined { error, .. } => println!(
                "[{}] row {} {}: {:?} {} ({})",
                rule.severity, cell.row_id, cell.column, cell.value, error, rule.name
            ),
            CellStatus::Clean => {}
        }
    }

    Ok(())
}
