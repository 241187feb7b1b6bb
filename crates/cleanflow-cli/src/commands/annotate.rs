//! Annotate command - show cell provenance for a quarantine file.

use std::path::PathBuf;

use cleanflow::input::ROW_ID;
use cleanflow::provenance::Cell;
use cleanflow::rules::rule_meta;
use cleanflow::{CellStatus, DqStatus, QuarantineFile};
use colored::{ColoredString, Colorize};
use tracing::debug;

use super::{ensure_exists, parser_config};
use super::rules::severity_label;

pub fn run(
    file: PathBuf,
    metadata: Option<PathBuf>,
    legacy: bool,
    flagged_only: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let mut quarantine = QuarantineFile::load(&file, &parser_config(legacy))?;
    if let Some(path) = metadata {
        quarantine = quarantine.with_metadata_file(&path)?;
        debug!("attached metadata from {}", path.display());
    }

    let annotated = &quarantine.annotated;
    let summary = annotated.summary();
    let flagged = annotated.flagged_cells();

    if json_output {
        let value = serde_json::json!({
            "source": quarantine.source,
            "summary": summary,
            "cells": flagged,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Provenance for".cyan().bold(),
        quarantine.source.file.white()
    );
    println!();
    println!(
        "Rows:  {} total, {} clean, {} fixed, {} quarantined",
        summary.total_rows.to_string().white().bold(),
        summary.clean_rows,
        summary.fixed_rows.to_string().green(),
        summary.quarantined_rows.to_string().red()
    );
    println!(
        "Cells: {} fixed, {} quarantined",
        summary.fixed_cells.to_string().green(),
        summary.quarantined_cells.to_string().red()
    );
    if summary.conflicting_cells > 0 {
        println!(
            "       {} cells listed as both fixed and quarantined (shown as fixed)",
            summary.conflicting_cells.to_string().yellow()
        );
    }
    if let Some(severity) = summary.highest_severity {
        println!("Highest severity: {}", severity_label(severity));
    }
    println!();

    if !flagged_only {
        println!("{}", "Rows:".yellow().bold());
        for row in annotated.table().rows() {
            let Some(row_id) = row.get(ROW_ID) else { continue };
            println!("  {:>6}  {}", row_id, status_label(annotated.row_status(row_id)));
        }
        println!();
    }

    if flagged.is_empty() {
        println!("{}", "No flagged cells.".green());
        return Ok(());
    }

    println!("{}", "Flagged cells:".yellow().bold());
    for cell in &flagged {
        print_cell(cell);
    }

    Ok(())
}

fn print_cell(cell: &Cell) {
    let rule = rule_meta(cell.status.rule_id());
    println!(
        "  {} {}.{} = {:?}",
        status_label(cell.status.kind()),
        cell.row_id.white().bold(),
        cell.column.white().bold(),
        cell.value
    );
    match &cell.status {
        CellStatus::Fixed { original_value, .. } => {
            println!("      was {:?}", original_value);
        }
        CellStatus::Quarantined { error, .. } => {
            println!("      {}", error);
        }
        CellStatus::Clean => {}
    }
    if cell.status.rule_id().is_some() {
        println!(
            "      {} {} {}",
            rule.name.dimmed(),
            severity_label(rule.severity),
            rule.description.dimmed()
        );
    }
}

pub(crate) fn status_label(status: DqStatus) -> ColoredString {
    match status {
        DqStatus::Clean => status.label().normal(),
        DqStatus::Fixed => status.label().green(),
        DqStatus::Quarantined => status.label().red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_with_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("q.csv");
        let sidecar = dir.path().join("meta.json");
        std::fs::write(&input, "row_id,amount\n1,abc\n").unwrap();
        std::fs::write(&sidecar, r#"{"1": {"dq_errors": {"amount": "R5: not a number"}}}"#).unwrap();

        assert!(run(input.clone(), Some(sidecar), false, false, false).is_ok());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(run(input, Some(broken), false, true, true).is_err());
    }
}
