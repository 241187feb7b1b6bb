//! Edit command - apply cell edits through an edit session and export.

use std::path::PathBuf;

use cleanflow::editor::{drafts_path, DraftSnapshot};
use cleanflow::{write_csv, CellEdit, Deactivation, EditSession, QuarantineFile};
use colored::Colorize;
use tracing::{info, warn};

use super::annotate::status_label;
use super::{ensure_exists, parser_config};
use crate::cli::CellAssignment;

pub fn run(
    file: PathBuf,
    assignments: Vec<CellAssignment>,
    output: Option<PathBuf>,
    legacy: bool,
    save_drafts: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let QuarantineFile { source, annotated } = QuarantineFile::load(&file, &parser_config(legacy))?;
    let mut session = EditSession::open(annotated);

    let drafts = drafts_path(&file);
    if save_drafts && drafts.exists() {
        let snapshot = DraftSnapshot::load(&drafts)?;
        match snapshot.source_hash.as_deref() {
            Some(hash) if source.matches_hash(hash) => {
                let restored = session.restore(&snapshot)?;
                info!(restored, "resumed drafts from {}", drafts.display());
            }
            _ => warn!("ignoring drafts made against another version of {}", file.display()),
        }
    }

    for assignment in &assignments {
        session.activate(&assignment.row_id, &assignment.column)?;
        session.input(assignment.value.as_str())?;
        session.deactivate(Deactivation::Enter);
    }

    let edits = session.diff();
    let mut written = None;

    if save_drafts {
        session.snapshot(Some(source.hash)).save(&drafts)?;
        info!(edits = edits.len(), "saved drafts to {}", drafts.display());
        written = Some(drafts);
    } else if let Some(path) = output {
        let commit = session.commit()?;
        write_csv(&path, commit.table.rows())?;
        info!(edits = commit.edits.len(), "wrote {}", path.display());
        written = Some(path);
    }

    if json_output {
        let value = serde_json::json!({
            "edits": edits,
            "written": written.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if edits.is_empty() {
        println!("{}", "No changes: every value matches the file.".yellow());
    } else {
        println!(
            "{} {} edited cells",
            "Diff:".cyan().bold(),
            edits.len().to_string().white().bold()
        );
        for edit in &edits {
            print_edit(&session, edit);
        }
    }

    println!();
    match (written, save_drafts) {
        (Some(path), true) => println!("Drafts saved to {}", path.display().to_string().cyan()),
        (Some(path), false) => println!("Wrote {}", path.display().to_string().cyan()),
        (None, _) => println!(
            "Nothing written. Pass {} to export the edited CSV.",
            "-o <OUT>".cyan().bold()
        ),
    }

    Ok(())
}

fn print_edit(session: &EditSession, edit: &CellEdit) {
    let status = session.baseline().status(&edit.row_id, &edit.column);
    println!(
        "  {}.{} [{}]",
        edit.row_id.white().bold(),
        edit.column.white().bold(),
        status_label(status.kind())
    );
    println!("    {} {:?}", "-".red(), edit.before);
    println!("    {} {}", "+".yellow(), format!("{:?}", edit.after).yellow());
}
