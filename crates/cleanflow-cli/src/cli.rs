//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cleanflow::Severity;

/// CleanFlow: inspect and correct quarantined CSV data
#[derive(Parser)]
#[command(name = "cleanflow")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a CSV file for structural problems
    Validate {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Use the line-based tokenizer
        #[arg(long)]
        legacy: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show row, column and empty-cell counts
    Stats {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Use the line-based tokenizer
        #[arg(long)]
        legacy: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List data-quality rules or look one up
    Rules {
        /// Rule identifier (e.g. R5)
        #[arg(value_name = "RULE_ID")]
        rule_id: Option<String>,

        /// Only list rules of this severity (critical, warning, info)
        #[arg(short, long)]
        severity: Option<Severity>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the provenance of every flagged cell
    Annotate {
        /// Path to the quarantine CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file mapping row_id to dq_* metadata
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Use the line-based tokenizer
        #[arg(long)]
        legacy: bool,

        /// Print only the summary and flagged cells
        #[arg(long)]
        flagged_only: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit cells and export the corrected CSV
    Edit {
        /// Path to the quarantine CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Cell edit as ROW_ID:COLUMN=VALUE (repeatable)
        #[arg(long, value_name = "ROW_ID:COLUMN=VALUE", required = true)]
        set: Vec<CellAssignment>,

        /// Output path for the edited CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the line-based tokenizer
        #[arg(long)]
        legacy: bool,

        /// Save the edits as drafts beside the input instead of exporting
        #[arg(long, conflicts_with = "output")]
        save_drafts: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A single `ROW_ID:COLUMN=VALUE` edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellAssignment {
    pub row_id: String,
    pub column: String,
    pub value: String,
}

impl std::str::FromStr for CellAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid edit: {}. Use ROW_ID:COLUMN=VALUE.", s);

        let (target, value) = s.split_once('=').ok_or_else(invalid)?;
        let (row_id, column) = target.split_once(':').ok_or_else(invalid)?;
        if row_id.is_empty() || column.is_empty() {
            return Err(invalid());
        }

        Ok(CellAssignment {
            row_id: row_id.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let a: CellAssignment = "17:amount=1,200.00".parse().unwrap();
        assert_eq!(a.row_id, "17");
        assert_eq!(a.column, "amount");
        assert_eq!(a.value, "1,200.00");
    }

    #[test]
    fn test_assignment_value_may_contain_separators() {
        let a: CellAssignment = "3:memo=a:b=c".parse().unwrap();
        assert_eq!(a.column, "memo");
        assert_eq!(a.value, "a:b=c");

        let empty: CellAssignment = "3:memo=".parse().unwrap();
        assert_eq!(empty.value, "");
    }

    #[test]
    fn test_invalid_assignment() {
        assert!("amount=5".parse::<CellAssignment>().is_err());
        assert!(":amount=5".parse::<CellAssignment>().is_err());
        assert!("1:amount".parse::<CellAssignment>().is_err());
    }

    #[test]
    fn test_cli_parses_edit() {
        let cli = Cli::try_parse_from([
            "cleanflow", "edit", "q.csv", "--set", "1:a=x", "--set", "2:b=y", "-o", "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit { set, output, .. } => {
                assert_eq!(set.len(), 2);
                assert_eq!(output, Some(PathBuf::from("out.csv")));
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_cli_parses_severity() {
        let cli = Cli::try_parse_from(["cleanflow", "rules", "--severity", "critical"]).unwrap();
        match cli.command {
            Commands::Rules { severity, .. } => assert_eq!(severity, Some(Severity::Critical)),
            _ => panic!("expected rules"),
        }
    }
}
