//! CleanFlow: quarantine CSV parsing and cell-level data-quality annotation.
//!
//! Quarantined rows come back from the data-quality engine as CSV plus
//! per-row metadata describing which cells a rule fixed or rejected. This
//! crate reads that CSV, tracks the provenance of every cell, lets a
//! reviewer edit cells, and writes the corrected CSV back out.
//!
//! # Core Principles
//!
//! - **Lenient input**: tokenizers never fail; malformed CSV degrades to best-effort data
//! - **Findings, not errors**: validation returns every structural problem at once
//! - **Full provenance**: each cell is clean, fixed (with original value and rule) or quarantined
//!
//! # Example
//!
//! ```
//! use cleanflow::{parse_csv, rows_to_csv, rule_meta, validate_csv, Severity};
//!
//! let text = "name,amount\n\"Smith, J\",10\n";
//! assert!(validate_csv(text).valid);
//!
//! let table = parse_csv(text);
//! assert_eq!(table.columns(), ["row_id", "name", "amount"]);
//! assert_eq!(table.get("1", "name"), Some("Smith, J"));
//!
//! assert_eq!(rows_to_csv(table.rows()), "row_id,name,amount\n1,\"Smith, J\",10");
//! assert_eq!(rule_meta(Some("r1")).severity, Severity::Critical);
//! ```

pub mod editor;
pub mod error;
pub mod input;
pub mod output;
pub mod provenance;
pub mod rules;
pub mod validation;

pub use editor::{CellEdit, CellView, Deactivation, EditSession, EditorConfig};
pub use error::{CleanflowError, Result};
pub use input::{
    parse_advanced_csv, parse_csv, parse_legacy_csv, split_csv_line, ParseStrategy, Parser,
    ParserConfig, Row, SourceMetadata, Table,
};
pub use output::{rows_to_csv, write_csv};
pub use provenance::{
    AnnotatedTable, CellStatus, DqChange, DqMetadata, DqStatus, QuarantineFile, QuarantineSummary,
};
pub use rules::{rule_meta, RuleMeta, Severity};
pub use validation::{csv_stats, validate_csv, CsvStats, CsvValidation};
