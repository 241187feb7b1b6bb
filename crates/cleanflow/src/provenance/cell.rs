//! Cell-level provenance status.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::rules::{rule_severity, Severity};

use super::metadata::{DqMetadata, DqStatus};

/// Leading rule reference in an error message, e.g. `R5: ...` or `[R5] ...`.
static ERROR_RULE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\[?(R[1-9][0-9]*)\b").expect("rule prefix pattern is valid"));

/// Provenance of a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CellStatus {
    Clean,
    Fixed {
        original_value: String,
        rule_id: String,
    },
    Quarantined {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rule_id: Option<String>,
    },
}

impl CellStatus {
    /// The status tier without payload.
    pub fn kind(&self) -> DqStatus {
        match self {
            CellStatus::Clean => DqStatus::Clean,
            CellStatus::Fixed { .. } => DqStatus::Fixed,
            CellStatus::Quarantined { .. } => DqStatus::Quarantined,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, CellStatus::Clean)
    }

    /// Rule responsible for the status, if known.
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            CellStatus::Clean => None,
            CellStatus::Fixed { rule_id, .. } => Some(rule_id.as_str()).filter(|r| !r.is_empty()),
            CellStatus::Quarantined { rule_id, .. } => rule_id.as_deref(),
        }
    }

    /// Severity of the responsible rule; `None` for clean cells.
    pub fn severity(&self) -> Option<Severity> {
        if self.is_clean() {
            None
        } else {
            Some(rule_severity(self.rule_id()))
        }
    }
}

/// Derive a cell's status from its row metadata.
///
/// A change wins over an error for the same column; absent metadata is clean.
pub fn derive_cell_status(meta: Option<&DqMetadata>, column: &str) -> CellStatus {
    let Some(meta) = meta else {
        return CellStatus::Clean;
    };

    if let Some(change) = meta.dq_changes.get(column) {
        return CellStatus::Fixed {
            original_value: change.original_text(),
            rule_id: change.rule_id.clone(),
        };
    }

    if let Some(error) = meta.dq_errors.get(column) {
        return CellStatus::Quarantined {
            error: error.clone(),
            rule_id: rule_from_error(error),
        };
    }

    CellStatus::Clean
}

fn rule_from_error(message: &str) -> Option<String> {
    ERROR_RULE_PREFIX
        .captures(message)
        .map(|caps| caps[1].to_uppercase())
}
