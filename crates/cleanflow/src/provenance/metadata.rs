//! Per-row DQ metadata produced by the external rule engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CleanflowError, Result};

use super::cell::{derive_cell_status, CellStatus};

/// Column names carrying DQ metadata in downloaded quarantine files.
pub const DQ_STATUS: &str = "dq_status";
pub const DQ_CHANGES: &str = "dq_changes";
pub const DQ_ERRORS: &str = "dq_errors";

/// Row- or cell-level outcome of the DQ rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DqStatus {
    /// Unmodified, no issue.
    Clean,
    /// Altered by a rule.
    Fixed,
    /// Rejected or flagged by a rule.
    Quarantined,
}

impl DqStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DqStatus::Clean => "Clean",
            DqStatus::Fixed => "Fixed",
            DqStatus::Quarantined => "Quarantined",
        }
    }
}

/// A value rewritten by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqChange {
    /// Value before the rule ran; any JSON value.
    #[serde(default)]
    pub original: Value,
    /// Rule that made the change.
    #[serde(default)]
    pub rule_id: String,
}

impl DqChange {
    pub fn new(original: impl Into<Value>, rule_id: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            rule_id: rule_id.into(),
        }
    }

    /// The original value as display text.
    pub fn original_text(&self) -> String {
        value_to_text(&self.original)
    }
}

/// DQ metadata bundle for one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dq_status: Option<DqStatus>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dq_changes: IndexMap<String, DqChange>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dq_errors: IndexMap<String, String>,
}

impl DqMetadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row status.
    pub fn with_status(mut self, status: DqStatus) -> Self {
        self.dq_status = Some(status);
        self
    }

    /// Record a rule change for a column.
    pub fn with_change(mut self, column: impl Into<String>, change: DqChange) -> Self {
        self.dq_changes.insert(column.into(), change);
        self
    }

    /// Record a validation error for a column.
    pub fn with_error(mut self, column: impl Into<String>, message: impl Into<String>) -> Self {
        self.dq_errors.insert(column.into(), message.into());
        self
    }

    /// Whether there is nothing to report for the row.
    pub fn is_empty(&self) -> bool {
        self.dq_status.is_none() && self.dq_changes.is_empty() && self.dq_errors.is_empty()
    }

    /// Status of one cell in this row.
    pub fn cell_status(&self, column: &str) -> CellStatus {
        derive_cell_status(Some(self), column)
    }

    /// Row status: the declared one, else derived from the cell maps.
    pub fn row_status(&self) -> DqStatus {
        if let Some(status) = self.dq_status {
            return status;
        }
        if !self.dq_errors.is_empty() {
            DqStatus::Quarantined
        } else if !self.dq_changes.is_empty() {
            DqStatus::Fixed
        } else {
            DqStatus::Clean
        }
    }

    /// Columns that appear in both `dq_changes` and `dq_errors`.
    ///
    /// Such cells display as fixed; the error is shadowed.
    pub fn conflicting_columns(&self) -> impl Iterator<Item = &str> {
        self.dq_changes
            .keys()
            .filter(|c| self.dq_errors.contains_key(*c))
            .map(|c| c.as_str())
    }

    /// Decode metadata from the raw text of `dq_*` columns.
    ///
    /// `dq_changes` and `dq_errors` hold JSON objects; blank cells mean empty.
    pub fn from_columns(row_id: &str, columns: &IndexMap<String, String>) -> Result<Self> {
        let invalid = |message: String| CleanflowError::Metadata {
            row_id: row_id.to_string(),
            message,
        };

        let dq_status = match columns.get(DQ_STATUS).map(|s| s.trim()) {
            None | Some("") => None,
            Some(raw) => Some(
                serde_json::from_value(Value::String(raw.to_ascii_lowercase()))
                    .map_err(|_| invalid(format!("unknown dq_status '{}'", raw)))?,
            ),
        };

        let dq_changes = match columns.get(DQ_CHANGES).map(|s| s.trim()) {
            None | Some("") => IndexMap::new(),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| invalid(format!("dq_changes: {}", e)))?,
        };

        let dq_errors = match columns.get(DQ_ERRORS).map(|s| s.trim()) {
            None | Some("") => IndexMap::new(),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| invalid(format!("dq_errors: {}", e)))?,
        };

        Ok(Self {
            dq_status,
            dq_changes,
            dq_errors,
        })
    }
}

/// Render a JSON value as cell text: strings verbatim, null as empty.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_engine_output() {
        let meta: DqMetadata = serde_json::from_value(json!({
            "dq_status": "fixed",
            "dq_changes": {"amount": {"original": 10.5, "rule_id": "R9"}},
            "dq_errors": {"email": "not an email"}
        }))
        .unwrap();

        assert_eq!(meta.dq_status, Some(DqStatus::Fixed));
        assert_eq!(meta.dq_changes["amount"].original_text(), "10.5");
        assert_eq!(meta.dq_errors["email"], "not an email");
    }

    #[test]
    fn test_row_status_derivation() {
        assert_eq!(DqMetadata::new().row_status(), DqStatus::Clean);
        assert_eq!(
            DqMetadata::new().with_change("a", DqChange::new("x", "R10")).row_status(),
            DqStatus::Fixed
        );
        assert_eq!(
            DqMetadata::new()
                .with_change("a", DqChange::new("x", "R10"))
                .with_error("b", "bad")
                .row_status(),
            DqStatus::Quarantined
        );
        assert_eq!(
            DqMetadata::new().with_status(DqStatus::Clean).with_error("b", "bad").row_status(),
            DqStatus::Clean
        );
    }

    #[test]
    fn test_conflicting_columns() {
        let meta = DqMetadata::new()
            .with_change("amount", DqChange::new("10", "R9"))
            .with_error("amount", "bad")
            .with_error("date", "bad");
        assert_eq!(meta.conflicting_columns().collect::<Vec<_>>(), vec!["amount"]);
    }

    #[test]
    fn test_from_columns() {
        let mut columns = IndexMap::new();
        columns.insert(DQ_STATUS.to_string(), "Quarantined".to_string());
        columns.insert(
            DQ_CHANGES.to_string(),
            r#"{"name": {"original": " Acme ", "rule_id": "R10"}}"#.to_string(),
        );
        columns.insert(DQ_ERRORS.to_string(), String::new());

        let meta = DqMetadata::from_columns("7", &columns).unwrap();
        assert_eq!(meta.dq_status, Some(DqStatus::Quarantined));
        assert_eq!(meta.dq_changes["name"].original_text(), " Acme ");
        assert!(meta.dq_errors.is_empty());
    }

    #[test]
    fn test_from_columns_rejects_bad_json() {
        let mut columns = IndexMap::new();
        columns.insert(DQ_ERRORS.to_string(), "{not json".to_string());
        let err = DqMetadata::from_columns("3", &columns).unwrap_err();
        assert!(matches!(err, CleanflowError::Metadata { ref row_id, .. } if row_id == "3"));
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&Value::Null), "");
        assert_eq!(value_to_text(&json!("abc")), "abc");
        assert_eq!(value_to_text(&json!(42)), "42");
        assert_eq!(value_to_text(&json!(true)), "true");
    }
}
