//! Edit buffer and diffing against a loaded baseline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::Table;

/// Address of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub row_id: String,
    pub column: String,
}

impl CellKey {
    pub fn new(row_id: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            column: column.into(),
        }
    }
}

/// One changed cell: the loaded value and the draft replacing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEdit {
    pub row_id: String,
    pub column: String,
    pub before: String,
    pub after: String,
}

/// Draft values keyed by `(row_id, column)`.
///
/// Lookups borrow the key parts, so reading a cell never allocates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditBuffer {
    drafts: HashMap<String, HashMap<String, String>>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft value for a cell, if one was typed.
    pub fn get(&self, row_id: &str, column: &str) -> Option<&str> {
        self.drafts.get(row_id)?.get(column).map(|s| s.as_str())
    }

    /// Replace the draft for a cell.
    pub fn set(&mut self, row_id: &str, column: &str, value: impl Into<String>) {
        self.drafts
            .entry(row_id.to_string())
            .or_default()
            .insert(column.to_string(), value.into());
    }

    /// Drop the draft for a cell. Returns whether one existed.
    pub fn remove(&mut self, row_id: &str, column: &str) -> bool {
        let Some(row) = self.drafts.get_mut(row_id) else {
            return false;
        };
        let removed = row.remove(column).is_some();
        if row.is_empty() {
            self.drafts.remove(row_id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    /// Number of drafted cells, including ones equal to the baseline.
    pub fn len(&self) -> usize {
        self.drafts.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// All drafts in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &str)> {
        self.drafts.iter().flat_map(|(row_id, row)| {
            row.iter()
                .map(move |(column, value)| (CellKey::new(row_id.as_str(), column.as_str()), value.as_str()))
        })
    }
}

/// Drafts that differ from the baseline, in table order.
///
/// Drafts for cells the baseline does not have are ignored.
pub fn diff_cells(baseline: &Table, buffer: &EditBuffer) -> Vec<CellEdit> {
    let mut edits: Vec<(usize, usize, CellEdit)> = buffer
        .iter()
        .filter_map(|(key, after)| {
            let row = baseline.position(&key.row_id)?;
            let column = baseline.columns().iter().position(|c| *c == key.column)?;
            let before = baseline.get(&key.row_id, &key.column)?;
            (before != after).then(|| {
                (
                    row,
                    column,
                    CellEdit {
                        before: before.to_string(),
                        after: after.to_string(),
                        row_id: key.row_id,
                        column: key.column,
                    },
                )
            })
        })
        .collect();

    edits.sort_by_key(|(row, column, _)| (*row, *column));
    edits.into_iter().map(|(_, _, edit)| edit).collect()
}

/// Apply edits to a copy of the baseline.
pub fn apply_edits(baseline: &Table, edits: &[CellEdit]) -> Result<Table> {
    let mut table = baseline.clone();
    for edit in edits {
        table.set(&edit.row_id, &edit.column, edit.after.as_str())?;
    }
    Ok(table)
}
