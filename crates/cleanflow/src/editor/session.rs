//! Quarantine edit session: active cell, drafts and commit.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{CleanflowError, Result};
use crate::input::{Table, ROW_ID};
use crate::provenance::{AnnotatedTable, CellStatus};

use super::buffer::{apply_edits, diff_cells, CellEdit, CellKey, EditBuffer};

/// Editor configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Columns that can never be activated for editing.
    pub read_only_columns: HashSet<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            read_only_columns: HashSet::from([ROW_ID.to_string()]),
        }
    }
}

impl EditorConfig {
    /// Add a read-only column.
    pub fn with_read_only(mut self, column: impl Into<String>) -> Self {
        self.read_only_columns.insert(column.into());
        self
    }

    pub fn is_editable(&self, column: &str) -> bool {
        !self.read_only_columns.contains(column)
    }
}

/// How the active cell lost focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deactivation {
    Blur,
    Enter,
    Escape,
}

/// Everything a renderer needs for one cell.
///
/// `edited` and `status` are independent: an edited quarantined cell shows both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub row_id: String,
    pub column: String,
    pub value: String,
    pub status: CellStatus,
    pub edited: bool,
    pub active: bool,
    pub editable: bool,
}

/// Edits committed by a save.
#[derive(Debug, Clone)]
pub struct Commit {
    /// The table with every edit applied.
    pub table: Table,
    /// The applied edits, in table order.
    pub edits: Vec<CellEdit>,
}

/// Editing state for one open quarantine file.
#[derive(Debug, Clone)]
pub struct EditSession {
    config: EditorConfig,
    baseline: AnnotatedTable,
    buffer: EditBuffer,
    active: Option<CellKey>,
    opened_at: DateTime<Utc>,
}

impl EditSession {
    /// Open a session over a loaded file.
    pub fn open(baseline: AnnotatedTable) -> Self {
        Self::with_config(baseline, EditorConfig::default())
    }

    /// Open a session with custom configuration.
    pub fn with_config(baseline: AnnotatedTable, config: EditorConfig) -> Self {
        Self {
            config,
            baseline,
            buffer: EditBuffer::new(),
            active: None,
            opened_at: Utc::now(),
        }
    }

    pub fn baseline(&self) -> &AnnotatedTable {
        &self.baseline
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The cell currently being edited.
    pub fn active(&self) -> Option<&CellKey> {
        self.active.as_ref()
    }

    /// Focus a cell for editing. Any other active cell is blurred first.
    pub fn activate(&mut self, row_id: &str, column: &str) -> Result<()> {
        self.check_editable(row_id, column)?;

        if self.active.is_some() {
            self.deactivate(Deactivation::Blur);
        }
        self.active = Some(CellKey::new(row_id, column));
        Ok(())
    }

    /// Replace the draft of the active cell. Takes effect immediately.
    pub fn input(&mut self, value: impl Into<String>) -> Result<()> {
        let key = self.active.as_ref().ok_or(CleanflowError::NoActiveCell)?;
        self.buffer.set(&key.row_id, &key.column, value);
        Ok(())
    }

    /// Leave editing mode. Returns the cell that was active.
    ///
    /// The draft is kept for every reason; use [`EditSession::revert`] to drop it.
    pub fn deactivate(&mut self, reason: Deactivation) -> Option<CellKey> {
        let key = self.active.take()?;
        debug!(
            row_id = %key.row_id,
            column = %key.column,
            ?reason,
            edited = self.is_edited(&key.row_id, &key.column),
            "cell deactivated"
        );
        Some(key)
    }

    /// Current value: the draft if any, else the loaded value.
    pub fn value(&self, row_id: &str, column: &str) -> Option<&str> {
        self.buffer
            .get(row_id, column)
            .or_else(|| self.baseline.table().get(row_id, column))
    }

    /// Whether the draft differs from the loaded value.
    pub fn is_edited(&self, row_id: &str, column: &str) -> bool {
        match self.buffer.get(row_id, column) {
            Some(draft) => self.baseline.table().get(row_id, column) != Some(draft),
            None => false,
        }
    }

    /// Drop the draft of a cell, restoring the loaded value.
    pub fn revert(&mut self, row_id: &str, column: &str) -> bool {
        self.buffer.remove(row_id, column)
    }

    /// Set a draft directly, for scripted edits. The active cell is left as is.
    pub fn set_value(&mut self, row_id: &str, column: &str, value: impl Into<String>) -> Result<()> {
        self.check_editable(row_id, column)?;
        self.buffer.set(row_id, column, value);
        debug!(row_id, column, "draft set");
        Ok(())
    }

    fn check_editable(&self, row_id: &str, column: &str) -> Result<()> {
        if !self.config.is_editable(column) {
            return Err(CleanflowError::ReadOnlyColumn(column.to_string()));
        }
        if self.baseline.table().get(row_id, column).is_none() {
            return Err(CleanflowError::unknown_cell(row_id, column));
        }
        Ok(())
    }

    /// Cells whose draft differs from the loaded value, in table order.
    pub fn diff(&self) -> Vec<CellEdit> {
        diff_cells(self.baseline.table(), &self.buffer)
    }

    pub fn has_changes(&self) -> bool {
        !self.diff().is_empty()
    }

    /// Render state of one cell.
    pub fn cell_view(&self, row_id: &str, column: &str) -> Option<CellView> {
        let value = self.value(row_id, column)?;
        let active = self
            .active
            .as_ref()
            .is_some_and(|k| k.row_id == row_id && k.column == column);

        Some(CellView {
            row_id: row_id.to_string(),
            column: column.to_string(),
            value: value.to_string(),
            status: self.baseline.status(row_id, column),
            edited: self.is_edited(row_id, column),
            active,
            editable: self.config.is_editable(column),
        })
    }

    /// Render state of a whole row in column order.
    pub fn row_views(&self, row_id: &str) -> Vec<CellView> {
        self.baseline
            .table()
            .columns()
            .iter()
            .filter_map(|column| self.cell_view(row_id, column))
            .collect()
    }

    /// Apply every edit, make the result the new baseline and reset.
    pub fn commit(&mut self) -> Result<Commit> {
        let edits = self.diff();
        let table = apply_edits(self.baseline.table(), &edits)?;

        let baseline = std::mem::take(&mut self.baseline);
        let (_, metadata) = baseline.into_parts();
        self.baseline = AnnotatedTable::new(table.clone(), metadata);
        self.reset();

        debug!(edits = edits.len(), "session committed");
        Ok(Commit { table, edits })
    }

    /// Discard every draft.
    pub fn cancel(&mut self) {
        debug!(drafts = self.buffer.len(), "session cancelled");
        self.reset();
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.active = None;
    }

    pub(super) fn restore_buffer(&mut self, buffer: EditBuffer) {
        self.buffer = buffer;
        self.active = None;
    }

    pub(super) fn config(&self) -> &EditorConfig {
        &self.config
    }
}
