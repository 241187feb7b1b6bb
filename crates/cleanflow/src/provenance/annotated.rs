//! A parsed table joined with per-row DQ metadata.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CleanflowError, Result};
use crate::input::{Parser, ParserConfig, SourceMetadata, Table, ROW_ID};
use crate::rules::Severity;

use super::cell::{derive_cell_status, CellStatus};
use super::metadata::{DqMetadata, DqStatus, DQ_CHANGES, DQ_ERRORS, DQ_STATUS};

/// A cell value together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub row_id: String,
    pub column: String,
    pub value: String,
    #[serde(flatten)]
    pub status: CellStatus,
}

/// Counts of cells and rows per DQ status, plus rule hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineSummary {
    pub total_rows: usize,
    pub clean_rows: usize,
    pub fixed_rows: usize,
    pub quarantined_rows: usize,
    pub clean_cells: usize,
    pub fixed_cells: usize,
    pub quarantined_cells: usize,
    /// Cells attributed to each rule id.
    pub rule_hits: BTreeMap<String, usize>,
    /// Cells whose column appears in both `dq_changes` and `dq_errors`.
    pub conflicting_cells: usize,
    /// Highest severity among fixed and quarantined cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_severity: Option<Severity>,
}

/// Table plus DQ metadata keyed by `row_id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnotatedTable {
    table: Table,
    metadata: HashMap<String, DqMetadata>,
}

impl AnnotatedTable {
    /// Join a table with metadata. Entries for unknown rows are kept but unused.
    pub fn new(table: Table, metadata: HashMap<String, DqMetadata>) -> Self {
        Self { table, metadata }
    }

    /// Lift `dq_status`/`dq_changes`/`dq_errors` columns out of a table.
    pub fn from_table(mut table: Table) -> Result<Self> {
        let metadata = split_dq_columns(&mut table)?;
        Ok(Self { table, metadata })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_parts(self) -> (Table, HashMap<String, DqMetadata>) {
        (self.table, self.metadata)
    }

    /// Metadata for a row, if any.
    pub fn metadata(&self, row_id: &str) -> Option<&DqMetadata> {
        self.metadata.get(row_id)
    }

    /// Replace the metadata for a row.
    pub fn set_metadata(&mut self, row_id: impl Into<String>, metadata: DqMetadata) {
        self.metadata.insert(row_id.into(), metadata);
    }

    /// Provenance status of a cell. Cells without metadata are clean.
    pub fn status(&self, row_id: &str, column: &str) -> CellStatus {
        derive_cell_status(self.metadata(row_id), column)
    }

    /// Value and status of a cell.
    pub fn cell(&self, row_id: &str, column: &str) -> Option<Cell> {
        let value = self.table.get(row_id, column)?;
        Some(Cell {
            row_id: row_id.to_string(),
            column: column.to_string(),
            value: value.to_string(),
            status: self.status(row_id, column),
        })
    }

    /// Row status, `Clean` when the row has no metadata.
    pub fn row_status(&self, row_id: &str) -> DqStatus {
        self.metadata(row_id)
            .map(DqMetadata::row_status)
            .unwrap_or(DqStatus::Clean)
    }

    /// Every non-clean cell in table order.
    pub fn flagged_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for row in self.table.rows() {
            let Some(row_id) = row.get(ROW_ID) else { continue };
            let Some(meta) = self.metadata(row_id) else { continue };
            for (column, value) in row {
                let status = derive_cell_status(Some(meta), column);
                if !status.is_clean() {
                    cells.push(Cell {
                        row_id: row_id.clone(),
                        column: column.clone(),
                        value: value.clone(),
                        status,
                    });
                }
            }
        }
        cells
    }

    /// Summarize statuses across the table.
    pub fn summary(&self) -> QuarantineSummary {
        let mut summary = QuarantineSummary {
            total_rows: self.table.row_count(),
            ..Default::default()
        };

        for row in self.table.rows() {
            let row_id = row.get(ROW_ID).map(String::as_str).unwrap_or_default();
            let meta = self.metadata(row_id);

            match meta.map(DqMetadata::row_status).unwrap_or(DqStatus::Clean) {
                DqStatus::Clean => summary.clean_rows += 1,
                DqStatus::Fixed => summary.fixed_rows += 1,
                DqStatus::Quarantined => summary.quarantined_rows += 1,
            }

            if let Some(meta) = meta {
                summary.conflicting_cells += meta
                    .conflicting_columns()
                    .filter(|c| self.table.has_column(c))
                    .count();
            }

            for column in self.table.columns() {
                let status = derive_cell_status(meta, column);
                match status.kind() {
                    DqStatus::Clean => summary.clean_cells += 1,
                    DqStatus::Fixed => summary.fixed_cells += 1,
                    DqStatus::Quarantined => summary.quarantined_cells += 1,
                }
                if let Some(rule_id) = status.rule_id() {
                    *summary.rule_hits.entry(rule_id.to_uppercase()).or_insert(0) += 1;
                }
                summary.highest_severity = summary.highest_severity.max(status.severity());
            }
        }

        summary
    }
}

/// Remove `dq_*` columns from a table and decode them per row.
///
/// Rows whose metadata columns are all blank get no entry.
pub fn split_dq_columns(table: &mut Table) -> Result<HashMap<String, DqMetadata>> {
    const DQ_COLUMNS: [&str; 3] = [DQ_STATUS, DQ_CHANGES, DQ_ERRORS];

    if !DQ_COLUMNS.iter().any(|c| table.has_column(c)) {
        return Ok(HashMap::new());
    }

    let raw = table.take_columns(&DQ_COLUMNS);
    let mut metadata = HashMap::new();
    for (row, columns) in table.rows().iter().zip(raw) {
        let row_id = row.get(ROW_ID).cloned().unwrap_or_default();
        let meta = DqMetadata::from_columns(&row_id, &columns).inspect_err(|e| {
            warn!(row_id = %row_id, error = %e, "undecodable dq metadata");
        })?;
        if meta.is_empty() {
            continue;
        }
        match metadata.entry(row_id) {
            Entry::Vacant(slot) => {
                slot.insert(meta);
            }
            Entry::Occupied(first) => {
                warn!(row_id = %first.key(), "dq metadata for duplicate row_id ignored");
            }
        }
    }

    debug!(rows = metadata.len(), "split dq metadata columns");
    Ok(metadata)
}

/// A quarantine file loaded from disk.
#[derive(Debug, Clone, Serialize)]
pub struct QuarantineFile {
    pub source: SourceMetadata,
    pub annotated: AnnotatedTable,
}

impl QuarantineFile {
    /// Load, parse and annotate a quarantine CSV.
    pub fn load(path: impl AsRef<Path>, config: &ParserConfig) -> Result<Self> {
        let (table, mut source) = Parser::with_config(config.clone()).parse_file(path)?;
        let annotated = AnnotatedTable::from_table(table)?;
        source.column_count = annotated.table().column_count();
        Ok(Self { source, annotated })
    }

    /// Attach metadata supplied separately (e.g. a JSON sidecar keyed by `row_id`).
    pub fn with_metadata(mut self, metadata: HashMap<String, DqMetadata>) -> Self {
        for (row_id, meta) in metadata {
            self.annotated.set_metadata(row_id, meta);
        }
        self
    }

    /// Attach metadata from a JSON file mapping `row_id` to a DQ bundle.
    pub fn with_metadata_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| CleanflowError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let metadata: HashMap<String, DqMetadata> = serde_json::from_str(&raw)?;
        debug!(rows = metadata.len(), "loaded metadata file");
        Ok(self.with_metadata(metadata))
    }
}
