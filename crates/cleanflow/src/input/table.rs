//! Parsed tabular data addressed by `(row_id, column)`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::error::{CleanflowError, Result};
use crate::output::rows_to_csv;

use super::tokenizer::Record;

/// Name of the row identifier column.
pub const ROW_ID: &str = "row_id";

/// One row, keyed by column name in column order.
pub type Row = IndexMap<String, String>;

/// Parsed table: ordered unique columns plus rows holding a value for each.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Table {
    /// Build a table from columns and rows.
    ///
    /// Rows are padded with empty values for missing columns, keys not in
    /// `columns` are dropped, and rows are reordered to column order.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                columns
                    .iter()
                    .map(|c| (c.clone(), row.swap_remove(c).unwrap_or_default()))
                    .collect()
            })
            .collect();
        Self::from_parts(columns, rows)
    }

    fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            let Some(id) = row.get(ROW_ID) else { continue };
            match index.entry(id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(first) => {
                    warn!(
                        row_id = %id,
                        first = first.get() + 1,
                        duplicate = position + 1,
                        "duplicate row_id; only the first row is addressable"
                    );
                }
            }
        }
        Self {
            columns,
            rows,
            index,
        }
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has a column with this name.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Position of a row by its `row_id`.
    pub fn position(&self, row_id: &str) -> Option<usize> {
        self.index.get(row_id).copied()
    }

    /// Row by `row_id`.
    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.position(row_id).map(|i| &self.rows[i])
    }

    /// Cell value by `(row_id, column)`.
    pub fn get(&self, row_id: &str, column: &str) -> Option<&str> {
        self.row(row_id)?.get(column).map(|s| s.as_str())
    }

    /// Overwrite a cell value.
    pub fn set(&mut self, row_id: &str, column: &str, value: impl Into<String>) -> Result<()> {
        if column == ROW_ID {
            return Err(CleanflowError::ReadOnlyColumn(column.to_string()));
        }
        let position = self
            .position(row_id)
            .ok_or_else(|| CleanflowError::unknown_cell(row_id, column))?;
        let cell = self.rows[position]
            .get_mut(column)
            .ok_or_else(|| CleanflowError::unknown_cell(row_id, column))?;
        *cell = value.into();
        Ok(())
    }

    /// Remove columns, returning their values per row in row order.
    pub(crate) fn take_columns(&mut self, names: &[&str]) -> Vec<IndexMap<String, String>> {
        self.columns.retain(|c| !names.contains(&c.as_str()));
        self.rows
            .iter_mut()
            .map(|row| {
                names
                    .iter()
                    .filter_map(|name| row.shift_remove(*name).map(|v| (name.to_string(), v)))
                    .collect()
            })
            .collect()
    }

    /// Serialize back to CSV text.
    pub fn to_csv(&self) -> String {
        rows_to_csv(&self.rows)
    }
}

/// Result of mapping raw records onto a header.
#[derive(Debug, Clone)]
pub(crate) struct ParsedCsv {
    pub table: Table,
    /// Number of header cells in the source.
    pub header_width: usize,
    /// Number of source cells for each retained row.
    pub row_widths: Vec<usize>,
}

impl ParsedCsv {
    /// Map records onto the first record's headers.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut records = records.into_iter();
        let Some(header_record) = records.next() else {
            return Self {
                table: Table::default(),
                header_width: 0,
                row_widths: Vec::new(),
            };
        };

        let headers: Vec<String> = header_record
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = h.trim();
                if h.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    h.to_string()
                }
            })
            .collect();
        let has_row_id = headers.iter().any(|h| h == ROW_ID);

        let mut rows = Vec::new();
        let mut row_widths = Vec::new();
        for record in records {
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let mut row = Row::with_capacity(headers.len() + 1);
            if !has_row_id {
                row.insert(ROW_ID.to_string(), String::new());
            }
            for (i, header) in headers.iter().enumerate() {
                row.insert(header.clone(), record.get(i).cloned().unwrap_or_default());
            }

            row_widths.push(record.len());
            rows.push(row);
        }
        synthesize_row_ids(&mut rows);

        let mut columns = Vec::with_capacity(headers.len() + 1);
        if !has_row_id {
            columns.push(ROW_ID.to_string());
        }
        for header in &headers {
            if !columns.contains(header) {
                columns.push(header.clone());
            }
        }

        Self {
            table: Table::from_parts(columns, rows),
            header_width: header_record.len(),
            row_widths,
        }
    }
}

/// Give every row without a `row_id` its 1-based position, or the next
/// number after it that no other row uses.
fn synthesize_row_ids(rows: &mut [Row]) {
    let mut taken: HashSet<String> = rows
        .iter()
        .filter_map(|row| row.get(ROW_ID))
        .filter(|id| !id.trim().is_empty())
        .cloned()
        .collect();

    for (position, row) in rows.iter_mut().enumerate() {
        if row.get(ROW_ID).is_some_and(|id| !id.trim().is_empty()) {
            continue;
        }
        let mut candidate = position + 1;
        while taken.contains(&candidate.to_string()) {
            candidate += 1;
        }
        let id = candidate.to_string();
        taken.insert(id.clone());
        row.insert(ROW_ID.to_string(), id);
    }
}
