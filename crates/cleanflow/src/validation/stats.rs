//! Descriptive statistics for CSV text.

use serde::{Deserialize, Serialize};

use crate::input::{Parser, ParserConfig, Table};

/// Row, column and emptiness counts for a parsed CSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvStats {
    /// Number of data rows.
    pub row_count: usize,
    /// Number of columns, including `row_id`.
    pub column_count: usize,
    /// `row_count * column_count`.
    pub total_cells: usize,
    /// Cells that are missing or blank after trimming.
    pub empty_cells: usize,
    /// Whether any header was found.
    pub has_headers: bool,
}

impl CsvStats {
    /// Compute statistics for an already parsed table.
    pub fn from_table(table: &Table) -> Self {
        let empty_cells = table
            .rows()
            .iter()
            .map(|row| {
                table
                    .columns()
                    .iter()
                    .filter(|c| row.get(*c).is_none_or(|v| v.trim().is_empty()))
                    .count()
            })
            .sum();

        Self {
            row_count: table.row_count(),
            column_count: table.column_count(),
            total_cells: table.row_count() * table.column_count(),
            empty_cells,
            has_headers: table.column_count() > 0,
        }
    }

    /// Share of empty cells, 0.0 for an empty table.
    pub fn empty_ratio(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.empty_cells as f64 / self.total_cells as f64
        }
    }
}

/// Compute statistics with the default parser.
pub fn csv_stats(text: &str) -> CsvStats {
    csv_stats_with(text, &ParserConfig::default())
}

/// Compute statistics with a specific parser configuration.
pub fn csv_stats_with(text: &str, config: &ParserConfig) -> CsvStats {
    CsvStats::from_table(&Parser::with_config(config.clone()).parse(text))
}

/// Compute statistics over raw bytes; undecodable input yields all zeros.
pub fn csv_stats_bytes(bytes: &[u8]) -> CsvStats {
    csv_stats_bytes_with(bytes, &ParserConfig::default())
}

/// Compute statistics over raw bytes with a specific parser configuration.
pub fn csv_stats_bytes_with(bytes: &[u8], config: &ParserConfig) -> CsvStats {
    std::str::from_utf8(bytes)
        .map(|text| csv_stats_with(text, config))
        .unwrap_or_default()
}
