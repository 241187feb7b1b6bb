//! Structural validation and descriptive statistics for CSV input.

mod report;
mod stats;

pub use report::{
    validate_csv, validate_csv_bytes, validate_csv_bytes_with, validate_csv_with, CsvValidation,
};
pub use stats::{csv_stats, csv_stats_bytes, csv_stats_bytes_with, csv_stats_with, CsvStats};
