//! Structural validation of CSV text.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::input::{Parser, ParserConfig};

/// Outcome of validating CSV text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvValidation {
    /// True iff `errors` is empty.
    pub valid: bool,
    /// Human-readable findings, in discovery order.
    pub errors: Vec<String>,
}

impl CsvValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate CSV text with the default parser.
///
/// Never fails: every problem is returned as a finding.
pub fn validate_csv(text: &str) -> CsvValidation {
    validate_csv_with(text, &ParserConfig::default())
}

/// Validate CSV text with a specific parser configuration.
pub fn validate_csv_with(text: &str, config: &ParserConfig) -> CsvValidation {
    if text.trim().is_empty() {
        return CsvValidation::from_errors(vec!["CSV content is empty".to_string()]);
    }

    let parsed = Parser::with_config(config.clone()).parse_detailed(text);
    let mut errors = Vec::new();

    if parsed.table.column_count() == 0 {
        errors.push("No columns found in CSV".to_string());
    }
    if parsed.table.row_count() == 0 {
        errors.push("No data rows found in CSV".to_string());
    }

    let expected = parsed.header_width;
    for (i, &found) in parsed.row_widths.iter().enumerate() {
        if found != expected {
            errors.push(format!(
                "Row {}: Expected {} columns, found {}",
                i + 1,
                expected,
                found
            ));
        }
    }

    if !errors.is_empty() {
        warn!(findings = errors.len(), "csv failed validation");
    }

    CsvValidation::from_errors(errors)
}

/// Validate raw bytes, reporting undecodable input as a parse error.
pub fn validate_csv_bytes(bytes: &[u8]) -> CsvValidation {
    validate_csv_bytes_with(bytes, &ParserConfig::default())
}

/// Validate raw bytes with a specific parser configuration.
pub fn validate_csv_bytes_with(bytes: &[u8], config: &ParserConfig) -> CsvValidation {
    match std::str::from_utf8(bytes) {
        Ok(text) => validate_csv_with(text, config),
        Err(e) => {
            warn!(error = %e, "csv is not valid utf-8");
            CsvValidation::from_errors(vec![format!("Parse error: {}", e)])
        }
    }
}
