//! CLI command implementations.

pub mod annotate;
pub mod edit;
pub mod rules;
pub mod stats;
pub mod validate;

use std::path::Path;

use cleanflow::ParserConfig;

/// Parser configuration selected by the `--legacy` flag.
pub(crate) fn parser_config(legacy: bool) -> ParserConfig {
    if legacy {
        ParserConfig::legacy()
    } else {
        ParserConfig::default()
    }
}

/// Fail with a readable error when the input file is missing.
pub(crate) fn ensure_exists(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(())
}

/// Read a CSV file as raw bytes.
pub(crate) fn read_input(file: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    ensure_exists(file)?;
    Ok(std::fs::read(file)?)
}
