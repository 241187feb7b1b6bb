//! CSV parser front-end over the tokenizer strategies.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::{CleanflowError, Result};

use super::source::SourceMetadata;
use super::table::{ParsedCsv, Table};
use super::tokenizer::{AdvancedCsv, CsvStrategy, LegacyCsv, ParseStrategy};

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Tokenizer to use.
    pub strategy: ParseStrategy,
}

impl ParserConfig {
    /// Configuration using the line-based tokenizer.
    pub fn legacy() -> Self {
        Self {
            strategy: ParseStrategy::Legacy,
        }
    }
}

/// Parses CSV text into tables.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse CSV text. Never fails.
    pub fn parse(&self, text: &str) -> Table {
        self.parse_detailed(text).table
    }

    pub(crate) fn parse_detailed(&self, text: &str) -> ParsedCsv {
        let tokenizer = self.config.strategy.tokenizer();
        let parsed = ParsedCsv::from_records(tokenizer.records(text));
        debug!(
            strategy = tokenizer.name(),
            bytes = text.len(),
            rows = parsed.table.row_count(),
            columns = parsed.table.column_count(),
            "parsed csv"
        );
        parsed
    }

    /// Read and parse a file, returning the table and its metadata.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CleanflowError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CleanflowError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        let table = self.parse(&String::from_utf8_lossy(&contents));
        let source = SourceMetadata::describe(path, &contents, self.config.strategy, &table);

        Ok((table, source))
    }
}

/// Parse with the line-based tokenizer.
pub fn parse_legacy_csv(text: &str) -> Table {
    ParsedCsv::from_records(LegacyCsv.records(text)).table
}

/// Parse with the full-text tokenizer, preserving quoted newlines.
pub fn parse_advanced_csv(text: &str) -> Table {
    ParsedCsv::from_records(AdvancedCsv.records(text)).table
}

/// Parse with the default strategy.
pub fn parse_csv(text: &str) -> Table {
    Parser::new().parse(text)
}
