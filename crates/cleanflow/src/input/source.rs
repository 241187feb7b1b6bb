//! Metadata about a loaded quarantine file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::table::Table;
use super::tokenizer::ParseStrategy;

/// Where a table came from and how it was read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without directories.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:<hex>` digest of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// Tokenizer used to read the file.
    pub strategy: ParseStrategy,
    /// Data rows, header excluded.
    pub row_count: usize,
    /// Columns, including `row_id`.
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe `contents` read from `path` and parsed into `table`.
    pub fn describe(path: &Path, contents: &[u8], strategy: ParseStrategy, table: &Table) -> Self {
        Self {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash: content_hash(contents),
            size_bytes: contents.len() as u64,
            strategy,
            row_count: table.row_count(),
            column_count: table.column_count(),
            loaded_at: Utc::now(),
        }
    }

    /// Whether `hash` was taken from the same bytes as this file.
    pub fn matches_hash(&self, hash: &str) -> bool {
        self.hash.eq_ignore_ascii_case(hash)
    }
}

/// `sha256:<hex>` digest of raw file contents.
pub fn content_hash(contents: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(contents))
}
