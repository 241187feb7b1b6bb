//! Save and restore unsaved drafts so an editing session can be resumed.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CleanflowError, Result};

use super::buffer::{CellEdit, EditBuffer};
use super::session::EditSession;

/// Unsaved edits of a session, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSnapshot {
    /// Hash of the quarantine file the drafts were made against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    pub saved_at: DateTime<Utc>,
    pub edits: Vec<CellEdit>,
}

impl DraftSnapshot {
    /// Save the snapshot to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CleanflowError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            CleanflowError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            CleanflowError::Persistence(format!("Failed to serialize drafts: {}", e))
        })
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            CleanflowError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CleanflowError::Persistence(format!(
                "Failed to parse drafts '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

impl EditSession {
    /// Capture the current drafts.
    pub fn snapshot(&self, source_hash: Option<String>) -> DraftSnapshot {
        DraftSnapshot {
            source_hash,
            saved_at: Utc::now(),
            edits: self.diff(),
        }
    }

    /// Replace the drafts with a snapshot's edits.
    ///
    /// Fails without changing the session if an edit targets a read-only
    /// column or a cell the loaded file does not have.
    pub fn restore(&mut self, snapshot: &DraftSnapshot) -> Result<usize> {
        let mut buffer = EditBuffer::new();
        for edit in &snapshot.edits {
            if !self.config().is_editable(&edit.column) {
                return Err(CleanflowError::ReadOnlyColumn(edit.column.clone()));
            }
            if self.baseline().table().get(&edit.row_id, &edit.column).is_none() {
                return Err(CleanflowError::unknown_cell(&edit.row_id, &edit.column));
            }
            buffer.set(&edit.row_id, &edit.column, edit.after.as_str());
        }

        let restored = buffer.len();
        self.restore_buffer(buffer);
        Ok(restored)
    }
}

/// Default drafts path for a quarantine file: `<stem>.drafts.json` beside it.
pub fn drafts_path(data_path: impl AsRef<Path>) -> PathBuf {
    let data_path = data_path.as_ref();
    let stem = data_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    data_path.with_file_name(format!("{}.drafts.json", stem))
}
