//! Quarantine editor state.
//!
//! An [`EditSession`] owns the loaded file as a baseline and an
//! [`EditBuffer`] of drafts keyed by `(row_id, column)`. Typing into the
//! active cell updates its draft immediately; [`diff_cells`] compares the
//! drafts with the baseline and is usable on its own.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use cleanflow::editor::{Deactivation, EditSession};
//! use cleanflow::provenance::AnnotatedTable;
//! use cleanflow::input::parse_csv;
//!
//! let table = parse_csv("name,amount\nAcme,10\n");
//! let mut session = EditSession::open(AnnotatedTable::new(table, HashMap::new()));
//!
//! session.activate("1", "amount").unwrap();
//! session.input("12").unwrap();
//! session.deactivate(Deactivation::Enter);
//!
//! assert_eq!(session.diff().len(), 1);
//! let commit = session.commit().unwrap();
//! assert_eq!(commit.table.to_csv(), "row_id,name,amount\n1,Acme,12");
//! ```

mod buffer;
mod persistence;
mod session;

pub use buffer::{apply_edits, diff_cells, CellEdit, CellKey, EditBuffer};
pub use persistence::{drafts_path, DraftSnapshot};
pub use session::{CellView, Commit, Deactivation, EditSession, EditorConfig};
