//! Cell provenance: what the DQ rules did to each cell and why.
//!
//! The external rule engine attaches a [`DqMetadata`] bundle to each row.
//! Per column, a recorded change makes the cell `fixed`, otherwise a recorded
//! error makes it `quarantined`, otherwise it is `clean`. A column listed in
//! both maps is reported as `fixed`.

mod annotated;
mod cell;
mod metadata;

pub use annotated::{split_dq_columns, AnnotatedTable, Cell, QuarantineFile, QuarantineSummary};
pub use cell::{derive_cell_status, CellStatus};
pub use metadata::{value_to_text, DqChange, DqMetadata, DqStatus, DQ_CHANGES, DQ_ERRORS, DQ_STATUS};
