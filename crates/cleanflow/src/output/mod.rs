//! Output encoding: CSV serialization of edited rows.

mod serializer;

pub use serializer::{escape_value, rows_to_csv, write_csv};
