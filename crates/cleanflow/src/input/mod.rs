//! Input parsing: tokenizers, table building and file loading.

mod parser;
mod source;
mod table;
mod tokenizer;

pub use parser::{parse_advanced_csv, parse_csv, parse_legacy_csv, Parser, ParserConfig};
pub use source::{content_hash, SourceMetadata};
pub use table::{Row, Table, ROW_ID};
pub use tokenizer::{split_csv_line, AdvancedCsv, CsvStrategy, LegacyCsv, ParseStrategy, Record};
