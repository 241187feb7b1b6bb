//! CSV serialization for row lists.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{CleanflowError, Result};

/// Serialize rows to CSV text.
///
/// Headers come from the key order of the first row; later rows are read by
/// those headers, with missing keys written as empty values. Lines are joined
/// with `\n` and there is no trailing newline. Zero rows produce an empty
/// string, not a header line.
///
/// ```
/// use cleanflow::output::rows_to_csv;
/// use cleanflow::Row;
///
/// let mut row = Row::new();
/// row.insert("a".into(), "x\"y".into());
/// row.insert("b".into(), "1,2".into());
/// assert_eq!(rows_to_csv(&[row]), "a,b\n\"x\"\"y\",\"1,2\"");
/// ```
pub fn rows_to_csv(rows: &[IndexMap<String, String>]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_line(headers.iter().copied()));

    for row in rows {
        lines.push(join_line(
            headers
                .iter()
                .map(|h| row.get(*h).map(|v| v.as_str()).unwrap_or("")),
        ));
    }

    let csv = lines.join("\n");
    debug!(rows = rows.len(), bytes = csv.len(), "serialized csv");
    csv
}

/// Quote a value if it contains a delimiter, quote, or line break.
pub fn escape_value(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize rows and write them to a file.
pub fn write_csv(path: impl AsRef<Path>, rows: &[IndexMap<String, String>]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| CleanflowError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(path, rows_to_csv(rows)).map_err(|e| CleanflowError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn join_line<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.map(escape_value).collect::<Vec<_>>().join(",")
}
