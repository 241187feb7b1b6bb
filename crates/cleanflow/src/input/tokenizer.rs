//! Lenient CSV tokenizers.
//!
//! Both strategies share the same quoting rules and never fail: an
//! unbalanced quote turns every later delimiter (and, for the full-text
//! strategy, every later newline) into literal content.

use serde::{Deserialize, Serialize};

/// A raw record: the cells of one logical CSV row, before header mapping.
pub type Record = Vec<String>;

/// A tokenizer that turns CSV text into raw records.
pub trait CsvStrategy {
    /// Short name used in logs and CLI output.
    fn name(&self) -> &'static str;

    /// Split the text into records. Blank lines are not returned.
    fn records(&self, text: &str) -> Vec<Record>;
}

/// Line-based tokenizer.
///
/// Splits on `\n`/`\r\n` first, so a quoted value containing a newline is
/// broken across records. Kept for callers that depend on that behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyCsv;

impl CsvStrategy for LegacyCsv {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn records(&self, text: &str) -> Vec<Record> {
        text.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(split_csv_line)
            .collect()
    }
}

/// Full-text tokenizer: newlines only end a record outside quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedCsv;

impl CsvStrategy for AdvancedCsv {
    fn name(&self) -> &'static str {
        "advanced"
    }

    fn records(&self, text: &str) -> Vec<Record> {
        let mut records = Vec::new();
        let mut record: Record = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        // Whether the current record opened a quote; such a record is never a blank line.
        let mut quoted = false;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '"' => {
                    in_quotes = true;
                    quoted = true;
                }
                ',' if !in_quotes => record.push(std::mem::take(&mut field)),
                '\r' | '\n' if !in_quotes => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    record.push(std::mem::take(&mut field));
                    push_record(&mut records, std::mem::take(&mut record), quoted);
                    quoted = false;
                }
                c => field.push(c),
            }
        }

        if !field.is_empty() || !record.is_empty() || quoted {
            record.push(field);
            push_record(&mut records, record, quoted);
        }

        records
    }
}

/// Which tokenizer a parser uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    /// Full-text state machine; preserves quoted newlines.
    #[default]
    Advanced,
    /// Line-based splitting.
    Legacy,
}

impl ParseStrategy {
    /// The tokenizer implementing this strategy.
    pub fn tokenizer(&self) -> &'static dyn CsvStrategy {
        match self {
            ParseStrategy::Advanced => &AdvancedCsv,
            ParseStrategy::Legacy => &LegacyCsv,
        }
    }
}

/// Split one physical line into cells.
///
/// ```
/// use cleanflow::input::split_csv_line;
///
/// assert_eq!(split_csv_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
/// ```
pub fn split_csv_line(line: &str) -> Record {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }

    cells.push(current);
    cells
}

/// Drop records that came from blank lines, matching the line-based filter.
fn push_record(records: &mut Vec<Record>, record: Record, quoted: bool) {
    let blank_line = !quoted && record.len() == 1 && record[0].trim().is_empty();
    if !blank_line {
        records.push(record);
    }
}
