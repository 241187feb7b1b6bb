//! Property-based tests for the CSV tokenizers, serializer and validator.
//!
//! These tests use proptest to generate random inputs and verify that the
//! parsing core maintains its invariants under all conditions.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: tokenizers, validation and stats never crash on any input
//! 2. **Round-trip**: serializing then parsing with the full-text tokenizer is lossless
//! 3. **Agreement**: both tokenizers (and the `csv` crate) agree on well-formed input
//! 4. **Invariants**: every row has every column and a non-empty `row_id`
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p cleanflow --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p cleanflow --test property_tests
//! ```

use indexmap::IndexMap;
use proptest::prelude::*;

use cleanflow::input::{split_csv_line, AdvancedCsv, CsvStrategy, LegacyCsv};
use cleanflow::{
    csv_stats, parse_advanced_csv, parse_legacy_csv, rows_to_csv, rule_meta, validate_csv, Row,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary text built from the characters that matter to the tokenizer.
fn csv_noise() -> impl Strategy<Value = String> {
    "[a-c,\"\r\n ]{0,200}"
}

/// Cell values without line breaks; some need quoting.
fn single_line_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_.]{0,12}",
        "[a-z ,]{1,12}",
        "[a-z\"]{1,12}",
    ]
}

/// Cell values that may span lines.
fn any_value() -> impl Strategy<Value = String> {
    prop_oneof![single_line_value(), "[a-z,\"\n\r]{1,12}"]
}

/// Distinct non-blank header names.
fn headers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..6)
        .prop_map(|set| {
            let mut headers: Vec<String> = set.into_iter().filter(|h| h != "row_id").collect();
            if headers.is_empty() {
                headers.push("value".to_string());
            }
            headers
        })
}

/// Rows for the given headers, each with a leading sequential `row_id`.
fn rows_for(
    headers: Vec<String>,
    value: impl Strategy<Value = String>,
) -> impl Strategy<Value = Vec<Row>> {
    let width = headers.len();
    prop::collection::vec(prop::collection::vec(value, width), 1..8).prop_map(move |records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, values)| {
                let mut row = IndexMap::new();
                row.insert("row_id".to_string(), (i + 1).to_string());
                for (h, v) in headers.iter().zip(values) {
                    row.insert(h.clone(), v);
                }
                row
            })
            .collect()
    })
}

fn table_rows() -> impl Strategy<Value = Vec<Row>> {
    headers().prop_flat_map(|h| rows_for(h, any_value()))
}

fn single_line_rows() -> impl Strategy<Value = Vec<Row>> {
    headers().prop_flat_map(|h| rows_for(h, single_line_value()))
}

// =============================================================================
// Tokenizer Properties
// =============================================================================

mod tokenizer_tests {
    use super::*;

    proptest! {
        /// Neither tokenizer panics on arbitrary input.
        #[test]
        fn never_panics(input in csv_noise()) {
            let _ = LegacyCsv.records(&input);
            let _ = AdvancedCsv.records(&input);
            let _ = split_csv_line(&input);
        }

        /// Parsing never panics on random UTF-8.
        #[test]
        fn never_panics_on_random_text(input in any::<String>()) {
            let _ = parse_advanced_csv(&input);
            let _ = parse_legacy_csv(&input);
        }

        /// Every row has every column and a non-empty row_id.
        #[test]
        fn rows_are_complete(input in csv_noise()) {
            let table = parse_advanced_csv(&input);
            if table.column_count() > 0 {
                prop_assert!(table.columns().iter().any(|c| c == "row_id"));
            }
            for row in table.rows() {
                for column in table.columns() {
                    prop_assert!(row.contains_key(column));
                }
                prop_assert!(!row["row_id"].trim().is_empty());
            }
        }

        /// Without quotes, splitting a line is plain comma splitting.
        #[test]
        fn unquoted_split_matches_str_split(line in "[a-z ,]{0,40}") {
            let expected: Vec<String> = line.split(',').map(String::from).collect();
            prop_assert_eq!(split_csv_line(&line), expected);
        }
    }
}

// =============================================================================
// Serializer Properties
// =============================================================================

mod serializer_tests {
    use super::*;

    proptest! {
        /// Serializing then parsing with the full-text tokenizer is lossless.
        #[test]
        fn round_trip_advanced(rows in table_rows()) {
            let table = parse_advanced_csv(&rows_to_csv(&rows));

            let expected_columns: Vec<String> = rows[0].keys().cloned().collect();
            prop_assert_eq!(table.columns(), expected_columns.as_slice());
            prop_assert_eq!(table.rows(), rows.as_slice());
        }

        /// On single-line values the two strategies agree.
        #[test]
        fn strategies_agree_on_single_line_values(rows in single_line_rows()) {
            let text = rows_to_csv(&rows);
            prop_assert_eq!(parse_legacy_csv(&text), parse_advanced_csv(&text));
        }

        /// Serialized output is valid CSV as read by the `csv` crate.
        #[test]
        fn csv_crate_reads_serialized_output(rows in table_rows()) {
            let text = rows_to_csv(&rows);
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_reader(text.as_bytes());

            let headers: Vec<String> = reader
                .headers()
                .expect("headers")
                .iter()
                .map(String::from)
                .collect();
            let expected: Vec<String> = rows[0].keys().cloned().collect();
            prop_assert_eq!(headers, expected);

            let records: Vec<csv::StringRecord> = reader
                .records()
                .collect::<Result<_, _>>()
                .expect("records");
            prop_assert_eq!(records.len(), rows.len());
            for (record, row) in records.iter().zip(&rows) {
                let values: Vec<&str> = row.values().map(String::as_str).collect();
                prop_assert_eq!(record.iter().collect::<Vec<_>>(), values);
            }
        }
    }
}

// =============================================================================
// Validation Properties
// =============================================================================

mod validation_tests {
    use super::*;

    proptest! {
        /// Validation and stats never panic and stay self-consistent.
        #[test]
        fn validation_is_total(input in csv_noise()) {
            let result = validate_csv(&input);
            prop_assert_eq!(result.valid, result.errors.is_empty());

            let stats = csv_stats(&input);
            prop_assert_eq!(stats.total_cells, stats.row_count * stats.column_count);
            prop_assert!(stats.empty_cells <= stats.total_cells);
            prop_assert_eq!(stats.has_headers, stats.column_count > 0);
        }

        /// Serialized tables always validate.
        #[test]
        fn serialized_tables_validate(rows in single_line_rows()) {
            prop_assert!(validate_csv(&rows_to_csv(&rows)).valid);
        }
    }
}

// =============================================================================
// Rule Registry Properties
// =============================================================================

mod rule_tests {
    use super::*;

    proptest! {
        /// Lookup is total and case-insensitive.
        #[test]
        fn lookup_is_total(id in "[rRxX]?[0-9]{0,3}") {
            let upper = rule_meta(Some(id.to_uppercase().as_str()));
            let lower = rule_meta(Some(id.to_lowercase().as_str()));
            prop_assert_eq!(&upper, &lower);
            prop_assert!(!upper.name.is_empty());
        }
    }
}
