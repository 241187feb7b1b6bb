//! Integration tests for CleanFlow.

use std::collections::HashMap;
use std::io::Write;

use tempfile::NamedTempFile;

use cleanflow::editor::{diff_cells, DraftSnapshot, EditBuffer};
use cleanflow::input::split_csv_line;
use cleanflow::provenance::split_dq_columns;
use cleanflow::{
    csv_stats, parse_advanced_csv, parse_legacy_csv, rows_to_csv, rule_meta, validate_csv,
    write_csv, AnnotatedTable, CellStatus, Deactivation, DqChange, DqMetadata, DqStatus,
    EditSession, ParserConfig, QuarantineFile, Row, Severity,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Tokenizer Properties
// =============================================================================

#[test]
fn test_quoted_delimiter() {
    assert_eq!(split_csv_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
}

#[test]
fn test_escaped_quotes() {
    assert_eq!(
        split_csv_line(r#"a,"He said ""hi""",b"#),
        vec!["a", r#"He said "hi""#, "b"]
    );
}

#[test]
fn test_header_defaulting() {
    for table in [parse_legacy_csv(",b\n1,2\n"), parse_advanced_csv(",b\n1,2\n")] {
        assert_eq!(table.columns(), ["row_id", "column_1", "b"]);
    }
}

#[test]
fn test_row_id_synthesis() {
    let table = parse_advanced_csv("name,amount\nAcme,10\nGlobex,20\n");
    assert_eq!(table.rows()[0]["row_id"], "1");
    assert_eq!(table.rows()[1]["row_id"], "2");
}

#[test]
fn test_partial_row_ids_stay_addressable() {
    let table = parse_advanced_csv("row_id,v\n2,a\n,b\n");
    assert_eq!(table.get("2", "v"), Some("a"));
    assert_eq!(table.get("3", "v"), Some("b"));

    let mut session = EditSession::open(AnnotatedTable::new(table, HashMap::new()));
    session.set_value("3", "v", "c").unwrap();
    let commit = session.commit().unwrap();
    assert_eq!(commit.edits.len(), 1);
    assert_eq!(commit.table.to_csv(), "row_id,v\n2,a\n3,c");
}

#[test]
fn test_quoted_empty_header_agrees() {
    assert_eq!(parse_advanced_csv("\"\""), parse_legacy_csv("\"\""));
    assert_eq!(parse_advanced_csv("\"\"").columns(), ["row_id", "column_1"]);
}

#[test]
fn test_empty_row_filtering() {
    for table in [
        parse_legacy_csv("a,b,c,d\n1,2,3,4\n,,,\n"),
        parse_advanced_csv("a,b,c,d\n1,2,3,4\n,,,\n"),
    ] {
        assert_eq!(table.row_count(), 1);
    }
}

#[test]
fn test_unbalanced_quotes_do_not_fail() {
    let table = parse_advanced_csv("a,b\n1,\"open\n2,3\n");
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.get("1", "b"), Some("open\n2,3\n"));

    let legacy = parse_legacy_csv("a,b\n1,\"open\n2,3\n");
    assert_eq!(legacy.row_count(), 2);
}

// =============================================================================
// Serializer
// =============================================================================

#[test]
fn test_serializer_escaping() {
    let csv = rows_to_csv(&[row(&[("a", "x\"y"), ("b", "1,2")])]);
    assert_eq!(csv, "a,b\n\"x\"\"y\",\"1,2\"");
}

#[test]
fn test_round_trip_preserves_columns_and_values() {
    let text = "row_id,vendor,memo,amount\n\
                1,\"Acme, Inc\",\"two\nlines\",\"1,200.00\"\n\
                2,Globex,\"said \"\"ok\"\"\",\n";
    let table = parse_advanced_csv(text);
    let again = parse_advanced_csv(&rows_to_csv(table.rows()));

    assert_eq!(again.columns(), table.columns());
    assert_eq!(again.rows(), table.rows());
}

// =============================================================================
// Validation & Statistics
// =============================================================================

#[test]
fn test_validation_mismatch() {
    let result = validate_csv("a,b,c\n1,2\n");
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Row 1"));
    assert!(result.errors[0].contains("Expected 3 columns, found 2"));
}

#[test]
fn test_validation_accumulates() {
    let result = validate_csv("a,b\n1\n2,3,4\n5,6\n");
    assert_eq!(result.errors.len(), 2);
    assert!(!result.valid);
}

#[test]
fn test_stats() {
    let stats = csv_stats("vendor,amount\nAcme,\nGlobex,20\n");
    assert_eq!(stats.row_count, 2);
    assert_eq!(stats.column_count, 3);
    assert_eq!(stats.total_cells, 6);
    assert_eq!(stats.empty_cells, 1);
    assert!(stats.has_headers);
}

// =============================================================================
// Rule Registry
// =============================================================================

#[test]
fn test_rule_lookup_default() {
    let meta = rule_meta(Some("R99"));
    assert_eq!(meta.name, "R99");
    assert_eq!(meta.severity, Severity::Info);
    assert_eq!(meta.description, "No description available.");

    let unknown = rule_meta(None);
    assert_eq!(unknown.name, "Unknown rule");
    assert_eq!(unknown.severity, Severity::Info);
}

#[test]
fn test_rule_lookup_known() {
    for id in ["R1", "r17", "R34"] {
        assert_eq!(rule_meta(Some(id)).severity, Severity::Critical);
    }
}

// =============================================================================
// Provenance
// =============================================================================

#[test]
fn test_cell_status_precedence() {
    let table = parse_advanced_csv("row_id,amount\n1,10.00\n");
    let mut metadata = HashMap::new();
    metadata.insert(
        "1".to_string(),
        DqMetadata::new()
            .with_change("amount", DqChange::new("10", "R9"))
            .with_error("amount", "bad"),
    );
    let annotated = AnnotatedTable::new(table, metadata);

    assert_eq!(
        annotated.status("1", "amount"),
        CellStatus::Fixed {
            original_value: "10".to_string(),
            rule_id: "R9".to_string(),
        }
    );
}

#[test]
fn test_metadata_from_engine_json() {
    let json = r#"{
        "17": {
            "dq_status": "quarantined",
            "dq_changes": {"vendor": {"original": "  acme ", "rule_id": "R10"}},
            "dq_errors": {"tax_id": "R17: checksum failed"}
        }
    }"#;
    let metadata: HashMap<String, DqMetadata> = serde_json::from_str(json).unwrap();
    let table = parse_advanced_csv("row_id,vendor,tax_id\n17,Acme,123\n");
    let annotated = AnnotatedTable::new(table, metadata);

    assert_eq!(annotated.row_status("17"), DqStatus::Quarantined);
    assert_eq!(annotated.status("17", "vendor").kind(), DqStatus::Fixed);
    assert_eq!(
        annotated.status("17", "tax_id").severity(),
        Some(Severity::Critical)
    );
}

// =============================================================================
// File-backed Workflow
// =============================================================================

#[test]
fn test_load_edit_export() {
    let content = "row_id,vendor,amount,dq_status,dq_errors\n\
                   1,Acme,100,clean,\n\
                   2,Globex,abc,quarantined,\"{\"\"amount\"\": \"\"R5: not a number\"\"}\"\n";
    let file = create_test_file(content);

    let quarantine = QuarantineFile::load(file.path(), &ParserConfig::default()).expect("load");
    assert_eq!(quarantine.source.row_count, 2);
    assert_eq!(quarantine.source.column_count, 3);
    assert_eq!(
        quarantine.annotated.summary().quarantined_cells,
        1
    );

    let mut session = EditSession::open(quarantine.annotated);
    session.activate("2", "amount").unwrap();
    session.input("250").unwrap();
    session.deactivate(Deactivation::Blur);

    let view = session.cell_view("2", "amount").unwrap();
    assert!(view.edited);
    assert_eq!(view.status.kind(), DqStatus::Quarantined);

    let commit = session.commit().unwrap();
    assert_eq!(commit.edits.len(), 1);

    let out = tempfile::tempdir().unwrap();
    let out_path = out.path().join("edited.csv");
    write_csv(&out_path, commit.table.rows()).unwrap();
    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, "row_id,vendor,amount\n1,Acme,100\n2,Globex,250");
}

#[test]
fn test_legacy_config_on_load() {
    let file = create_test_file("id,memo\n1,\"a\nb\"\n");
    let legacy = QuarantineFile::load(file.path(), &ParserConfig::legacy()).unwrap();
    let advanced = QuarantineFile::load(file.path(), &ParserConfig::default()).unwrap();

    assert_eq!(legacy.annotated.table().row_count(), 2);
    assert_eq!(advanced.annotated.table().row_count(), 1);
    assert_eq!(legacy.source.hash, advanced.source.hash);
}

#[test]
fn test_split_dq_columns_then_diff() {
    let mut table = parse_advanced_csv("row_id,a,dq_status\n1,x,fixed\n");
    let metadata = split_dq_columns(&mut table).unwrap();
    assert_eq!(metadata["1"].dq_status, Some(DqStatus::Fixed));

    let mut buffer = EditBuffer::new();
    buffer.set("1", "a", "y");
    let edits = diff_cells(&table, &buffer);
    assert_eq!(edits[0].before, "x");
    assert_eq!(edits[0].after, "y");
}

#[test]
fn test_draft_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");
    let table = parse_advanced_csv("a\n1\n");

    let mut session = EditSession::open(AnnotatedTable::new(table.clone(), HashMap::new()));
    session.set_value("1", "a", "2").unwrap();
    session.snapshot(None).save(&path).unwrap();

    let mut resumed = EditSession::open(AnnotatedTable::new(table, HashMap::new()));
    resumed.restore(&DraftSnapshot::load(&path).unwrap()).unwrap();
    assert_eq!(resumed.diff(), session.diff());
}
