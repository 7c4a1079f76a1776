use std::path::PathBuf;

use chrono::TimeDelta;

use timeline_tracing::input::{load_records, FieldNames};
use timeline_tracing::{reconstruct_events, SelectionStrategy, ThresholdSelection};

use test_helpers::*;

fn test_fields() -> FieldNames {
    FieldNames {
        id: "trace_id".to_string(),
        timestamp: "ts".to_string(),
        message: "msg".to_string(),
    }
}

fn write_csv(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_load_records_extracts_the_configured_columns() {
    let (_dir, path) = write_csv(
        "ts,trace_id,msg,host\n\
         2024-05-01 10:00:00,A,start op X,web-1\n\
         2024-05-01 10:00:02,A,end op X,web-1\n",
    );

    let records = load_records(path.to_str().unwrap(), &test_fields()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "A");
    assert_eq!(records[0].timestamp, "2024-05-01 10:00:00");
    assert_eq!(records[0].message, "start op X");
    assert_eq!(records[1].message, "end op X");
}

#[test]
fn test_quoted_csv_fields_are_unquoted_by_the_reader() {
    let (_dir, path) = write_csv(
        "ts,trace_id,msg\n\
         2024-05-01 10:00:00,\"A,B\",\"start, with comma\"\n",
    );

    let records = load_records(path.to_str().unwrap(), &test_fields()).unwrap();

    assert_eq!(records[0].id, "A,B");
    assert_eq!(records[0].message, "start, with comma");
}

#[test]
fn test_missing_configured_column_is_fatal() {
    let (_dir, path) = write_csv("ts,msg\n2024-05-01 10:00:00,start\n");

    let error = load_records(path.to_str().unwrap(), &test_fields()).unwrap_err();

    let message = format!("{error:#}");
    assert!(message.contains("trace_id"), "got: {message}");
    assert!(message.contains("not found in header"), "got: {message}");
}

#[test]
fn test_unreadable_file_is_fatal() {
    let error = load_records("/nonexistent/log.csv", &test_fields()).unwrap_err();

    assert!(format!("{error:#}").contains("failed to read the file"));
}

#[test]
fn test_rows_with_uneven_field_counts_are_fatal() {
    let (_dir, path) = write_csv(
        "ts,trace_id,msg\n\
         2024-05-01 10:00:00,A\n",
    );

    assert!(load_records(path.to_str().unwrap(), &test_fields()).is_err());
}

#[test]
fn test_csv_to_timeline_pipeline() {
    let (_dir, path) = write_csv(
        "ts,trace_id,msg\n\
         2024-05-01 10:00:02,A,end op X\n\
         2024-05-01 10:00:00,A,start op X\n",
    );

    let records = load_records(path.to_str().unwrap(), &test_fields()).unwrap();
    let reconstruction = reconstruct_events(&records, &create_test_config()).unwrap();
    let selected = ThresholdSelection {
        threshold: TimeDelta::seconds(1),
    }
    .select(&reconstruction.events);

    let view = &selected["A"];
    assert_eq!(view.slices.len(), 1);
    assert_eq!(view.slices[0].operation, "X");
    assert_eq!(view.slices[0].end - view.slices[0].begin, 2000);
}
