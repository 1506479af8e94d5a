//! Tests for rows with fewer columns than the schema requires.

mod helpers;

use helpers::{count_rows, report_row, test_config, write_input};
use table_loader::run_load;
use tempfile::TempDir;

#[tokio::test]
async fn test_short_row_is_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    let row1 = report_row("r-001");
    let short = r#""2024-01-01","AcmeCorp","ACM""#;
    let row3 = report_row("r-003");
    let input = write_input(dir.path(), "input.csv", &[&row1, short, &row3]);
    let db_path = dir.path().join("out.db");

    let report = run_load(test_config(&input, &db_path, "reports"))
        .await
        .unwrap();

    // The short row is skipped; processing continues with the next row
    assert_eq!(report.records_read, 2);
    assert_eq!(report.records_skipped, 1);
    assert_eq!(report.records_written, 2);
    assert_eq!(report.records_failed, 0);

    assert_eq!(report.shape_mismatches.len(), 1);
    let mismatch = &report.shape_mismatches[0];
    assert_eq!(mismatch.row_index, 2);
    assert_eq!(mismatch.expected, 8);
    assert_eq!(mismatch.actual, 3);

    assert_eq!(count_rows(&db_path, "reports").await, 2);
}

#[tokio::test]
async fn test_leading_short_row_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let mut lines = vec!["only,two".to_string()];
    for i in 0..10 {
        lines.push(report_row(&format!("r-{i:02}")));
    }
    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let input = write_input(dir.path(), "input.csv", &line_refs);

    let report = run_load(test_config(&input, &dir.path().join("out.db"), "reports"))
        .await
        .unwrap();

    assert_eq!(report.records_read, 10);
    assert_eq!(report.records_skipped, 1);
    assert_eq!(report.records_written, 10);
    assert_eq!(report.shape_mismatches[0].row_index, 1);
}

#[tokio::test]
async fn test_multiple_short_rows_each_reported() {
    let dir = TempDir::new().unwrap();
    let row2 = report_row("r-001");
    let input = write_input(dir.path(), "input.csv", &["a,b", &row2, "c"]);

    let report = run_load(test_config(&input, &dir.path().join("out.db"), "reports"))
        .await
        .unwrap();

    assert_eq!(report.records_skipped, 2);
    assert_eq!(report.shape_mismatches.len(), 2);
    assert_eq!(report.shape_mismatches[0].row_index, 1);
    assert_eq!(report.shape_mismatches[0].actual, 2);
    assert_eq!(report.shape_mismatches[1].row_index, 3);
    assert_eq!(report.shape_mismatches[1].actual, 1);
}
