//! Tests for the run summary counters (conservation properties).

mod helpers;

use helpers::{count_rows, report_row, test_config, write_input};
use table_loader::{run_load, run_load_with_shutdown};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_worked_example_counts() {
    // A valid row, an empty line, then a second valid row
    let dir = TempDir::new().unwrap();
    let row1 = report_row("r-001");
    let row2 = report_row("r-002");
    let input = write_input(dir.path(), "input.csv", &[&row1, "", &row2]);

    let report = run_load(test_config(&input, &dir.path().join("out.db"), "reports"))
        .await
        .unwrap();

    assert_eq!(report.records_read, 2);
    assert_eq!(report.records_skipped, 1);
    assert_eq!(report.records_written, 2);
    assert_eq!(report.records_failed, 0);
    assert!(report.failed_keys.is_empty());
    assert!(report.aborted.is_none());
}

#[tokio::test]
async fn test_counts_are_conserved_across_batches() {
    // More rows than the default batch size, with blank lines sprinkled in
    let dir = TempDir::new().unwrap();
    let mut lines: Vec<String> = Vec::new();
    let mut blanks = 0;
    for i in 0..60 {
        lines.push(report_row(&format!("r-{i:03}")));
        if i % 10 == 0 {
            lines.push(String::new());
            blanks += 1;
        }
    }
    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let input = write_input(dir.path(), "input.csv", &line_refs);
    let db_path = dir.path().join("out.db");

    let report = run_load(test_config(&input, &db_path, "reports"))
        .await
        .unwrap();

    // read + skipped covers every input line
    assert_eq!(report.records_read + report.records_skipped, 60 + blanks);
    assert_eq!(report.records_read, 60);
    assert_eq!(report.records_skipped, blanks);
    // no record is double-counted or lost
    assert_eq!(
        report.records_written + report.records_failed,
        report.records_read
    );
    assert_eq!(count_rows(&db_path, "reports").await, 60);
}

#[tokio::test]
async fn test_empty_input_yields_zero_counts() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "input.csv", &[]);

    let report = run_load(test_config(&input, &dir.path().join("out.db"), "reports"))
        .await
        .unwrap();

    assert_eq!(report.records_read, 0);
    assert_eq!(report.records_written, 0);
    assert_eq!(report.records_skipped, 0);
    assert_eq!(report.records_failed, 0);
}

#[tokio::test]
async fn test_cancellation_before_start_loads_nothing() {
    // Cancellation is honored between rows; a token cancelled up front
    // stops the run before the first row, with clean zero counts
    let dir = TempDir::new().unwrap();
    let row = report_row("r-001");
    let input = write_input(dir.path(), "input.csv", &[&row]);

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let report = run_load_with_shutdown(
        test_config(&input, &dir.path().join("out.db"), "reports"),
        shutdown,
    )
    .await
    .unwrap();

    assert_eq!(report.records_read, 0);
    assert_eq!(report.records_written, 0);
    assert!(report.aborted.is_none());
}

#[tokio::test]
async fn test_custom_batch_size_loads_everything() {
    // Batch size 1 forces a flush per record; totals must not change
    let dir = TempDir::new().unwrap();
    let rows: Vec<String> = (0..5).map(|i| report_row(&format!("r-{i}"))).collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let input = write_input(dir.path(), "input.csv", &row_refs);
    let db_path = dir.path().join("out.db");

    let mut config = test_config(&input, &db_path, "reports");
    config.batch_size = 1;
    let report = run_load(config).await.unwrap();

    assert_eq!(report.records_written, 5);
    assert_eq!(count_rows(&db_path, "reports").await, 5);
}
