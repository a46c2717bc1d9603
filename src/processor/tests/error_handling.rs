//! Error handling integration tests

use super::{MBUS_LOG, write_log};
use crate::config::ProcessorConfig;
use crate::error::FhemError;
use crate::models::FileStatus;
use crate::processor::{LogProcessor, process_single_file};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn test_config() -> ProcessorConfig {
    ProcessorConfig::default()
        .without_progress()
        .with_workers(2)
        .with_preview_rows(0)
}

#[tokio::test]
async fn test_no_files_for_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let pattern = temp_dir
        .path()
        .join("mbus-*.log")
        .to_string_lossy()
        .to_string();

    let processor = LogProcessor::new(test_config()).unwrap();
    let result = processor.process_pattern(&pattern).await;

    match result {
        Err(FhemError::NoFilesFound { pattern: p }) => assert_eq!(p, pattern),
        other => panic!("Expected NoFilesFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_file_does_not_abort_run() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_log(temp_dir.path(), "a.log", MBUS_LOG.as_bytes());
    let missing = temp_dir.path().join("rotated-away.log");
    let last = write_log(temp_dir.path(), "c.log", MBUS_LOG.as_bytes());

    let processor = LogProcessor::new(test_config()).unwrap();
    let stats = processor
        .process_files(&[first, missing, last])
        .await
        .unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.total_rows(), 6);
}

#[test]
fn test_single_missing_file_reports_failure() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.log");

    let report = process_single_file(&missing, &test_config()).unwrap();

    match report.status {
        FileStatus::Failed(reason) => assert!(reason.contains("missing.log")),
        other => panic!("Expected Failed status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_run_processes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(temp_dir.path(), "a.log", MBUS_LOG.as_bytes());

    let token = CancellationToken::new();
    token.cancel();

    let processor = LogProcessor::new(test_config())
        .unwrap()
        .with_cancellation(token);
    let stats = processor.process_files(&[path]).await.unwrap();

    assert_eq!(stats.files_processed, 0);
    assert_eq!(stats.total_rows(), 0);
}

#[test]
fn test_zero_workers_rejected() {
    let result = LogProcessor::new(test_config().with_workers(0));
    assert!(matches!(result, Err(FhemError::Configuration { .. })));
}

#[tokio::test]
async fn test_export_dir_blocked_by_file() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = write_log(temp_dir.path(), "processed", b"not a directory");
    let path = write_log(temp_dir.path(), "a.log", MBUS_LOG.as_bytes());

    let processor = LogProcessor::new(test_config().with_export_dir(blocker.join("out"))).unwrap();
    let result = processor.process_files(&[path]).await;

    assert!(matches!(result, Err(FhemError::Export { .. })));
}
