// crates/log-aggregator-pipeline/tests/sinks/writer_tests.rs
// ============================================================================
// Module: AppendWriter Unit Tests
// Description: Comprehensive tests for the buffered append writer.
// Purpose: Validate size flushes, interval flushes, and the final flush.
// Dependencies: log-aggregator-pipeline, tempfile, tokio
// ============================================================================

//! ## Overview
//! Exercises [`log_aggregator_pipeline::AppendWriter`] against the handoff
//! queue and both flush triggers.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use log_aggregator_core::LogEntry;
use log_aggregator_core::LogLevel;
use log_aggregator_pipeline::AppendWriter;
use log_aggregator_pipeline::WriterError;
use tempfile::tempdir;
use time::macros::datetime;
use tokio::sync::mpsc;

/// A flush interval long enough to never fire within a test.
const NEVER: Duration = Duration::from_secs(3_600);

/// Returns a deterministic entry whose message carries `tag`.
fn entry(tag: &str) -> LogEntry {
    LogEntry {
        timestamp: datetime!(2026-08-07 09:00:00 UTC),
        level: LogLevel::Info,
        service: "auth-service".to_string(),
        message: tag.to_string(),
        metadata: BTreeMap::new(),
    }
}

/// Parses the file at `path` as a JSON array and returns its messages.
fn messages_on_disk(path: &Path) -> Vec<String> {
    let raw = std::fs::read_to_string(path).expect("read output file");
    let parsed: Vec<LogEntry> = serde_json::from_str(&raw).expect("parse output array");
    parsed.into_iter().map(|item| item.message).collect()
}

// ============================================================================
// SECTION: Policy Tests
// ============================================================================

/// Tests a zero flush threshold is rejected at construction.
#[test]
fn zero_threshold_rejected() {
    let dir = tempdir().expect("temp dir");
    let result = AppendWriter::open(dir.path().join("logs.json"), 0, NEVER);
    assert!(matches!(result, Err(WriterError::InvalidPolicy(_))));
}

/// Tests a zero flush interval is rejected at construction.
#[test]
fn zero_interval_rejected() {
    let dir = tempdir().expect("temp dir");
    let result = AppendWriter::open(dir.path().join("logs.json"), 10, Duration::ZERO);
    assert!(matches!(result, Err(WriterError::InvalidPolicy(_))));
}

/// Tests an unopenable output path is fatal at construction.
#[test]
fn unopenable_path_rejected() {
    let dir = tempdir().expect("temp dir");
    let result = AppendWriter::open(dir.path().join("missing/dir/logs.json"), 10, NEVER);
    assert!(matches!(result, Err(WriterError::Open { .. })));
}

// ============================================================================
// SECTION: Size Trigger Tests
// ============================================================================

/// Tests three entries at threshold three produce one normal flush and no
/// closing token until shutdown.
#[tokio::test]
async fn threshold_triggers_single_normal_flush() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logs.json");
    let writer = AppendWriter::open(&path, 3, NEVER).expect("open writer");
    let (sender, receiver) = mpsc::channel(16);
    let task = tokio::spawn(writer.run(receiver));

    for tag in ["a", "b", "c"] {
        sender.send(entry(tag)).await.expect("send entry");
    }
    // Give the writer a moment to drain and flush the full batch.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let raw = std::fs::read_to_string(&path).expect("read file");
    assert!(raw.contains("\"a\""));
    assert!(raw.contains("\"c\""));
    assert!(!raw.trim_end().ends_with(']'));

    drop(sender);
    let summary = task.await.expect("join writer").expect("clean shutdown");
    assert_eq!(summary.appended, 3);
    assert_eq!(summary.flushes, 2);
    assert_eq!(messages_on_disk(&path), ["a", "b", "c"]);
}

/// Tests entries below the threshold stay pending until shutdown.
#[tokio::test]
async fn below_threshold_defers_to_final_flush() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logs.json");
    let writer = AppendWriter::open(&path, 100, NEVER).expect("open writer");
    let (sender, receiver) = mpsc::channel(16);
    let task = tokio::spawn(writer.run(receiver));

    sender.send(entry("x")).await.expect("send entry");
    sender.send(entry("y")).await.expect("send entry");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(std::fs::read(&path).expect("read file"), b"[\n");

    drop(sender);
    let summary = task.await.expect("join writer").expect("clean shutdown");
    assert_eq!(summary.appended, 2);
    assert_eq!(summary.flushes, 1);
    assert_eq!(messages_on_disk(&path), ["x", "y"]);
}

// ============================================================================
// SECTION: Interval Trigger Tests
// ============================================================================

/// Tests the interval flushes a partial batch.
#[tokio::test]
async fn interval_flushes_partial_batch() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logs.json");
    let writer =
        AppendWriter::open(&path, 100, Duration::from_millis(50)).expect("open writer");
    let (sender, receiver) = mpsc::channel(16);
    let task = tokio::spawn(writer.run(receiver));

    sender.send(entry("solo")).await.expect("send entry");
    tokio::time::sleep(Duration::from_millis(200)).await;
    let raw = std::fs::read_to_string(&path).expect("read file");
    assert!(raw.contains("\"solo\""));
    assert!(!raw.trim_end().ends_with(']'));

    drop(sender);
    let summary = task.await.expect("join writer").expect("clean shutdown");
    assert_eq!(summary.appended, 1);
    assert_eq!(messages_on_disk(&path), ["solo"]);
}

/// Tests idle ticks never modify the file.
#[tokio::test]
async fn idle_ticks_leave_file_untouched() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logs.json");
    let writer =
        AppendWriter::open(&path, 100, Duration::from_millis(20)).expect("open writer");
    let (sender, receiver) = mpsc::channel::<LogEntry>(16);
    let task = tokio::spawn(writer.run(receiver));

    // Several intervals elapse with nothing pending.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(std::fs::read(&path).expect("read file"), b"[\n");

    drop(sender);
    let summary = task.await.expect("join writer").expect("clean shutdown");
    assert_eq!(summary.appended, 0);
    assert!(messages_on_disk(&path).is_empty());
}

// ============================================================================
// SECTION: Shutdown Tests
// ============================================================================

/// Tests queue closure with pending entries writes them and seals the array.
#[tokio::test]
async fn final_flush_writes_pending_then_seals() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logs.json");
    let writer = AppendWriter::open(&path, 100, NEVER).expect("open writer");
    let (sender, receiver) = mpsc::channel(16);

    sender.send(entry("x")).await.expect("send entry");
    sender.send(entry("y")).await.expect("send entry");
    drop(sender);

    let summary = writer.run(receiver).await.expect("clean shutdown");
    assert_eq!(summary.appended, 2);
    assert_eq!(summary.flushes, 1);
    let raw = std::fs::read_to_string(&path).expect("read file");
    assert!(raw.trim_end().ends_with(']'));
    assert_eq!(messages_on_disk(&path), ["x", "y"]);
}

/// Tests a writer restarted over its own output extends the same array.
#[tokio::test]
async fn restarted_writer_extends_array() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logs.json");

    let writer = AppendWriter::open(&path, 2, NEVER).expect("first open");
    let (sender, receiver) = mpsc::channel(16);
    sender.send(entry("a")).await.expect("send entry");
    sender.send(entry("b")).await.expect("send entry");
    sender.send(entry("c")).await.expect("send entry");
    drop(sender);
    writer.run(receiver).await.expect("first run");

    let writer = AppendWriter::open(&path, 2, NEVER).expect("second open");
    let (sender, receiver) = mpsc::channel(16);
    sender.send(entry("d")).await.expect("send entry");
    drop(sender);
    writer.run(receiver).await.expect("second run");

    assert_eq!(messages_on_disk(&path), ["a", "b", "c", "d"]);
}
