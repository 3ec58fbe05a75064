// crates/log-aggregator-pipeline/tests/sources/line_tests.rs
// ============================================================================
// Module: LineSource Unit Tests
// Description: Tests for the newline-delimited payload source.
// Purpose: Validate line framing, idle timeouts, and end of input.
// Dependencies: log-aggregator-pipeline, tokio
// ============================================================================

//! ## Overview
//! Exercises [`log_aggregator_pipeline::LineSource`] over an in-memory
//! duplex stream standing in for standard input.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::time::Duration;

use log_aggregator_pipeline::LineSource;
use log_aggregator_pipeline::Polled;
use log_aggregator_pipeline::RecordSource;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;

/// Bounded wait used for polls that should find data immediately.
const TIMEOUT: Duration = Duration::from_millis(200);
/// Bounded wait used for polls that should time out.
const SHORT: Duration = Duration::from_millis(20);

/// Tests each written line arrives as one record, in order.
#[tokio::test]
async fn lines_arrive_in_order() {
    let (mut writer, reader) = tokio::io::duplex(256);
    let mut source = LineSource::new(BufReader::new(reader));

    writer.write_all(b"alpha\nbeta\n").await.expect("write lines");

    let first = source.poll(TIMEOUT).await.expect("first poll");
    let Polled::Record(record) = first else {
        panic!("expected a record, got {first:?}");
    };
    assert_eq!(record.bytes, b"alpha");
    assert_eq!(record.origin.as_deref(), Some("line 1"));

    let second = source.poll(TIMEOUT).await.expect("second poll");
    let Polled::Record(record) = second else {
        panic!("expected a record, got {second:?}");
    };
    assert_eq!(record.bytes, b"beta");
}

/// Tests a poll with no pending input reports idle within the bounded wait.
#[tokio::test]
async fn quiet_stream_reports_idle() {
    let (_writer, reader) = tokio::io::duplex(256);
    let mut source = LineSource::new(BufReader::new(reader));
    assert_eq!(source.poll(SHORT).await.expect("poll"), Polled::Idle);
}

/// Tests blank lines are skipped rather than forwarded.
#[tokio::test]
async fn blank_lines_are_skipped() {
    let (mut writer, reader) = tokio::io::duplex(256);
    let mut source = LineSource::new(BufReader::new(reader));

    writer.write_all(b"\n  \npayload\n").await.expect("write lines");

    assert_eq!(source.poll(TIMEOUT).await.expect("first poll"), Polled::Idle);
    assert_eq!(source.poll(TIMEOUT).await.expect("second poll"), Polled::Idle);
    let third = source.poll(TIMEOUT).await.expect("third poll");
    let Polled::Record(record) = third else {
        panic!("expected a record, got {third:?}");
    };
    assert_eq!(record.bytes, b"payload");
}

/// Tests end of input closes the stream.
#[tokio::test]
async fn end_of_input_closes_stream() {
    let (mut writer, reader) = tokio::io::duplex(256);
    let mut source = LineSource::new(BufReader::new(reader));

    writer.write_all(b"only\n").await.expect("write line");
    writer.shutdown().await.expect("shutdown writer");
    drop(writer);

    let first = source.poll(TIMEOUT).await.expect("first poll");
    assert!(matches!(first, Polled::Record(_)));
    assert_eq!(source.poll(TIMEOUT).await.expect("second poll"), Polled::Closed);
}
