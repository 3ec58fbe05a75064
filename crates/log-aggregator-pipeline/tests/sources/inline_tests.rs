// crates/log-aggregator-pipeline/tests/sources/inline_tests.rs
// ============================================================================
// Module: InlineSource Unit Tests
// Description: Tests for the scripted in-memory record source.
// Purpose: Validate ordering, provenance labels, and stream closure.
// Dependencies: log-aggregator-pipeline, tokio
// ============================================================================

//! ## Overview
//! Exercises [`log_aggregator_pipeline::InlineSource`] poll behavior.

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

use log_aggregator_pipeline::InlineSource;
use log_aggregator_pipeline::Polled;
use log_aggregator_pipeline::RecordSource;

/// A poll timeout irrelevant to the inline source.
const TIMEOUT: Duration = Duration::from_millis(10);

/// Tests payloads are yielded in script order, then the stream closes.
#[tokio::test]
async fn yields_in_order_then_closes() {
    let mut source = InlineSource::new([b"one".to_vec(), b"two".to_vec()]);

    let first = source.poll(TIMEOUT).await.expect("first poll");
    let Polled::Record(record) = first else {
        panic!("expected a record, got {first:?}");
    };
    assert_eq!(record.bytes, b"one");
    assert_eq!(record.origin.as_deref(), Some("inline[0]"));

    let second = source.poll(TIMEOUT).await.expect("second poll");
    let Polled::Record(record) = second else {
        panic!("expected a record, got {second:?}");
    };
    assert_eq!(record.bytes, b"two");

    assert_eq!(source.poll(TIMEOUT).await.expect("third poll"), Polled::Closed);
    assert_eq!(source.yielded(), 2);
}

/// Tests an empty script closes immediately.
#[tokio::test]
async fn empty_script_closes_immediately() {
    let mut source = InlineSource::default();
    assert_eq!(source.poll(TIMEOUT).await.expect("poll"), Polled::Closed);
}

/// Tests pushed payloads extend the script.
#[tokio::test]
async fn pushed_payloads_are_yielded() {
    let mut source = InlineSource::default();
    source.push(b"late".to_vec());
    let polled = source.poll(TIMEOUT).await.expect("poll");
    let Polled::Record(record) = polled else {
        panic!("expected a record, got {polled:?}");
    };
    assert_eq!(record.bytes, b"late");
}
