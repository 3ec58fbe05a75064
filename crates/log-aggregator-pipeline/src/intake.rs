// crates/log-aggregator-pipeline/src/intake.rs
// ============================================================================
// Module: Log Aggregator Stream Intake
// Description: Poll-decode-forward loop feeding the handoff queue.
// Purpose: Move valid entries from the record source into the writer queue.
// Dependencies: log-aggregator-core, tokio, tracing
// ============================================================================

//! ## Overview
//! [`run_intake`] continuously polls a [`RecordSource`] with a bounded wait,
//! decodes each payload into a [`LogEntry`], and forwards it into the bounded
//! handoff queue. Malformed payloads are logged and dropped without stopping
//! the loop.
//! Invariants:
//! - A full queue suspends polling (backpressure); entries are never dropped
//!   because the writer is slow.
//! - The queue sender is dropped when the loop returns, which is the
//!   writer's signal that no further entries will arrive.
//! - A decoded entry is always forwarded, even when shutdown is signaled
//!   while the queue is full.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use log_aggregator_core::LogEntry;
use tokio::sync::mpsc;
use tokio::sync::watch;

use crate::source::Polled;
use crate::source::RecordSource;

// ============================================================================
// SECTION: Intake Summary
// ============================================================================

/// Counters reported by the intake loop on termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeSummary {
    /// Records received from the source.
    pub received: u64,
    /// Entries decoded and handed to the queue.
    pub accepted: u64,
    /// Records discarded after a decode failure.
    pub rejected: u64,
    /// Source polls that failed and were skipped.
    pub source_errors: u64,
}

// ============================================================================
// SECTION: Intake Loop
// ============================================================================

/// Polls `source` and forwards decoded entries into the handoff queue.
///
/// Runs until the shutdown signal flips, the source closes, or the writer
/// side of the queue is gone. On return the `entries` sender is dropped,
/// closing the queue.
pub async fn run_intake<S>(
    mut source: S,
    entries: mpsc::Sender<LogEntry>,
    mut shutdown: watch::Receiver<bool>,
    poll_timeout: Duration,
) -> IntakeSummary
where
    S: RecordSource,
{
    let mut summary = IntakeSummary::default();
    loop {
        if *shutdown.borrow() {
            tracing::debug!("shutdown signaled; intake stopping");
            break;
        }
        let polled = tokio::select! {
            _ = shutdown.changed() => {
                tracing::debug!("shutdown signaled; intake stopping");
                break;
            }
            polled = source.poll(poll_timeout) => polled,
        };
        match polled {
            Ok(Polled::Record(record)) => {
                summary.received += 1;
                tracing::debug!(
                    origin = record.origin.as_deref().unwrap_or("upstream"),
                    bytes = record.bytes.len(),
                    "received record"
                );
                match LogEntry::from_json(&record.bytes) {
                    Ok(entry) => {
                        if entries.send(entry).await.is_err() {
                            tracing::warn!("handoff queue closed; intake stopping");
                            break;
                        }
                        summary.accepted += 1;
                    }
                    Err(err) => {
                        summary.rejected += 1;
                        tracing::warn!(
                            origin = record.origin.as_deref().unwrap_or("upstream"),
                            error = %err,
                            "discarding malformed record"
                        );
                    }
                }
            }
            Ok(Polled::Idle) => {}
            Ok(Polled::Closed) => {
                tracing::debug!("record stream closed; intake stopping");
                break;
            }
            Err(err) => {
                summary.source_errors += 1;
                tracing::warn!(error = %err, "source poll failed; continuing");
            }
        }
    }
    summary
}
