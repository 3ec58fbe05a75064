// crates/log-aggregator-pipeline/src/sink/writer.rs
// ============================================================================
// Module: Log Aggregator Append Writer
// Description: Buffered writer draining the handoff queue into the array file.
// Purpose: Batch entries by count or time and persist them durably.
// Dependencies: log-aggregator-core, tokio, tracing
// ============================================================================

//! ## Overview
//! [`AppendWriter`] owns the output file for the process lifetime. It waits
//! on two triggers, whichever fires first: a new entry on the queue or the
//! flush interval elapsing. Queue closure is the terminal signal and leads to
//! exactly one final flush that seals the array.
//! Invariants:
//! - A normal flush never writes the closing token.
//! - Idle ticks never touch the file.
//! - A storage failure aborts the run with an error, distinct from the
//!   summary returned on clean shutdown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use log_aggregator_core::LogEntry;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;

use crate::sink::JsonArrayFile;
use crate::sink::WriterError;

// ============================================================================
// SECTION: Writer Summary
// ============================================================================

/// Counters reported by the append writer on clean shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterSummary {
    /// Entries written to the array across all flushes.
    pub appended: usize,
    /// Flushes performed, the final flush included.
    pub flushes: usize,
}

// ============================================================================
// SECTION: Append Writer
// ============================================================================

/// Buffered append writer owning the output file.
///
/// # Invariants
/// - `pending` holds entries in arrival order and is drained whole on every
///   flush.
/// - `flush_threshold` is at least 1 and `flush_interval` is non-zero.
#[derive(Debug)]
pub struct AppendWriter {
    /// The output file held open as a still-growing JSON array.
    file: JsonArrayFile,
    /// Entries accepted from the queue but not yet flushed.
    pending: Vec<LogEntry>,
    /// Batch size that triggers a size-based flush.
    flush_threshold: usize,
    /// Interval that triggers a time-based flush.
    flush_interval: Duration,
}

impl AppendWriter {
    /// Opens the output file and prepares an empty pending batch.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::InvalidPolicy`] for a zero threshold or
    /// interval, and propagates open failures, which are fatal: the pipeline
    /// has no durability target without its output file.
    pub fn open(
        path: impl Into<PathBuf>,
        flush_threshold: usize,
        flush_interval: Duration,
    ) -> Result<Self, WriterError> {
        if flush_threshold == 0 {
            return Err(WriterError::InvalidPolicy(
                "flush threshold must be at least 1".to_string(),
            ));
        }
        if flush_interval.is_zero() {
            return Err(WriterError::InvalidPolicy(
                "flush interval must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            file: JsonArrayFile::open(path)?,
            pending: Vec::new(),
            flush_threshold,
            flush_interval,
        })
    }

    /// Drains the queue until it closes, then seals the array.
    ///
    /// Waits on whichever fires first: an entry arriving or the flush
    /// interval elapsing. Returns the summary on clean shutdown so callers
    /// can distinguish "stopped because asked to" from "stopped because
    /// storage failed".
    ///
    /// # Errors
    ///
    /// Returns [`WriterError`] when a write or sync fails; entries after the
    /// failure point cannot be assumed durable.
    pub async fn run(
        mut self,
        mut entries: mpsc::Receiver<LogEntry>,
    ) -> Result<WriterSummary, WriterError> {
        let mut summary = WriterSummary::default();
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.flush_interval, self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                received = entries.recv() => {
                    let Some(entry) = received else {
                        // Queue closed: the terminal signal.
                        break;
                    };
                    self.pending.push(entry);
                    if self.pending.len() >= self.flush_threshold {
                        self.flush_pending(&mut summary)?;
                    }
                }
                _ = ticker.tick() => {
                    if !self.pending.is_empty() {
                        self.flush_pending(&mut summary)?;
                    }
                }
            }
        }
        self.flush_final(&mut summary)?;
        Ok(summary)
    }

    /// Writes the pending batch without closing the array.
    fn flush_pending(&mut self, summary: &mut WriterSummary) -> Result<(), WriterError> {
        let written = self.file.append(&self.pending)?;
        self.pending.clear();
        summary.appended += written;
        summary.flushes += 1;
        tracing::info!(
            path = %self.file.path().display(),
            entries = written,
            "flushed batch"
        );
        Ok(())
    }

    /// Writes whatever is pending, then the closing token, exactly once.
    ///
    /// Takes the writer by value so a second final flush cannot happen.
    fn flush_final(mut self, summary: &mut WriterSummary) -> Result<(), WriterError> {
        let written = self.file.append(&self.pending)?;
        summary.appended += written;
        summary.flushes += 1;
        tracing::info!(
            path = %self.file.path().display(),
            entries = written,
            "final flush; sealing array"
        );
        self.file.close()
    }
}
