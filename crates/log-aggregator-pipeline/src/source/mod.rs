// crates/log-aggregator-pipeline/src/source/mod.rs
// ============================================================================
// Module: Log Aggregator Record Sources
// Description: Source trait and reference implementations for raw records.
// Purpose: Abstract the upstream record stream behind a bounded-wait poll.
// Dependencies: async-trait, thiserror
// ============================================================================

//! ## Overview
//! A [`RecordSource`] produces the lazy sequence of opaque payloads the
//! intake loop decodes into log entries. The broker client itself is an
//! external collaborator; the pipeline only requires "next payload or none
//! yet" with a bounded wait so cancellation checks are never starved.
//! Invariants:
//! - `poll` returns within roughly the requested timeout.
//! - After [`Polled::Closed`] a source never yields another record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// SECTION: Raw Records
// ============================================================================

/// Raw payload received from the upstream record stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Opaque payload bytes, expected to decode as one log entry.
    pub bytes: Vec<u8>,
    /// Optional provenance label used in diagnostics.
    pub origin: Option<String>,
}

/// Outcome of one bounded-wait poll of a record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled {
    /// A record arrived within the wait.
    Record(RawRecord),
    /// Nothing arrived within the wait; poll again.
    Idle,
    /// The stream ended; no further records will arrive.
    Closed,
}

// ============================================================================
// SECTION: Source Errors
// ============================================================================

/// Errors emitted by record sources.
///
/// Poll errors are per-record events: the intake loop logs them and keeps
/// polling rather than stopping the pipeline.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Underlying transport failed to deliver a record.
    #[error("source io failure: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Source Trait
// ============================================================================

/// Produces a lazy sequence of raw records.
#[async_trait]
pub trait RecordSource: Send {
    /// Polls for the next raw record, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the underlying transport fails; the
    /// record, if any, is skipped and polling continues.
    async fn poll(&mut self, timeout: Duration) -> Result<Polled, SourceError>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod inline;
pub mod line;

pub use inline::InlineSource;
pub use line::LineSource;
