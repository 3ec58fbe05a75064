// crates/log-aggregator-pipeline/src/lib.rs
// ============================================================================
// Module: Log Aggregator Pipeline Library
// Description: Stream intake, record sources, and the buffered append writer.
// Purpose: Aggregate streamed log records into a durable JSON array file.
// Dependencies: log-aggregator-core, serde_json, tokio, tracing
// ============================================================================

//! ## Overview
//! The pipeline connects a [`RecordSource`] to an [`AppendWriter`] through one
//! bounded handoff queue: [`run_intake`] polls the source, decodes payloads,
//! and forwards entries; the writer batches entries by count or time and
//! appends them to a file that parses as a single JSON array at every
//! durable boundary.
//! Invariants:
//! - Ownership of each entry transfers fully on the queue handoff.
//! - A full queue stalls intake (backpressure); entries are never dropped
//!   because the writer is slow.
//! - Queue closure triggers exactly one final flush that seals the array.
//!
//! Between two normal flushes the file transiently lacks its closing token;
//! validity is guaranteed at shutdown and reopen boundaries, not after every
//! batch. This is a deliberate tradeoff that keeps a flush a pure append.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod intake;
pub mod sink;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use intake::IntakeSummary;
pub use intake::run_intake;
pub use sink::AppendWriter;
pub use sink::JsonArrayFile;
pub use sink::WriterError;
pub use sink::WriterSummary;
pub use source::InlineSource;
pub use source::LineSource;
pub use source::Polled;
pub use source::RawRecord;
pub use source::RecordSource;
pub use source::SourceError;
