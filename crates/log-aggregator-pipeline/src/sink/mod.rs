// crates/log-aggregator-pipeline/src/sink/mod.rs
// ============================================================================
// Module: Log Aggregator Sink
// Description: Writer errors and the durable JSON array sink.
// Purpose: Persist batched entries to a file that stays a valid array.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The sink side of the pipeline owns the output file exclusively for the
//! process lifetime. [`JsonArrayFile`] maintains the on-disk array format;
//! [`AppendWriter`] batches entries and decides when to flush.
//! Error policy: open and storage failures are fatal to the writer and are
//! surfaced distinctly from clean shutdown; per-entry serialization failures
//! are logged and skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Writer Errors
// ============================================================================

/// Errors emitted by the append writer and its file layer.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Output file could not be opened or created.
    #[error("failed to open output file {}: {detail}", .path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying cause.
        detail: String,
    },
    /// Existing output file cannot be resumed as a JSON array.
    #[error("output file {} is not a resumable json array: {detail}", .path.display())]
    NotAnArray {
        /// Path that was rejected.
        path: PathBuf,
        /// Reason the content cannot be resumed.
        detail: String,
    },
    /// Write to the output file failed mid-batch.
    #[error("failed to write output file {}: {detail}", .path.display())]
    Write {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying cause.
        detail: String,
    },
    /// Flush to stable storage failed.
    #[error("failed to sync output file {}: {detail}", .path.display())]
    Sync {
        /// Path that failed to sync.
        path: PathBuf,
        /// Underlying cause.
        detail: String,
    },
    /// Flush policy rejected at construction.
    #[error("invalid flush policy: {0}")]
    InvalidPolicy(String),
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod array_file;
pub mod writer;

pub use array_file::JsonArrayFile;
pub use writer::AppendWriter;
pub use writer::WriterSummary;
