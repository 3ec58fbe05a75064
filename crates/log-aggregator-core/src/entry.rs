// crates/log-aggregator-core/src/entry.rs
// ============================================================================
// Module: Log Aggregator Entry Model
// Description: Structured log entries and their severity levels.
// Purpose: Provide the immutable record unit moved through the pipeline.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! A [`LogEntry`] is the unit of data flowing from the stream intake into the
//! append writer. Entries are decoded once from raw payload bytes and then
//! treated as value data until persisted.
//! Invariants:
//! - `timestamp` is UTC and never changes after construction.
//! - `metadata` keys are unique; an empty map never appears on the wire.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Log Levels
// ============================================================================

/// Severity of a log entry.
///
/// The five variants serialize exactly as their uppercase names. The pipeline
/// never compares severities, so no ordering is defined; the only obligation
/// is an exact round-trip through the wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Diagnostic detail below normal operational interest.
    Debug,
    /// Routine operational information.
    Info,
    /// Unexpected condition that did not affect the outcome.
    Warning,
    /// Operation failed.
    Error,
    /// Unrecoverable failure of the originating component.
    Fatal,
}

impl LogLevel {
    /// Returns the exact wire string for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Entry Errors
// ============================================================================

/// Errors produced when decoding or encoding log entries.
#[derive(Debug, Error)]
pub enum EntryError {
    /// Incoming payload failed to decode as a log entry.
    #[error("malformed log entry payload: {0}")]
    Decode(String),
    /// Entry failed to render to its wire form.
    #[error("log entry serialization failure: {0}")]
    Encode(String),
}

// ============================================================================
// SECTION: Log Entry
// ============================================================================

/// One structured, immutable log record.
///
/// # Invariants
/// - Constructed once and never mutated; ownership transfers fully on each
///   handoff between pipeline components.
/// - `timestamp` is UTC, set at creation, serialized as RFC 3339.
/// - `metadata` is omitted from the wire form when empty and decodes as an
///   empty map when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Creation time in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Severity of the record.
    pub level: LogLevel,
    /// Short identifier of the originating component.
    pub service: String,
    /// Human-readable text.
    pub message: String,
    /// String-to-string annotations with unique keys, serialized in
    /// deterministic key order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl LogEntry {
    /// Creates an entry stamped with the current UTC time.
    #[must_use]
    pub fn new(
        level: LogLevel,
        service: impl Into<String>,
        message: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            level,
            service: service.into(),
            message: message.into(),
            metadata,
        }
    }

    /// Decodes an entry from a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Decode`] when the payload is not a valid entry;
    /// callers log the failure and drop the payload.
    pub fn from_json(bytes: &[u8]) -> Result<Self, EntryError> {
        serde_json::from_slice(bytes).map_err(|err| EntryError::Decode(err.to_string()))
    }

    /// Renders the entry as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Encode`] when the entry cannot be rendered.
    pub fn to_json(&self) -> Result<Vec<u8>, EntryError> {
        serde_json::to_vec(self).map_err(|err| EntryError::Encode(err.to_string()))
    }

    /// Renders the entry as indented JSON, the form persisted in the output
    /// array file.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Encode`] when the entry cannot be rendered;
    /// the writer logs the failure and skips the entry from its batch.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, EntryError> {
        serde_json::to_vec_pretty(self).map_err(|err| EntryError::Encode(err.to_string()))
    }
}
