// crates/log-aggregator-core/src/lib.rs
// ============================================================================
// Module: Log Aggregator Core Library
// Description: Domain model shared across the log aggregation pipeline.
// Purpose: Define immutable log entries and their wire encoding.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! `log-aggregator-core` defines the value types that flow through the
//! aggregation pipeline: a [`LogEntry`] with its [`LogLevel`] and the JSON
//! wire codec used both for incoming stream payloads and for the persisted
//! array file.
//! Invariants:
//! - A [`LogEntry`] is immutable once constructed; components move or clone
//!   it, never mutate it after decode.
//! - Timestamps are UTC, fixed at construction, RFC 3339 on the wire.
//! - Levels round-trip exactly through their uppercase wire strings.
//! - Empty metadata is omitted from the wire form entirely.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod entry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use entry::EntryError;
pub use entry::LogEntry;
pub use entry::LogLevel;
