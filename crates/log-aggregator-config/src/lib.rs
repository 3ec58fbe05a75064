// crates/log-aggregator-config/src/lib.rs
// ============================================================================
// Module: Log Aggregator Config Library
// Description: Canonical config model and validation for the aggregator.
// Purpose: Single source of truth for log-aggregator.toml semantics.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `log-aggregator-config` defines the canonical configuration model for the
//! aggregation pipeline. It provides strict, fail-closed validation: invalid
//! thresholds, intervals, capacities, or output paths are rejected before any
//! pipeline component starts. The configuration is constructed exactly once
//! at startup and passed by value into each component; there is no
//! process-wide mutable state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
