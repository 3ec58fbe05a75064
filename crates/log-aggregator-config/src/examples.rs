// crates/log-aggregator-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for the aggregator configuration. Output is
//! deterministic and kept in sync with the defaults in
//! [`crate::config`].

/// Returns a canonical example `log-aggregator.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[output]
path = "logs.json"
flush_threshold = 100
flush_interval_ms = 5000

[intake]
queue_capacity = 100
poll_timeout_ms = 100
"#,
    )
}
