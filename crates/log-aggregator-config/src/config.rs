// crates/log-aggregator-config/src/config.rs
// ============================================================================
// Module: Log Aggregator Configuration
// Description: Configuration loading and validation for the aggregator.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every numeric knob is bounds-checked and the output path is shape-checked
//! before the pipeline starts; invalid configuration never reaches the
//! writer. Defaults reproduce the upstream deployment: `logs.json`, a
//! 100-entry flush threshold, a 5-second flush interval, a 100-slot handoff
//! queue, and a 100-millisecond source poll.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "log-aggregator.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "LOG_AGGREGATOR_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default output file path.
pub const DEFAULT_OUTPUT_PATH: &str = "logs.json";
/// Default number of entries buffered before a size-triggered flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 100;
/// Default flush interval in milliseconds.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 5_000;
/// Default handoff queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
/// Default source poll timeout in milliseconds.
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 100;
/// Maximum accepted flush threshold.
pub(crate) const MAX_FLUSH_THRESHOLD: usize = 100_000;
/// Maximum accepted flush interval in milliseconds (one hour).
pub(crate) const MAX_FLUSH_INTERVAL_MS: u64 = 3_600_000;
/// Maximum accepted handoff queue capacity.
pub(crate) const MAX_QUEUE_CAPACITY: usize = 65_536;
/// Maximum accepted source poll timeout in milliseconds.
pub(crate) const MAX_POLL_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested config file does not exist.
    #[error("config file not found: {}", .path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// Config file could not be read.
    #[error("failed to read config file {}: {detail}", .path.display())]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying cause.
        detail: String,
    },
    /// Config file exceeded the size cap.
    #[error("config file {} exceeds {max_bytes} bytes", .path.display())]
    TooLarge {
        /// Path that was rejected.
        path: PathBuf,
        /// Maximum accepted size in bytes.
        max_bytes: u64,
    },
    /// TOML parsing failed.
    #[error("failed to parse config file {}: {detail}", .path.display())]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying cause.
        detail: String,
    },
    /// Flush threshold outside accepted bounds.
    #[error("flush_threshold must be between 1 and {max} (got {got})")]
    FlushThreshold {
        /// Maximum accepted value.
        max: usize,
        /// Rejected value.
        got: usize,
    },
    /// Flush interval outside accepted bounds.
    #[error("flush_interval_ms must be between 1 and {max} (got {got})")]
    FlushInterval {
        /// Maximum accepted value.
        max: u64,
        /// Rejected value.
        got: u64,
    },
    /// Queue capacity outside accepted bounds.
    #[error("queue_capacity must be between 1 and {max} (got {got})")]
    QueueCapacity {
        /// Maximum accepted value.
        max: usize,
        /// Rejected value.
        got: usize,
    },
    /// Poll timeout outside accepted bounds.
    #[error("poll_timeout_ms must be between 1 and {max} (got {got})")]
    PollTimeout {
        /// Maximum accepted value.
        max: u64,
        /// Rejected value.
        got: u64,
    },
    /// Output path failed shape validation.
    #[error("invalid output path {}: {detail}", .path.display())]
    OutputPath {
        /// Path that was rejected.
        path: PathBuf,
        /// Reason for the rejection.
        detail: String,
    },
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Top-level aggregator configuration.
///
/// # Invariants
/// - Constructed once at startup and passed into components by value.
/// - A value that passed [`AggregatorConfig::validate`] is safe to hand to
///   the writer and intake loops unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatorConfig {
    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Stream intake settings.
    #[serde(default)]
    pub intake: IntakeConfig,
}

/// Output file settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the JSON array file.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Entries buffered before a size-triggered flush.
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
    /// Interval between time-triggered flushes, in milliseconds.
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
        }
    }
}

/// Stream intake settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntakeConfig {
    /// Capacity of the bounded handoff queue between intake and writer.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Bounded wait for each source poll, in milliseconds.
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
        }
    }
}

/// Returns the default output path.
fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

/// Returns the default flush threshold.
const fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

/// Returns the default flush interval in milliseconds.
const fn default_flush_interval_ms() -> u64 {
    DEFAULT_FLUSH_INTERVAL_MS
}

/// Returns the default queue capacity.
const fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

/// Returns the default poll timeout in milliseconds.
const fn default_poll_timeout_ms() -> u64 {
    DEFAULT_POLL_TIMEOUT_MS
}

// ============================================================================
// SECTION: Loading And Validation
// ============================================================================

impl AggregatorConfig {
    /// Loads configuration from the resolved config file, falling back to
    /// defaults when no file is present.
    ///
    /// Resolution order: explicit `path` argument, then the
    /// `LOG_AGGREGATOR_CONFIG` environment variable, then
    /// `log-aggregator.toml` in the working directory if it exists. An
    /// explicitly requested file that is missing is an error; a missing
    /// default file is not.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when the resulting configuration fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(file) = resolve_config_path(path)? else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        let metadata = fs::metadata(&file).map_err(|err| ConfigError::Read {
            path: file.clone(),
            detail: err.to_string(),
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: file,
                max_bytes: MAX_CONFIG_FILE_SIZE,
            });
        }
        let raw = fs::read_to_string(&file).map_err(|err| ConfigError::Read {
            path: file.clone(),
            detail: err.to_string(),
        })?;
        let config: Self = toml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: file.clone(),
            detail: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every field against its accepted bounds.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered; validation fails
    /// closed, so no partially valid configuration escapes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.output.flush_threshold;
        if threshold == 0 || threshold > MAX_FLUSH_THRESHOLD {
            return Err(ConfigError::FlushThreshold {
                max: MAX_FLUSH_THRESHOLD,
                got: threshold,
            });
        }
        let interval = self.output.flush_interval_ms;
        if interval == 0 || interval > MAX_FLUSH_INTERVAL_MS {
            return Err(ConfigError::FlushInterval {
                max: MAX_FLUSH_INTERVAL_MS,
                got: interval,
            });
        }
        let capacity = self.intake.queue_capacity;
        if capacity == 0 || capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::QueueCapacity {
                max: MAX_QUEUE_CAPACITY,
                got: capacity,
            });
        }
        let poll = self.intake.poll_timeout_ms;
        if poll == 0 || poll > MAX_POLL_TIMEOUT_MS {
            return Err(ConfigError::PollTimeout {
                max: MAX_POLL_TIMEOUT_MS,
                got: poll,
            });
        }
        validate_output_path(&self.output.path)
    }

    /// Returns the flush interval as a duration.
    #[must_use]
    pub const fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.output.flush_interval_ms)
    }

    /// Returns the source poll timeout as a duration.
    #[must_use]
    pub const fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.intake.poll_timeout_ms)
    }
}

/// Resolves the config file to load, if any.
fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }
    if let Ok(from_env) = env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(from_env);
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path,
            });
        }
        return Ok(Some(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    if default.exists() {
        return Ok(Some(default));
    }
    Ok(None)
}

/// Rejects output paths that are empty, oversized, or contain NUL bytes.
fn validate_output_path(path: &Path) -> Result<(), ConfigError> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        return Err(ConfigError::OutputPath {
            path: path.to_path_buf(),
            detail: "path is empty".to_string(),
        });
    }
    if raw.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::OutputPath {
            path: path.to_path_buf(),
            detail: format!("path exceeds {MAX_TOTAL_PATH_LENGTH} bytes"),
        });
    }
    if raw.as_encoded_bytes().contains(&0) {
        return Err(ConfigError::OutputPath {
            path: path.to_path_buf(),
            detail: "path contains a NUL byte".to_string(),
        });
    }
    for component in path.components() {
        if let Component::Normal(part) = component
            && part.len() > MAX_PATH_COMPONENT_LENGTH
        {
            return Err(ConfigError::OutputPath {
                path: path.to_path_buf(),
                detail: format!("path component exceeds {MAX_PATH_COMPONENT_LENGTH} bytes"),
            });
        }
    }
    Ok(())
}
