// crates/log-aggregator-cli/src/main.rs
// ============================================================================
// Module: Log Aggregator CLI Entry Point
// Description: Binary wiring configuration, signals, and the pipeline.
// Purpose: Run the stream-to-file aggregation pipeline until shutdown.
// Dependencies: clap, log-aggregator-config, log-aggregator-pipeline, tokio.
// ============================================================================

//! ## Overview
//! The `log-aggregator` binary reads newline-delimited record payloads from
//! standard input (the adapter seam for an external broker client), decodes
//! them into log entries, and persists them to a single JSON array file.
//! Flag overrides are merged over the loaded configuration and re-validated
//! before any component starts; the merged value is the only configuration
//! state in the process.
//! Shutdown: an operator interrupt stops intake, intake closes the handoff
//! queue, and the writer performs its final flush before the process exits.
//! A clean shutdown exits zero; a storage failure exits non-zero.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log_aggregator_config::AggregatorConfig;
use log_aggregator_config::ConfigError;
use log_aggregator_pipeline::AppendWriter;
use log_aggregator_pipeline::IntakeSummary;
use log_aggregator_pipeline::LineSource;
use log_aggregator_pipeline::run_intake;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Command-line arguments for the aggregator binary.
#[derive(Debug, Parser)]
#[command(
    name = "log-aggregator",
    version,
    about = "Aggregates streamed log records into a durable JSON array file"
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path override.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Entries buffered before a size-triggered flush.
    #[arg(long)]
    flush_threshold: Option<usize>,
    /// Flush interval override in milliseconds.
    #[arg(long)]
    flush_interval_ms: Option<u64>,
    /// Handoff queue capacity override.
    #[arg(long)]
    queue_capacity: Option<usize>,
}

/// Merges flag overrides over the loaded configuration and re-validates.
fn effective_config(cli: &Cli) -> Result<AggregatorConfig, ConfigError> {
    let mut config = AggregatorConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.output {
        config.output.path = path.clone();
    }
    if let Some(threshold) = cli.flush_threshold {
        config.output.flush_threshold = threshold;
    }
    if let Some(interval) = cli.flush_interval_ms {
        config.output.flush_interval_ms = interval;
    }
    if let Some(capacity) = cli.queue_capacity {
        config.intake.queue_capacity = capacity;
    }
    config.validate()?;
    Ok(config)
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match effective_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // No output file, no pipeline.
    let writer = match AppendWriter::open(
        config.output.path.clone(),
        config.output.flush_threshold,
        config.flush_interval(),
    ) {
        Ok(writer) => writer,
        Err(err) => {
            error!(error = %err, "cannot start writer");
            return ExitCode::FAILURE;
        }
    };
    info!(
        path = %config.output.path.display(),
        flush_threshold = config.output.flush_threshold,
        flush_interval_ms = config.output.flush_interval_ms,
        "aggregator starting"
    );

    let (entries_tx, entries_rx) = mpsc::channel(config.intake.queue_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Flip the shutdown signal on operator interrupt. `shutdown_tx` stays in
    // this scope so the channel outlives a failed signal listener.
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("termination signal received; shutting down");
                let _ = signal_tx.send(true);
            }
            Err(err) => {
                error!(error = %err, "cannot listen for termination signal");
            }
        }
    });

    let writer_task = tokio::spawn(writer.run(entries_rx));
    let intake_task = tokio::spawn(run_intake(
        LineSource::stdin(),
        entries_tx,
        shutdown_rx,
        config.poll_timeout(),
    ));

    // Intake finishes first (signal or end of input) and closes the queue;
    // joining the writer afterwards guarantees the final flush completed or
    // its failure was observed before the process exits.
    let intake_summary = match intake_task.await {
        Ok(summary) => summary,
        Err(err) => {
            error!(error = %err, "intake task failed");
            IntakeSummary::default()
        }
    };
    let writer_result = match writer_task.await {
        Ok(result) => result,
        Err(err) => {
            error!(error = %err, "writer task failed");
            return ExitCode::FAILURE;
        }
    };

    drop(shutdown_tx);
    match writer_result {
        Ok(summary) => {
            info!(
                received = intake_summary.received,
                accepted = intake_summary.accepted,
                rejected = intake_summary.rejected,
                appended = summary.appended,
                flushes = summary.flushes,
                "aggregator shutdown complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "storage failure; entries may not be durable");
            ExitCode::FAILURE
        }
    }
}
