// crates/log-aggregator-pipeline/src/source/line.rs
// ============================================================================
// Module: Log Aggregator Line Source
// Description: Newline-delimited payload source over a buffered reader.
// Purpose: Adapt any line-oriented byte stream into the record source seam.
// Dependencies: async-trait, tokio
// ============================================================================

//! ## Overview
//! [`LineSource`] treats each input line as one opaque payload. It is the
//! adapter seam for external stream clients; the bundled binary feeds it from
//! standard input. End of input closes the stream; blank lines are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::io::Stdin;

use crate::source::Polled;
use crate::source::RawRecord;
use crate::source::RecordSource;
use crate::source::SourceError;

// ============================================================================
// SECTION: Line Source
// ============================================================================

/// Newline-delimited payload source over any buffered reader.
#[derive(Debug)]
pub struct LineSource<R> {
    /// Line iterator over the underlying reader.
    lines: Lines<R>,
    /// Count of lines read, used for provenance labels.
    received: u64,
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    /// Creates a line source over the provided reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            received: 0,
        }
    }
}

impl LineSource<BufReader<Stdin>> {
    /// Creates a line source reading from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> RecordSource for LineSource<R> {
    async fn poll(&mut self, timeout: Duration) -> Result<Polled, SourceError> {
        // next_line is cancel safe, so abandoning it on timeout cannot lose
        // buffered input.
        match tokio::time::timeout(timeout, self.lines.next_line()).await {
            Err(_elapsed) => Ok(Polled::Idle),
            Ok(Ok(None)) => Ok(Polled::Closed),
            Ok(Ok(Some(line))) => {
                self.received += 1;
                if line.trim().is_empty() {
                    return Ok(Polled::Idle);
                }
                let origin = Some(format!("line {}", self.received));
                Ok(Polled::Record(RawRecord {
                    bytes: line.into_bytes(),
                    origin,
                }))
            }
            Ok(Err(err)) => Err(SourceError::Io(err.to_string())),
        }
    }
}
