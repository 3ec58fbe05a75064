// crates/log-aggregator-pipeline/src/source/inline.rs
// ============================================================================
// Module: Log Aggregator Inline Source
// Description: Scripted in-memory record source.
// Purpose: Drive the pipeline from predefined payloads in tests and demos.
// Dependencies: async-trait, std
// ============================================================================

//! ## Overview
//! [`InlineSource`] yields each scripted payload in order and then reports
//! the stream closed, which lets a whole pipeline run drain deterministically
//! without a live broker consumer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use crate::source::Polled;
use crate::source::RawRecord;
use crate::source::RecordSource;
use crate::source::SourceError;

// ============================================================================
// SECTION: Inline Source
// ============================================================================

/// Scripted in-memory record source.
#[derive(Debug, Default)]
pub struct InlineSource {
    /// Remaining scripted payloads, yielded front to back.
    records: VecDeque<RawRecord>,
    /// Count of records yielded so far, used for provenance labels.
    yielded: u64,
}

impl InlineSource {
    /// Creates a source over the provided payloads.
    #[must_use]
    pub fn new(payloads: impl IntoIterator<Item = Vec<u8>>) -> Self {
        let records = payloads
            .into_iter()
            .enumerate()
            .map(|(index, bytes)| RawRecord {
                bytes,
                origin: Some(format!("inline[{index}]")),
            })
            .collect();
        Self {
            records,
            yielded: 0,
        }
    }

    /// Appends one payload to the script.
    pub fn push(&mut self, bytes: Vec<u8>) {
        let index = self.records.len();
        self.records.push_back(RawRecord {
            bytes,
            origin: Some(format!("inline[{index}]")),
        });
    }

    /// Returns how many records have been yielded so far.
    #[must_use]
    pub const fn yielded(&self) -> u64 {
        self.yielded
    }
}

#[async_trait]
impl RecordSource for InlineSource {
    async fn poll(&mut self, _timeout: Duration) -> Result<Polled, SourceError> {
        match self.records.pop_front() {
            Some(record) => {
                self.yielded += 1;
                Ok(Polled::Record(record))
            }
            None => Ok(Polled::Closed),
        }
    }
}
