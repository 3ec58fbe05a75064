// crates/log-aggregator-pipeline/src/sink/array_file.rs
// ============================================================================
// Module: Log Aggregator Array File
// Description: On-disk JSON array maintenance for the append writer.
// Purpose: Keep the output file resumable as one ordered JSON array.
// Dependencies: log-aggregator-core, std, tracing
// ============================================================================

//! ## Overview
//! [`JsonArrayFile`] owns the output file handle and the explicit array
//! state. A fresh file is initialized with the opening token; an existing
//! file is reinterpreted as a still-open array so new elements extend it
//! rather than starting a new one.
//! Invariants:
//! - The file always starts with `[`.
//! - While the handle is open the file never ends with the closing token;
//!   [`JsonArrayFile::close`] writes it exactly once, consuming the value.
//! - Separator placement is driven by the `has_elements` flag recovered on
//!   open and updated on every successful element write, never by fixed
//!   byte-offset arithmetic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use log_aggregator_core::LogEntry;

use crate::sink::WriterError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Opening token written as a fresh file's entire initial content.
const ARRAY_OPEN: &[u8] = b"[\n";
/// Separator written before every element except the array's first.
const ELEMENT_SEPARATOR: &[u8] = b",\n";
/// Closing token written exactly once at shutdown.
const ARRAY_CLOSE: &[u8] = b"\n]";
/// Initial window size for the backwards tail scan on reopen.
const TAIL_SCAN_WINDOW: u64 = 1024;

// ============================================================================
// SECTION: Array File
// ============================================================================

/// The output file held open as a still-growing JSON array.
#[derive(Debug)]
pub struct JsonArrayFile {
    /// Open handle, positioned at the end of the array body.
    file: File,
    /// Path used in diagnostics and errors.
    path: PathBuf,
    /// Whether the array already contains at least one element.
    has_elements: bool,
}

impl JsonArrayFile {
    /// Opens `path` for appending, creating and initializing it when absent.
    ///
    /// A non-empty file is resumed: a trailing closing token is removed and
    /// the separator state is recovered from the last remaining
    /// non-whitespace byte. A non-empty file whose content cannot be resumed
    /// is rejected rather than overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::Open`] when the file cannot be opened or
    /// initialized and [`WriterError::NotAnArray`] when existing content is
    /// not a resumable array.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, WriterError> {
        let path = path.into();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|err| WriterError::Open {
                path: path.clone(),
                detail: err.to_string(),
            })?;
        let len = file
            .metadata()
            .map_err(|err| WriterError::Open {
                path: path.clone(),
                detail: err.to_string(),
            })?
            .len();
        let has_elements = if len == 0 {
            file.write_all(ARRAY_OPEN).map_err(|err| WriterError::Open {
                path: path.clone(),
                detail: err.to_string(),
            })?;
            file.sync_all().map_err(|err| WriterError::Open {
                path: path.clone(),
                detail: err.to_string(),
            })?;
            false
        } else {
            resume_array(&mut file, &path, len)?
        };
        Ok(Self {
            file,
            path,
            has_elements,
        })
    }

    /// Appends a batch of entries without closing the array.
    ///
    /// Entries that fail to serialize are logged and skipped; the rest of
    /// the batch is still written. The batch is pushed to stable storage
    /// before returning. Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::Write`] or [`WriterError::Sync`] on storage
    /// failure; callers must treat either as fatal because entries written
    /// after the failure point cannot be assumed durable.
    pub fn append(&mut self, entries: &[LogEntry]) -> Result<usize, WriterError> {
        let mut written = 0_usize;
        for entry in entries {
            let rendered = match entry.to_json_pretty() {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(
                        service = %entry.service,
                        error = %err,
                        "skipping entry that failed to serialize"
                    );
                    continue;
                }
            };
            if self.has_elements {
                self.write(ELEMENT_SEPARATOR)?;
            }
            self.write(&rendered)?;
            self.has_elements = true;
            written += 1;
        }
        if written > 0 {
            self.sync()?;
        }
        Ok(written)
    }

    /// Writes the closing token, syncs, and closes the file handle.
    ///
    /// Consumes the file so the closing token cannot be written twice.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::Write`] or [`WriterError::Sync`] when the
    /// closing token cannot be made durable.
    pub fn close(mut self) -> Result<(), WriterError> {
        self.write(ARRAY_CLOSE)?;
        self.sync()
    }

    /// Whether the array currently holds at least one element.
    #[must_use]
    pub const fn has_elements(&self) -> bool {
        self.has_elements
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes raw bytes at the current append position.
    fn write(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        self.file.write_all(bytes).map_err(|err| WriterError::Write {
            path: self.path.clone(),
            detail: err.to_string(),
        })
    }

    /// Pushes written bytes to stable storage.
    fn sync(&mut self) -> Result<(), WriterError> {
        self.file.sync_all().map_err(|err| WriterError::Sync {
            path: self.path.clone(),
            detail: err.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Reopen Support
// ============================================================================

/// Recovers array state from an existing file so appends extend the array.
///
/// The trailing closing token, when present, is truncated away together with
/// the whitespace around it. A file without a trailing closing token (a
/// previous run stopped between flushes) is resumed as an already-open
/// array. Returns whether the array already has at least one element.
fn resume_array(file: &mut File, path: &Path, len: u64) -> Result<bool, WriterError> {
    let not_an_array = |detail: &str| WriterError::NotAnArray {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    };
    let io_failure = |err: &std::io::Error| WriterError::Open {
        path: path.to_path_buf(),
        detail: err.to_string(),
    };

    let mut first = [0_u8; 1];
    file.seek(SeekFrom::Start(0)).map_err(|err| io_failure(&err))?;
    file.read_exact(&mut first).map_err(|err| io_failure(&err))?;
    if first[0] != b'[' {
        return Err(not_an_array("missing leading '['"));
    }

    let mut window = TAIL_SCAN_WINDOW;
    let has_elements = loop {
        let start = len.saturating_sub(window);
        file.seek(SeekFrom::Start(start)).map_err(|err| io_failure(&err))?;
        let mut tail = Vec::new();
        file.read_to_end(&mut tail).map_err(|err| io_failure(&err))?;

        let mut significant = tail
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, byte)| !byte.is_ascii_whitespace());
        let Some((last_index, &last)) = significant.next() else {
            if start == 0 {
                return Err(not_an_array("no significant bytes"));
            }
            window = window.saturating_mul(2);
            continue;
        };
        if last != b']' {
            // No closing token: the previous run stopped between flushes.
            // Resume the open array as-is, dropping a dangling separator left
            // by a write that never completed.
            if last == b',' {
                file.set_len(start + last_index as u64)
                    .map_err(|err| io_failure(&err))?;
                break true;
            }
            break last != b'[';
        }
        let Some((before_index, &before)) = significant.next() else {
            if start == 0 {
                return Err(not_an_array("closing token without an opening token"));
            }
            window = window.saturating_mul(2);
            continue;
        };
        // Remove the closing token so the next element extends the array,
        // cutting right after the last element (or the opening token).
        let keep = start + before_index as u64 + 1;
        file.set_len(keep).map_err(|err| io_failure(&err))?;
        if before == b'[' {
            file.seek(SeekFrom::End(0)).map_err(|err| io_failure(&err))?;
            file.write_all(b"\n").map_err(|err| io_failure(&err))?;
            break false;
        }
        break true;
    };

    file.seek(SeekFrom::End(0)).map_err(|err| io_failure(&err))?;
    Ok(has_elements)
}
