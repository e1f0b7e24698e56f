//! CSV persistence of evaluated readings.
//!
//! [`CsvRecordSink`] appends one row per reading to a CSV file that the
//! ward dashboard reads. Columns:
//!
//! | column           | content                          |
//! |------------------|----------------------------------|
//! | `timestamp`      | wall-clock time, RFC 3339, UTC   |
//! | `patient_id`     | patient number                   |
//! | `temperature`    | °C                               |
//! | `flow_rate`      | mL/min                           |
//! | `pressure`       | mmHg                             |
//! | `bubble_present` | `true` / `false`                 |
//!
//! The header is written only when the file is new or empty, so restarts
//! keep appending to the same log.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;
use vitals_types::Reading;

/// Errors that can occur while persisting records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The log file or its directory could not be opened or created.
    #[error("record file error at {path}: {source}")]
    Io {
        /// File the sink was writing to.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A row could not be written.
    #[error("csv error: {source}")]
    Csv {
        /// The underlying CSV error.
        #[from]
        source: csv::Error,
    },

    /// Buffered rows could not be flushed to disk.
    #[error("flush error: {source}")]
    Flush {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// One CSV row.
#[derive(Debug, Serialize)]
struct RecordRow {
    timestamp: String,
    patient_id: u32,
    temperature: f64,
    flow_rate: f64,
    pressure: f64,
    bubble_present: bool,
}

impl RecordRow {
    fn new(reading: &Reading, timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_owned(),
            patient_id: reading.patient_id.into_inner(),
            temperature: reading.temperature,
            flow_rate: reading.flow_rate,
            pressure: reading.pressure,
            bubble_present: reading.bubble_present,
        }
    }
}

/// Append-only CSV writer for reading records.
#[derive(Debug)]
pub struct CsvRecordSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: u64,
}

impl CsvRecordSink {
    /// Open (or create) the record file at `path` for appending.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Io`] if the directory or file cannot be
    /// created or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let io_err = |source| RecordError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        let needs_header = file.metadata().map_err(io_err)?.len() == 0;

        let writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        debug!(path = %path.display(), needs_header, "Record sink opened");

        Ok(Self {
            writer,
            path,
            rows_written: 0,
        })
    }

    /// Append one row per reading, all stamped with `timestamp`, and flush.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if a row cannot be written or flushed.
    pub fn write_step(
        &mut self,
        readings: &[Reading],
        timestamp: DateTime<Utc>,
    ) -> Result<(), RecordError> {
        let stamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        for reading in readings {
            self.writer.serialize(RecordRow::new(reading, &stamp))?;
            self.rows_written = self.rows_written.saturating_add(1);
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written through this sink since it was opened.
    pub const fn rows_written(&self) -> u64 {
        self.rows_written
    }
}
