//! CSV and JSON persistence for feedback records.
//!
//! Every write replaces the target file; there is no appending or locking.
//! Reads skip rows that do not deserialize and report them to the caller.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::error::RecordError;
use crate::records::ProcessedRecord;

/// A type written one value per CSV row.
///
/// `HEADERS` must list the serialized field names in declaration order; it is
/// written on its own when there are no rows.
pub trait CsvRow: Serialize {
    const HEADERS: &'static [&'static str];
}

/// Records read from a CSV file plus the rows that had to be skipped.
#[derive(Debug)]
pub struct ReadOutcome<T> {
    pub records: Vec<T>,
    pub skipped: Vec<RecordError>,
}

impl<T> ReadOutcome<T> {
    /// Rows seen in the file, good or bad.
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Writes `records` to `path` with a header row, replacing any existing file.
///
/// The header is taken from the field names of `T` in declaration order, so
/// an empty slice still produces a header-only file.
pub fn write_records<T: CsvRow>(path: &Path, records: &[T]) -> Result<usize> {
    ensure_parent(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    if records.is_empty() {
        writer.write_record(T::HEADERS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;

    debug!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(records.len())
}

/// Reads every row of `path` into `T`, skipping rows that fail to deserialize.
///
/// Each skipped row is logged at `warn` with its line number.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<ReadOutcome<T>> {
    read_records_checked(path, |_, _| Ok(()))
}

/// Like [`read_records`], but also skips rows for which `check` fails.
///
/// `check` receives the deserialized row and its CSV line number.
pub fn read_records_checked<T, F>(path: &Path, check: F) -> Result<ReadOutcome<T>>
where
    T: DeserializeOwned,
    F: Fn(&T, u64) -> std::result::Result<(), RecordError>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(source) if source.is_io_error() => {
                return Err(source).with_context(|| format!("failed to read {}", path.display()));
            }
            Err(source) => {
                let line = source.position().map(|p| p.line()).unwrap_or_default();
                let err = RecordError::Malformed { line, source };
                warn!(path = %path.display(), error = %err, "Skipping row");
                skipped.push(err);
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let checked = row
            .deserialize::<T>(Some(&headers))
            .map_err(|source| RecordError::Malformed { line, source })
            .and_then(|record| check(&record, line).map(|()| record));

        match checked {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Skipping row");
                skipped.push(err);
            }
        }
    }

    debug!(
        path = %path.display(),
        rows = records.len(),
        skipped = skipped.len(),
        "CSV read"
    );
    Ok(ReadOutcome { records, skipped })
}

/// Loads the processed CSV for the reporting commands.
///
/// Returns `Ok(None)` when the file does not exist yet, after logging how to
/// produce it.
pub fn load_processed(path: &Path) -> Result<Option<Vec<ProcessedRecord>>> {
    if !path.exists() {
        error!(path = %path.display(), "No processed data found. Run the ETL pipeline first");
        return Ok(None);
    }

    let outcome = read_records::<ProcessedRecord>(path)?;
    if !outcome.skipped.is_empty() {
        warn!(skipped = outcome.skipped.len(), "Processed CSV had unreadable rows");
    }
    info!(records = outcome.records.len(), path = %path.display(), "Loaded processed records");
    Ok(Some(outcome.records))
}

/// Serializes `value` as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    ensure_parent(path)?;
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes a text report, creating the reports directory as needed.
pub fn write_text(path: &Path, body: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
