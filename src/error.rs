//! Row-level validation errors.
//!
//! Anything that aborts a whole step is an `anyhow::Error`; these describe a
//! single CSV row that was skipped.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("line {line}: malformed row: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: {field} = {value} is out of range")]
    OutOfRange {
        line: u64,
        field: &'static str,
        value: String,
    },
}

impl RecordError {
    /// CSV line the offending row started on (header is line 1).
    pub fn line(&self) -> u64 {
        match self {
            RecordError::Malformed { line, .. } | RecordError::OutOfRange { line, .. } => *line,
        }
    }
}
