//! Central error definitions for the dumper.
//!
//! Fatal kinds (`InvalidConfiguration`, `SourceUnavailable`) abort a run
//! before any range is exported. The remaining kinds are contained within
//! the range they occurred in and surface through `RangeOutcome::error`.

use thiserror::Error;

/// Error types encountered during a dump run.
#[derive(Error, Debug)]
pub enum DumpError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(String),
}

impl From<mysql::Error> for DumpError {
    fn from(e: mysql::Error) -> Self {
        DumpError::Database(e.to_string())
    }
}

impl From<csv::Error> for DumpError {
    fn from(e: csv::Error) -> Self {
        DumpError::Encode(e.to_string())
    }
}

/// A specialized Result type for the dumper.
pub type Result<T> = std::result::Result<T, DumpError>;
