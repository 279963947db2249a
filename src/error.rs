//! Error taxonomy for schema resolution, window planning and batched reads.
//!
//! Every layer returns [`SliceError`]; only the binary decides how an error
//! turns into a process exit.

use std::io;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = SliceError> = std::result::Result<T, E>;

/// Errors produced while resolving columns, planning a window, or reading rows.
#[derive(Debug, Error)]
pub enum SliceError {
    /// The decoder exposed no columns, or an identifier it exposed is malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A requested column is not part of the file's schema.
    #[error("column '{name}' does not exist in the file (available: {})", .available.join(", "))]
    UnknownColumn {
        /// The offending name, as supplied by the user.
        name: String,
        /// Every valid column name, in schema order.
        available: Vec<String>,
    },

    /// The window starts at or past the last row.
    #[error("offset ({offset}) is greater than or equal to the number of records ({total_rows})")]
    OffsetOutOfRange { offset: i64, total_rows: u64 },

    /// Negative offset/size or a zero batch size.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// The decoder could not advance past the leading rows.
    #[error("failed to skip {rows} rows")]
    SeekFailure {
        rows: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A column returned fewer values than the batch asked for.
    #[error("short read on column '{column}': expected {expected} values, got {got}")]
    ShortRead {
        column: String,
        expected: usize,
        got: usize,
    },

    /// The decoder was asked for a path it does not expose.
    #[error("no column at path {0:?}")]
    UnknownPath(String),

    /// Any other failure reported by the decoder.
    #[error("{context}")]
    Decoder {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl SliceError {
    /// Wrap a decoder failure with a short description of what was attempted.
    pub fn decoder<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decoder {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
