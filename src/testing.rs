//! Testing utilities for code that lists or exports columnar files.
//!
//! - **Fixtures**: the scenario dataset (`id`, `name`, `score`) as typed rows
//!   and as an in-memory [`MemorySource`](crate::source::MemorySource)
//! - **Mock I/O**: temporary Parquet files written from typed rows, optionally
//!   split into several row groups
//!
//! # Quick Start
//!
//! ```no_run
//! use parquet_slice::testing::*;
//! use parquet_slice::{ExportOptions, export_file};
//!
//! # fn main() -> anyhow::Result<()> {
//! let file = mock_parquet_file(&score_rows(25), Some(10))?;
//!
//! let mut out: Vec<u8> = Vec::new();
//! let summary = export_file(file.path(), &ExportOptions::default(), &mut out)?;
//! assert_eq!(summary.rows_written, 10);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod mock_io;

pub use fixtures::*;
pub use mock_io::*;
