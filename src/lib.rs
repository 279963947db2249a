//! # parquet-slice
//!
//! Inspect a Parquet file's columns and export a rectangular slice of it (a
//! contiguous row window over a chosen set of columns) as delimited text.
//!
//! ## Key Features
//!
//! - **Schema listing** - bare, user-facing column names in schema order
//! - **Column selection** - any subset, in any order; unknown names are rejected
//! - **Row windows** - `[offset, offset + size)`, clamped to the end of the file
//! - **Batched reads** - each column is read in fixed-size batches and the
//!   per-column buffers are interleaved back into row-aligned records
//! - **Pluggable decoder** - anything implementing [`ColumnSource`]; a Parquet
//!   implementation and an in-memory one are provided
//!
//! ## Quick Start
//!
//! ```no_run
//! use parquet_slice::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! // List columns
//! let names = show_schema_file("data.parquet", &mut std::io::stdout())?;
//!
//! // Rows 20..30 of `id` and `score`
//! let options = ExportOptions::default()
//!     .window(20, 10)
//!     .columns(["id", "score"]);
//! let summary = export_file("data.parquet", &options, std::io::stdout())?;
//! println!("{} rows in {} batches", summary.rows_written, summary.batches);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! 1. [`schema`] - strips/re-applies the decoder's namespace prefix and
//!    validates requested column names.
//! 2. [`window`] - validates the row window against the row count, clamps it,
//!    and partitions it into batches.
//! 3. [`materialize`] - positions the decoder once, reads every batch column by
//!    column, and writes row-major records.
//!
//! [`export`] composes the three; the `parquet-slice` binary is a thin CLI on top.

pub mod error;
pub mod export;
pub mod materialize;
pub mod options;
pub mod schema;
pub mod source;
pub mod testing;
pub mod value;
pub mod window;

pub use error::{Result, SliceError};
pub use export::{ExportSummary, export_file, export_rows, show_schema, show_schema_file};
pub use materialize::{MaterializeStats, RecordSink, materialize, read_batch};
pub use options::{ExportOptions, parse_columns};
pub use schema::{SchemaResolver, qualify, strip};
pub use source::{ColumnSource, MemorySource, ParquetColumnSource};
pub use value::Value;
pub use window::{Batch, BatchPlan, RowWindow, plan};
