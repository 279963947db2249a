//! Entry operations: list a file's columns, or export a row window as CSV.
//!
//! All validation (column names, window bounds) happens before anything is
//! written, so a rejected request produces no output at all.

use crate::error::Result;
use crate::materialize::{RecordSink, materialize};
use crate::options::ExportOptions;
use crate::schema::SchemaResolver;
use crate::source::{ColumnSource, ParquetColumnSource};
use crate::window;
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

/// Outcome of [`export_rows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Columns written, in output order.
    pub columns: Vec<String>,
    pub rows_written: u64,
    pub batches: usize,
}

/// Write every column name as a `- name` line and return the names.
///
/// # Errors
/// [`SliceError::InvalidSchema`](crate::SliceError::InvalidSchema) for an empty
/// or malformed schema; write failures.
pub fn show_schema<S, W>(source: &S, out: &mut W) -> Result<Vec<String>>
where
    S: ColumnSource + ?Sized,
    W: Write + ?Sized,
{
    let resolver = SchemaResolver::new(&source.schema())?;
    for name in resolver.list_columns() {
        writeln!(out, "- {name}")?;
    }
    out.flush()?;
    Ok(resolver.list_columns().to_vec())
}

/// Export the window described by `options` from `source` as delimited text.
///
/// The header (unless disabled) is written once the request has been
/// validated and planned; data records follow in row order.
///
/// # Errors
/// Validation errors (`UnknownColumn`, `OffsetOutOfRange`, `InvalidWindow`),
/// read errors (`SeekFailure`, `ShortRead`, decoder errors) and write failures.
pub fn export_rows<S, W>(source: &mut S, options: &ExportOptions, out: W) -> Result<ExportSummary>
where
    S: ColumnSource + ?Sized,
    W: Write,
{
    let resolver = SchemaResolver::new(&source.schema())?;
    let columns = resolver.validate(&options.columns)?;
    let plan = window::plan(
        options.offset,
        options.size,
        source.num_rows(),
        options.batch_size,
    )?;

    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(out);
    if options.header {
        RecordSink::write_record(&mut writer, &columns)?;
    }

    let stats = materialize(source, &resolver, &columns, &plan, &mut writer)?;
    writer.flush()?;

    tracing::debug!(rows = stats.rows, batches = stats.batches, "export finished");
    Ok(ExportSummary {
        columns,
        rows_written: stats.rows,
        batches: stats.batches,
    })
}

/// [`show_schema`] over a Parquet file.
///
/// # Errors
/// Open/footer errors plus those of [`show_schema`].
pub fn show_schema_file<W: Write + ?Sized>(path: impl AsRef<Path>, out: &mut W) -> Result<Vec<String>> {
    let source = ParquetColumnSource::open(path)?;
    show_schema(&source, out)
}

/// [`export_rows`] over a Parquet file.
///
/// # Errors
/// Open/footer errors plus those of [`export_rows`].
pub fn export_file<W: Write>(
    path: impl AsRef<Path>,
    options: &ExportOptions,
    out: W,
) -> Result<ExportSummary> {
    let mut source = ParquetColumnSource::open(path)?;
    export_rows(&mut source, options, out)
}
