//! Batched, multi-column materialization of a row window.
//!
//! The source is positioned once at the window start, then each batch reads
//! every selected column for exactly `batch.len` values. Columns are read
//! independently, so a column that comes back short would shift its values
//! against the others; that is reported as [`SliceError::ShortRead`] instead.
//! Once all buffers of a batch are filled they are interleaved into row-major
//! records and handed to the sink one by one.

use crate::error::{Result, SliceError};
use crate::schema::SchemaResolver;
use crate::source::ColumnSource;
use crate::value::Value;
use crate::window::{Batch, BatchPlan};
use std::io::Write;

/// Receives rendered records, one per call, in row order.
pub trait RecordSink {
    /// Write one record.
    ///
    /// # Errors
    /// Any failure of the underlying writer.
    fn write_record(&mut self, fields: &[String]) -> Result<()>;
}

impl<W: Write> RecordSink for csv::Writer<W> {
    fn write_record(&mut self, fields: &[String]) -> Result<()> {
        csv::Writer::write_record(self, fields)?;
        Ok(())
    }
}

impl RecordSink for Vec<Vec<String>> {
    fn write_record(&mut self, fields: &[String]) -> Result<()> {
        self.push(fields.to_vec());
        Ok(())
    }
}

/// Counters reported after a materialization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    pub rows: u64,
    pub batches: usize,
}

/// Read one batch: one buffer per column, in `columns` order.
///
/// # Errors
/// [`SliceError::ShortRead`] when a column returns a different number of
/// values than `batch.len`; any decoder error.
pub fn read_batch<S: ColumnSource + ?Sized>(
    source: &mut S,
    resolver: &SchemaResolver,
    columns: &[String],
    batch: &Batch,
) -> Result<Vec<Vec<Value>>> {
    columns
        .iter()
        .map(|name| {
            let values = source.read_column(&resolver.qualify(name), batch.len)?;
            if values.len() != batch.len {
                return Err(SliceError::ShortRead {
                    column: name.clone(),
                    expected: batch.len,
                    got: values.len(),
                });
            }
            Ok(values)
        })
        .collect()
}

/// Render row `row` across all column buffers.
fn record_at(buffers: &[Vec<Value>], row: usize) -> Vec<String> {
    buffers.iter().map(|column| column[row].render()).collect()
}

/// Drive `source` through `plan`, writing one record per row to `sink`.
///
/// Records already written when an error occurs stay written.
///
/// # Errors
/// [`SliceError::SeekFailure`] if the initial skip fails, [`SliceError::ShortRead`]
/// on misaligned columns, and any decoder or sink error.
pub fn materialize<S, K>(
    source: &mut S,
    resolver: &SchemaResolver,
    columns: &[String],
    plan: &BatchPlan,
    sink: &mut K,
) -> Result<MaterializeStats>
where
    S: ColumnSource + ?Sized,
    K: RecordSink + ?Sized,
{
    let mut stats = MaterializeStats::default();
    if plan.is_empty() {
        return Ok(stats);
    }

    let start = plan.start();
    if start > 0 {
        source.skip_rows(start).map_err(|e| match e {
            SliceError::SeekFailure { .. } => e,
            other => SliceError::SeekFailure {
                rows: start,
                source: Box::new(other),
            },
        })?;
        tracing::debug!(rows = start, "skipped leading rows");
    }

    for batch in &plan.batches {
        let buffers = read_batch(source, resolver, columns, batch)?;
        for row in 0..batch.len {
            sink.write_record(&record_at(&buffers, row))?;
        }
        stats.rows += batch.len as u64;
        stats.batches += 1;
        tracing::trace!(start = batch.start, len = batch.len, "batch written");
    }

    Ok(stats)
}
