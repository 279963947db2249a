//! Parquet-backed [`ColumnSource`].
//!
//! Footer metadata is loaded once at [`ParquetColumnSource::open`]. The first
//! read of a column opens a projected Arrow reader over the cached metadata,
//! positioned at that column's cursor; later reads continue from the same
//! reader, so only the selected leaf is decoded and nothing is decoded twice.
//! A skip drops the open readers and the next read reopens at the new position.
//!
//! Every leaf column is exposed as `Schema\x01<dotted.path>`.

use super::ColumnSource;
use crate::error::{Result, SliceError};
use crate::schema::qualify;
use crate::value::Value;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use arrow::error::ArrowError;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReader,
    ParquetRecordBatchReaderBuilder,
};
use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read state of one leaf column.
#[derive(Default)]
struct LeafCursor {
    /// Next row handed out by `read_column`.
    position: u64,
    /// Open reader, positioned at `position + pending.len()`.
    reader: Option<ParquetRecordBatchReader>,
    /// Decoded values not yet handed out.
    pending: VecDeque<Value>,
}

/// An open Parquet file with one read position per leaf column.
///
/// The file handle is closed when the source is dropped.
pub struct ParquetColumnSource {
    path: PathBuf,
    file: File,
    metadata: ArrowReaderMetadata,
    identifiers: Vec<String>,
    cursors: Vec<LeafCursor>,
    num_rows: u64,
}

impl ParquetColumnSource {
    /// Open `path` and read its footer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or is not valid Parquet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let metadata = ArrowReaderMetadata::load(&file, ArrowReaderOptions::default())
            .map_err(|e| SliceError::decoder(format!("read parquet footer of {}", path.display()), e))?;

        let file_meta = metadata.metadata().file_metadata();
        let num_rows = u64::try_from(file_meta.num_rows()).map_err(|_| {
            SliceError::InvalidSchema(format!("negative row count {}", file_meta.num_rows()))
        })?;
        let identifiers: Vec<String> = file_meta
            .schema_descr()
            .columns()
            .iter()
            .map(|c| qualify(&c.path().string()))
            .collect();

        tracing::debug!(
            path = %path.display(),
            columns = identifiers.len(),
            num_rows,
            row_groups = metadata.metadata().num_row_groups(),
            "opened parquet file"
        );

        Ok(Self {
            cursors: identifiers.iter().map(|_| LeafCursor::default()).collect(),
            path,
            file,
            metadata,
            identifiers,
            num_rows,
        })
    }

    /// Path the source was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn leaf_index(&self, path: &str) -> Result<usize> {
        self.identifiers
            .iter()
            .position(|id| id == path)
            .ok_or_else(|| SliceError::UnknownPath(path.to_string()))
    }

    /// Projected reader over one leaf, starting at row `position`.
    fn open_reader(&self, leaf: usize, position: u64, batch_size: usize) -> Result<ParquetRecordBatchReader> {
        let path = &self.identifiers[leaf];
        let offset = usize::try_from(position)
            .map_err(|e| SliceError::decoder(format!("row offset {position} out of range"), e))?;
        let file = self.file.try_clone()?;
        let builder = ParquetRecordBatchReaderBuilder::new_with_metadata(file, self.metadata.clone());
        let mask = ProjectionMask::leaves(builder.parquet_schema(), [leaf]);
        tracing::trace!(column = %path, position, batch_size, "opening column reader");
        builder
            .with_projection(mask)
            .with_offset(offset)
            .with_batch_size(batch_size)
            .build()
            .map_err(|e| SliceError::decoder(format!("build reader for column {path:?}"), e))
    }
}

impl ColumnSource for ParquetColumnSource {
    fn schema(&self) -> Vec<String> {
        self.identifiers.clone()
    }

    fn num_rows(&self) -> u64 {
        self.num_rows
    }

    fn skip_rows(&mut self, rows: u64) -> Result<()> {
        if let Some(furthest) = self.cursors.iter().map(|c| c.position).max()
            && furthest.saturating_add(rows) > self.num_rows
        {
            return Err(SliceError::SeekFailure {
                rows,
                source: format!(
                    "cannot move past row {} of {}",
                    furthest.saturating_add(rows),
                    self.num_rows
                )
                .into(),
            });
        }
        for cursor in &mut self.cursors {
            cursor.position += rows;
            cursor.reader = None;
            cursor.pending.clear();
        }
        Ok(())
    }

    fn read_column(&mut self, path: &str, count: usize) -> Result<Vec<Value>> {
        let leaf = self.leaf_index(path)?;
        let position = self.cursors[leaf].position;
        if count == 0 || position >= self.num_rows {
            return Ok(Vec::new());
        }

        let decoded_to = position + self.cursors[leaf].pending.len() as u64;
        if self.cursors[leaf].reader.is_none()
            && self.cursors[leaf].pending.len() < count
            && decoded_to < self.num_rows
        {
            let reader = self.open_reader(leaf, decoded_to, count)?;
            self.cursors[leaf].reader = Some(reader);
        }

        let cursor = &mut self.cursors[leaf];
        while cursor.pending.len() < count {
            let Some(reader) = cursor.reader.as_mut() else {
                break;
            };
            let Some(batch) = reader.next() else {
                cursor.reader = None;
                break;
            };
            let batch =
                batch.map_err(|e| SliceError::decoder(format!("read column {path:?}"), e))?;
            if batch.num_columns() == 0 {
                continue;
            }
            let values = leaf_values(batch.column(0))
                .map_err(|e| SliceError::decoder(format!("convert column {path:?}"), e))?;
            cursor.pending.extend(values);
        }

        let take = count.min(cursor.pending.len());
        let out: Vec<Value> = cursor.pending.drain(..take).collect();
        cursor.position += out.len() as u64;
        tracing::trace!(column = path, position, requested = count, got = out.len(), "read column");
        Ok(out)
    }
}

/// Values of the leaf under a projected top-level column.
///
/// Projecting a nested leaf still yields its enclosing structs, each reduced
/// to the one projected child. Walk down to the leaf; a row whose ancestor is
/// null is null.
fn leaf_values(column: &ArrayRef) -> Result<Vec<Value>, ArrowError> {
    let mut current = Arc::clone(column);
    let mut ancestor_nulls: Option<NullBuffer> = None;
    loop {
        let child = match current.as_struct_opt() {
            Some(s) if s.num_columns() == 1 => {
                ancestor_nulls = NullBuffer::union(ancestor_nulls.as_ref(), s.nulls());
                Arc::clone(s.column(0))
            }
            _ => break,
        };
        current = child;
    }

    let mut values = array_values(current.as_ref())?;
    if let Some(nulls) = ancestor_nulls {
        for (value, valid) in values.iter_mut().zip(nulls.iter()) {
            if !valid {
                *value = Value::Null;
            }
        }
    }
    Ok(values)
}

/// Convert one Arrow array into cell values.
fn array_values(array: &dyn Array) -> Result<Vec<Value>, ArrowError> {
    let options = FormatOptions::default();
    let cell: Box<dyn Fn(usize) -> Value + '_> = match array.data_type() {
        DataType::Null => Box::new(|_| Value::Null),
        DataType::Boolean => {
            let a = array.as_boolean();
            Box::new(move |i| Value::Boolean(a.value(i)))
        }
        DataType::Int8 => {
            let a = array.as_primitive::<Int8Type>();
            Box::new(move |i| Value::Int(i64::from(a.value(i))))
        }
        DataType::Int16 => {
            let a = array.as_primitive::<Int16Type>();
            Box::new(move |i| Value::Int(i64::from(a.value(i))))
        }
        DataType::Int32 => {
            let a = array.as_primitive::<Int32Type>();
            Box::new(move |i| Value::Int(i64::from(a.value(i))))
        }
        DataType::Int64 => {
            let a = array.as_primitive::<Int64Type>();
            Box::new(move |i| Value::Int(a.value(i)))
        }
        DataType::UInt8 => {
            let a = array.as_primitive::<UInt8Type>();
            Box::new(move |i| Value::UInt(u64::from(a.value(i))))
        }
        DataType::UInt16 => {
            let a = array.as_primitive::<UInt16Type>();
            Box::new(move |i| Value::UInt(u64::from(a.value(i))))
        }
        DataType::UInt32 => {
            let a = array.as_primitive::<UInt32Type>();
            Box::new(move |i| Value::UInt(u64::from(a.value(i))))
        }
        DataType::UInt64 => {
            let a = array.as_primitive::<UInt64Type>();
            Box::new(move |i| Value::UInt(a.value(i)))
        }
        DataType::Float32 => {
            let a = array.as_primitive::<Float32Type>();
            Box::new(move |i| Value::Float32(a.value(i)))
        }
        DataType::Float64 => {
            let a = array.as_primitive::<Float64Type>();
            Box::new(move |i| Value::Float(a.value(i)))
        }
        DataType::Utf8 => {
            let a = array.as_string::<i32>();
            Box::new(move |i| Value::Text(a.value(i).to_string()))
        }
        DataType::LargeUtf8 => {
            let a = array.as_string::<i64>();
            Box::new(move |i| Value::Text(a.value(i).to_string()))
        }
        DataType::Utf8View => {
            let a = array.as_string_view();
            Box::new(move |i| Value::Text(a.value(i).to_string()))
        }
        DataType::Binary => {
            let a = array.as_binary::<i32>();
            Box::new(move |i| Value::Bytes(a.value(i).to_vec()))
        }
        DataType::LargeBinary => {
            let a = array.as_binary::<i64>();
            Box::new(move |i| Value::Bytes(a.value(i).to_vec()))
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array, &options)?;
            Box::new(move |i| Value::Formatted(formatter.value(i).to_string()))
        }
    };

    Ok((0..array.len())
        .map(|i| if array.is_null(i) { Value::Null } else { cell(i) })
        .collect())
}
