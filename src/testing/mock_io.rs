//! Mock I/O helpers: temporary Parquet files built from typed rows.

use anyhow::{Context, Result};
use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};
use serde_arrow::to_record_batch;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A temporary file that is automatically deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create a new temporary file with a specific extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> std::io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Get the path to the temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write typed rows to a Parquet file.
///
/// The Arrow schema is inferred from `T`, so an empty `data` still produces a
/// file with the right columns. With `rows_per_group`, every chunk of that many
/// rows is flushed as its own row group.
///
/// # Returns
/// Number of rows written (`data.len()`).
///
/// # Errors
/// Schema inference, conversion, file creation or writing failures.
pub fn write_parquet_rows<T: Serialize + Deserialize<'static>>(
    path: impl AsRef<Path>,
    data: &[T],
    rows_per_group: Option<usize>,
) -> Result<usize> {
    let path = path.as_ref();

    let fields: Vec<FieldRef> = Vec::<FieldRef>::from_type::<T>(TracingOptions::default())
        .context("infer Arrow schema from type T")?;

    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let props = WriterProperties::builder().build();

    let chunk = rows_per_group.unwrap_or(data.len()).max(1);
    let first: RecordBatch =
        to_record_batch(&fields, &&data[..chunk.min(data.len())]).context("convert rows to RecordBatch")?;
    let mut writer =
        ArrowWriter::try_new(file, first.schema(), Some(props)).context("create ArrowWriter")?;
    writer.write(&first).context("write batch to parquet")?;

    for rows in data.chunks(chunk).skip(1) {
        writer.flush().context("close row group")?;
        let batch = to_record_batch(&fields, &rows).context("convert rows to RecordBatch")?;
        writer.write(&batch).context("write batch to parquet")?;
    }
    writer.close().context("close ArrowWriter")?;

    Ok(data.len())
}

/// Write typed rows to a temporary `.parquet` file.
///
/// # Errors
/// See [`write_parquet_rows`].
///
/// # Example
///
/// ```
/// use parquet_slice::testing::{mock_parquet_file, score_rows};
///
/// let file = mock_parquet_file(&score_rows(5), None).unwrap();
/// assert!(file.path().exists());
/// ```
pub fn mock_parquet_file<T: Serialize + Deserialize<'static>>(
    data: &[T],
    rows_per_group: Option<usize>,
) -> Result<TempFilePath> {
    let temp = TempFilePath::with_extension("parquet")?;
    write_parquet_rows(temp.path(), data, rows_per_group)?;
    Ok(temp)
}
