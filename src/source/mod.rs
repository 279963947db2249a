//! The decoder seam: a columnar file seen as qualified columns plus a read cursor.
//!
//! A [`ColumnSource`] owns the open file and every column's read position.
//! All positioning goes through `&mut self`, so callers hold the cursor
//! explicitly and columns never carry hidden shared state.

use crate::error::Result;
use crate::value::Value;

pub mod memory;
pub mod parquet;

pub use memory::MemorySource;
pub use parquet::ParquetColumnSource;

/// Column-oriented access to one open file.
pub trait ColumnSource {
    /// Qualified column identifiers, in schema order.
    fn schema(&self) -> Vec<String>;

    /// Total number of rows in the file.
    fn num_rows(&self) -> u64;

    /// Advance every column's position by `rows`.
    ///
    /// # Errors
    /// Fails when the skip cannot be honored (e.g. past the end of the file).
    fn skip_rows(&mut self, rows: u64) -> Result<()>;

    /// Read up to `count` values of the column at `path`, starting at that
    /// column's current position, and advance it by the number returned.
    ///
    /// # Errors
    /// [`SliceError::UnknownPath`](crate::SliceError::UnknownPath) for a path not
    /// in [`schema`](Self::schema); any decoding failure.
    fn read_column(&mut self, path: &str, count: usize) -> Result<Vec<Value>>;
}
