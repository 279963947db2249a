//! In-memory [`ColumnSource`] for tests and for callers that already hold columns.

use super::ColumnSource;
use crate::error::{Result, SliceError};
use crate::schema::qualify;
use crate::value::Value;

/// Columns held in memory, each with its own read position.
///
/// A column may be shorter than [`num_rows`](ColumnSource::num_rows); reads past
/// its end return fewer values, which is how short reads are simulated.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    num_rows: u64,
    columns: Vec<MemoryColumn>,
    fail_skip: bool,
    reads: Vec<ReadCall>,
}

#[derive(Debug, Clone)]
struct MemoryColumn {
    identifier: String,
    values: Vec<Value>,
    position: u64,
}

/// A `read_column` call as observed by a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCall {
    pub path: String,
    /// Column position before the read.
    pub position: u64,
    pub requested: usize,
}

impl MemorySource {
    /// An empty source reporting `num_rows` rows.
    #[must_use]
    pub fn new(num_rows: u64) -> Self {
        Self {
            num_rows,
            ..Self::default()
        }
    }

    /// Add a column under its bare name; it is exposed qualified.
    #[must_use]
    pub fn with_column<V: Into<Value>>(self, name: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.with_identifier(&qualify(name), values)
    }

    /// Add a column under a raw identifier, exactly as given.
    #[must_use]
    pub fn with_identifier<V: Into<Value>>(
        mut self,
        identifier: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.columns.push(MemoryColumn {
            identifier: identifier.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            position: 0,
        });
        self
    }

    /// Make every `skip_rows` call fail.
    #[must_use]
    pub fn failing_skip(mut self) -> Self {
        self.fail_skip = true;
        self
    }

    /// Every `read_column` call made so far, in call order.
    #[must_use]
    pub fn reads(&self) -> &[ReadCall] {
        &self.reads
    }
}

impl ColumnSource for MemorySource {
    fn schema(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.identifier.clone()).collect()
    }

    fn num_rows(&self) -> u64 {
        self.num_rows
    }

    fn skip_rows(&mut self, rows: u64) -> Result<()> {
        if self.fail_skip {
            return Err(SliceError::SeekFailure {
                rows,
                source: "skip rejected by source".into(),
            });
        }
        for column in &mut self.columns {
            column.position += rows;
        }
        Ok(())
    }

    fn read_column(&mut self, path: &str, count: usize) -> Result<Vec<Value>> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.identifier == path)
            .ok_or_else(|| SliceError::UnknownPath(path.to_string()))?;

        self.reads.push(ReadCall {
            path: path.to_string(),
            position: column.position,
            requested: count,
        });

        let start = usize::try_from(column.position)
            .unwrap_or(usize::MAX)
            .min(column.values.len());
        let end = start.saturating_add(count).min(column.values.len());
        let out = column.values[start..end].to_vec();
        column.position += out.len() as u64;
        Ok(out)
    }
}
