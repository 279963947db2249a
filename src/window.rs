//! Row-window validation and batch partitioning.
//!
//! [`plan`] turns a requested `(offset, size)` into a [`BatchPlan`]: the window is
//! checked against the file's row count, clamped to end at the last row, and
//! split into contiguous batches of at most `max_batch` rows.

use crate::error::{Result, SliceError};
use std::ops::Range;

/// Half-open row range `[offset, offset + len)` over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub offset: u64,
    pub len: u64,
}

impl RowWindow {
    #[must_use]
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }

    #[must_use]
    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }
}

/// One contiguous slice of the window, read in a single pass over the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// First row of the batch (absolute file row index).
    pub start: u64,
    /// Number of rows in the batch.
    pub len: usize,
}

impl Batch {
    #[must_use]
    pub fn end(&self) -> u64 {
        self.start + self.len as u64
    }
}

/// Validated, clamped window and its batches, in read order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub window: RowWindow,
    /// `min(max_batch, window.len)`; zero for an empty window.
    pub batch_size: usize,
    pub batches: Vec<Batch>,
}

impl BatchPlan {
    /// Rows the decoder must skip before the first batch.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.window.offset
    }

    /// Total rows the plan will produce.
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.window.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Compute the read plan for a requested window.
///
/// A window that runs past the end of the file is clamped to end at
/// `total_rows`; this is not an error. A zero-length window yields a plan with
/// no batches.
///
/// # Errors
/// - [`SliceError::InvalidWindow`] for a negative `offset` or `size`, or a zero `max_batch`.
/// - [`SliceError::OffsetOutOfRange`] when `offset >= total_rows`.
pub fn plan(offset: i64, size: i64, total_rows: u64, max_batch: usize) -> Result<BatchPlan> {
    if offset < 0 {
        return Err(SliceError::InvalidWindow(format!(
            "offset must not be negative (got {offset})"
        )));
    }
    if size < 0 {
        return Err(SliceError::InvalidWindow(format!(
            "size must not be negative (got {size})"
        )));
    }
    if max_batch == 0 {
        return Err(SliceError::InvalidWindow(
            "batch size must be at least 1".into(),
        ));
    }

    let start = offset.cast_unsigned();
    if start >= total_rows {
        return Err(SliceError::OffsetOutOfRange { offset, total_rows });
    }

    let requested = size.cast_unsigned();
    let len = requested.min(total_rows - start);
    if len < requested {
        tracing::debug!(offset, requested, clamped = len, total_rows, "window clamped to end of file");
    }

    let window = RowWindow { offset: start, len };
    let batch_size = usize::try_from(len).map_or(max_batch, |l| l.min(max_batch));

    let mut batches = Vec::new();
    if len > 0 {
        let step = batch_size as u64;
        batches.reserve(usize::try_from(len.div_ceil(step)).unwrap_or(0));
        let mut cursor = start;
        while cursor < window.end() {
            let end = (cursor + step).min(window.end());
            batches.push(Batch {
                start: cursor,
                len: (end - cursor) as usize,
            });
            cursor = end;
        }
    }

    tracing::debug!(
        offset = window.offset,
        rows = window.len,
        batch_size,
        batches = batches.len(),
        "planned row window"
    );

    Ok(BatchPlan {
        window,
        batch_size,
        batches,
    })
}
