//! Export settings.

/// Rows read per column per batch unless overridden.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Rows requested unless overridden.
pub const DEFAULT_SIZE: i64 = 10;

/// What to export and how to write it.
///
/// `offset` and `size` are signed so that negative input reaches the window
/// planner and is rejected there with a proper error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// First row to export.
    pub offset: i64,
    /// Rows requested; clamped to the end of the file.
    pub size: i64,
    /// Bare column names, in output order. Empty means every column.
    pub columns: Vec<String>,
    /// Maximum rows per column read.
    pub batch_size: usize,
    /// Field delimiter of the output.
    pub delimiter: u8,
    /// Write the column names as the first record.
    pub header: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            size: DEFAULT_SIZE,
            columns: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: b',',
            header: true,
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn window(mut self, offset: i64, size: i64) -> Self {
        self.offset = offset;
        self.size = size;
        self
    }

    #[must_use]
    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Split a comma-separated column list. An empty string selects nothing.
#[must_use]
pub fn parse_columns(list: &str) -> Vec<String> {
    if list.is_empty() {
        return Vec::new();
    }
    list.split(',').map(str::to_string).collect()
}
