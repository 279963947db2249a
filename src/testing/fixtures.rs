//! Pre-built datasets for common export scenarios.

use crate::source::MemorySource;
use serde::{Deserialize, Serialize};

/// One row of the scenario dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub id: i64,
    pub name: String,
    pub score: f64,
}

/// Row `i` of the scenario dataset.
///
/// Values are derived from the row index so any slice can be checked without
/// keeping the whole dataset around.
///
/// # Example
///
/// ```
/// use parquet_slice::testing::score_row;
///
/// let row = score_row(3);
/// assert_eq!(row.id, 3);
/// assert_eq!(row.name, "user-3");
/// ```
#[must_use]
pub fn score_row(i: u64) -> ScoreRow {
    let id = i64::try_from(i).unwrap_or(i64::MAX);
    ScoreRow {
        id,
        name: format!("user-{i}"),
        score: id as f64 * 1.5,
    }
}

/// The first `n` rows of the scenario dataset.
#[must_use]
pub fn score_rows(n: u64) -> Vec<ScoreRow> {
    (0..n).map(score_row).collect()
}

/// The scenario dataset as a [`MemorySource`] with columns `id`, `name`, `score`.
#[must_use]
pub fn score_source(n: u64) -> MemorySource {
    let rows = score_rows(n);
    MemorySource::new(n)
        .with_column("id", rows.iter().map(|r| r.id))
        .with_column("name", rows.iter().map(|r| r.name.clone()))
        .with_column("score", rows.iter().map(|r| r.score))
}

/// The CSV fields expected for row `i` over `columns`.
///
/// # Panics
///
/// Panics on a column outside `id`, `name`, `score`.
#[must_use]
pub fn expected_fields(i: u64, columns: &[&str]) -> Vec<String> {
    let row = score_row(i);
    columns
        .iter()
        .map(|c| match *c {
            "id" => row.id.to_string(),
            "name" => row.name.clone(),
            "score" => row.score.to_string(),
            other => panic!("no column {other} in the scenario dataset"),
        })
        .collect()
}
