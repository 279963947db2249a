//! Column-name resolution between the decoder's identifiers and user-facing names.
//!
//! The decoder names every leaf column with a structural namespace prefix
//! ([`NAMESPACE_PREFIX`]). Users never see it: [`strip`] removes it for display
//! and validation, [`qualify`] puts it back right before a column read. Nothing
//! outside this module inspects raw identifiers.

use crate::error::{Result, SliceError};
use std::collections::HashSet;

/// Root marker followed by the path delimiter, as carried by every identifier.
pub const NAMESPACE_PREFIX: &str = "Schema\x01";

/// Remove the namespace prefix from a decoder identifier.
///
/// Identifiers without the prefix are returned unchanged.
#[must_use]
pub fn strip(identifier: &str) -> &str {
    identifier
        .strip_prefix(NAMESPACE_PREFIX)
        .unwrap_or(identifier)
}

/// Re-apply the namespace prefix to a bare column name.
#[must_use]
pub fn qualify(name: &str) -> String {
    format!("{NAMESPACE_PREFIX}{name}")
}

/// Bare column names of one file, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaResolver {
    columns: Vec<String>,
}

impl SchemaResolver {
    /// Build a resolver from the decoder's qualified identifiers.
    ///
    /// # Errors
    /// [`SliceError::InvalidSchema`] when the schema is empty, an identifier
    /// lacks the namespace prefix or has an empty name, or two identifiers collide.
    pub fn new<S: AsRef<str>>(identifiers: &[S]) -> Result<Self> {
        if identifiers.is_empty() {
            return Err(SliceError::InvalidSchema("schema has no columns".into()));
        }

        let mut seen = HashSet::with_capacity(identifiers.len());
        let mut columns = Vec::with_capacity(identifiers.len());
        for id in identifiers {
            let id = id.as_ref();
            let name = id.strip_prefix(NAMESPACE_PREFIX).ok_or_else(|| {
                SliceError::InvalidSchema(format!("identifier {id:?} lacks the namespace prefix"))
            })?;
            if name.is_empty() {
                return Err(SliceError::InvalidSchema(format!(
                    "identifier {id:?} has an empty column name"
                )));
            }
            if !seen.insert(name) {
                return Err(SliceError::InvalidSchema(format!(
                    "duplicate column {name:?}"
                )));
            }
            columns.push(name.to_string());
        }
        Ok(Self { columns })
    }

    /// Every column's bare name, in schema order.
    #[must_use]
    pub fn list_columns(&self) -> &[String] {
        &self.columns
    }

    /// Check a user selection against the schema.
    ///
    /// An empty selection selects every column in schema order. Otherwise the
    /// selection is returned as given (order and repeats preserved) once every
    /// name is known.
    ///
    /// # Errors
    /// [`SliceError::UnknownColumn`] naming the first unknown column.
    pub fn validate<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>> {
        if requested.is_empty() {
            return Ok(self.columns.clone());
        }

        let known: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        requested
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if known.contains(name) {
                    Ok(name.to_string())
                } else {
                    Err(SliceError::UnknownColumn {
                        name: name.to_string(),
                        available: self.columns.clone(),
                    })
                }
            })
            .collect()
    }

    /// Decoder path for a bare column name.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        qualify(name)
    }
}
