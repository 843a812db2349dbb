//! Error types for reading and writing binary models.

use crate::repr::gbdt::TreeValidationError;

/// Errors that can occur while reading a binary model.
///
/// Every variant is fatal: no partial ensemble is returned.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The input ended inside a section.
    #[error(
        "truncated input: {section} needs {needed} bytes at offset {offset}, only {available} left"
    )]
    Truncated {
        section: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A count field holds a negative value.
    #[error("invalid {field}: {value}")]
    InvalidCount { field: &'static str, value: i32 },

    /// Eager validation rejected a tree.
    #[error("tree {tree} is malformed: {source}")]
    InvalidTree {
        tree: usize,
        #[source]
        source: TreeValidationError,
    },

    /// I/O error while reading the file or stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while writing a binary model.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A count does not fit the format's 32-bit field.
    #[error("{field} = {value} does not fit in a 32-bit count")]
    CountOverflow { field: &'static str, value: usize },

    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
