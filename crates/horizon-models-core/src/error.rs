//! Error types for Horizon Models.

use thiserror::Error;

/// Errors returned by the checked model operations.
///
/// Most model operations never fail: lookups return `Option` and unsupported
/// mutations are logged no-ops. The `try_*` variants on concrete models
/// return this error instead of panicking on a bad index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The row does not exist in the model.
    #[error("row {row} is out of range for a model with {row_count} rows")]
    RowOutOfRange { row: usize, row_count: usize },

    /// The insertion index is past the end of the model.
    #[error("cannot insert at index {index} into a model with {row_count} rows")]
    InsertOutOfRange { index: usize, row_count: usize },

    /// The model handle does not hold a model.
    #[error("model handle is empty")]
    EmptyHandle,
}

/// Result type for checked model operations.
pub type ModelResult<T> = Result<T, ModelError>;
