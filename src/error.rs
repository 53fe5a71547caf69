use thiserror::Error;

use crate::value::ValueKind;

/// Convenience alias for store-oriented results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors propagated by [`RowStore`](crate::RowStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The column declaration is empty or names a kind that can not be stored.
    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },

    /// The iterator is stale, was never issued by this store, or points at a
    /// removed row.
    #[error("iterator is not valid for this store")]
    InvalidIterator,

    #[error("column {column} out of range for {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// The value can not be assigned to the column, directly or by conversion.
    #[error("column {column} expected {expected}, found {found}")]
    TypeMismatch {
        column: usize,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("no comparator registered for sort column {sort_id}")]
    NoComparator { sort_id: String },

    #[error("rows can not be reordered manually while the store is sorted")]
    NotAllowedWhileSorted,

    #[error("new order is not a permutation of 0..{len}")]
    InvalidPermutation { len: usize },

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A snapshot row does not match the declared schema.
    #[error("snapshot row {row} has {found} cells, expected {expected}")]
    SnapshotArity {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl StoreError {
    pub fn invalid_schema(reason: impl Into<String>) -> Self {
        StoreError::InvalidSchema {
            reason: reason.into(),
        }
    }

    pub fn column_out_of_range(column: usize, columns: usize) -> Self {
        StoreError::ColumnOutOfRange { column, columns }
    }

    pub fn type_mismatch(column: usize, expected: ValueKind, found: ValueKind) -> Self {
        StoreError::TypeMismatch {
            column,
            expected,
            found,
        }
    }

    pub fn no_comparator(sort_id: impl ToString) -> Self {
        StoreError::NoComparator {
            sort_id: sort_id.to_string(),
        }
    }
}
