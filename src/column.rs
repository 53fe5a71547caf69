use std::fmt;

use crate::error::{StoreError, StoreResult};
use crate::value::{Value, ValueKind};

/// Ordered list of column kinds shared by every row of a store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSchema {
    kinds: Vec<ValueKind>,
}

impl ColumnSchema {
    /// Validates `kinds` and builds a schema.
    ///
    /// Fails when no column is declared or when a column is declared as
    /// [`ValueKind::Null`].
    pub fn new(kinds: impl Into<Vec<ValueKind>>) -> StoreResult<Self> {
        let kinds = kinds.into();
        if kinds.is_empty() {
            return Err(StoreError::invalid_schema("at least one column is required"));
        }
        if let Some(index) = kinds.iter().position(|kind| !kind.is_storable()) {
            return Err(StoreError::invalid_schema(format!(
                "column {} has unsupported kind {}",
                index, kinds[index]
            )));
        }
        Ok(Self { kinds })
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` when no column has been declared yet.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kind(&self, column: usize) -> Option<ValueKind> {
        self.kinds.get(column).copied()
    }

    pub fn kinds(&self) -> &[ValueKind] {
        &self.kinds
    }

    /// Builds a row holding every column's default value.
    pub fn default_row(&self) -> Vec<Value> {
        self.kinds.iter().map(|kind| Value::default_for(*kind)).collect()
    }

    /// Converts `value` for storage in `column`.
    pub fn coerce(&self, column: usize, value: Value) -> StoreResult<Value> {
        let expected = self
            .kind(column)
            .ok_or_else(|| StoreError::column_out_of_range(column, self.len()))?;
        let found = value.kind();
        value
            .convert_to(expected)
            .ok_or_else(|| StoreError::type_mismatch(column, expected, found))
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.kinds.iter().map(|kind| kind.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Trait implemented by Rust types that map onto a single column kind.
///
/// Used for typed reads such as [`RowStore::get`](crate::RowStore::get).
pub trait ColumnType:
    Clone + Default + fmt::Debug + fmt::Display + Into<Value> + TryFrom<Value, Error = Value>
{
    const KIND: ValueKind;
}

macro_rules! impl_column_type {
    ($ty:ty, $kind:expr) => {
        impl ColumnType for $ty {
            const KIND: ValueKind = $kind;
        }
    };
}

impl_column_type!(i32, ValueKind::Int);
impl_column_type!(f32, ValueKind::Float);
impl_column_type!(f64, ValueKind::Double);
impl_column_type!(u32, ValueKind::UInt);
impl_column_type!(i64, ValueKind::Long);
impl_column_type!(bool, ValueKind::Bool);
impl_column_type!(u8, ValueKind::Byte);
impl_column_type!(char, ValueKind::Char);
impl_column_type!(String, ValueKind::Str);
impl_column_type!(u64, ValueKind::Date);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_null_schemas() {
        assert!(matches!(
            ColumnSchema::new(Vec::new()),
            Err(StoreError::InvalidSchema { .. })
        ));
        assert!(matches!(
            ColumnSchema::new(vec![ValueKind::Int, ValueKind::Null]),
            Err(StoreError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn coerce_reports_the_column() {
        let schema = ColumnSchema::new(vec![ValueKind::Str, ValueKind::Handle]).unwrap();
        assert_eq!(schema.coerce(0, 5.into()).unwrap(), Value::Str("5".into()));
        let err = schema.coerce(1, 5.into()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch {
                column: 1,
                expected: ValueKind::Handle,
                found: ValueKind::Int
            }
        ));
        assert!(matches!(
            schema.coerce(2, 5.into()),
            Err(StoreError::ColumnOutOfRange { column: 2, columns: 2 })
        ));
    }
}
