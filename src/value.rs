use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Dynamic cell value stored in a [`RowStore`](crate::RowStore) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i32),
    Float(f32),
    Double(f64),
    UInt(u32),
    Long(i64),
    Bool(bool),
    Byte(u8),
    Char(char),
    Str(String),
    Date(u64),
    /// Opaque application handle. Stored and copied, never ordered or converted.
    Handle(u64),
    Null,
}

/// Enumerates the underlying type stored in a [`Value`].
///
/// A column schema is a list of kinds; [`ValueKind::Null`] is the only kind
/// that can not be used as a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Int,
    Float,
    Double,
    UInt,
    Long,
    Bool,
    Byte,
    Char,
    Str,
    Date,
    Handle,
    Null,
}

impl Value {
    /// Returns the [`ValueKind`] describing the contained value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::UInt(_) => ValueKind::UInt,
            Value::Long(_) => ValueKind::Long,
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Char(_) => ValueKind::Char,
            Value::Str(_) => ValueKind::Str,
            Value::Date(_) => ValueKind::Date,
            Value::Handle(_) => ValueKind::Handle,
            Value::Null => ValueKind::Null,
        }
    }

    /// Returns the zero value of `kind`, the content of a freshly inserted cell.
    pub fn default_for(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Double => Value::Double(0.0),
            ValueKind::UInt => Value::UInt(0),
            ValueKind::Long => Value::Long(0),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Byte => Value::Byte(0),
            ValueKind::Char => Value::Char('\0'),
            ValueKind::Str => Value::Str(String::new()),
            ValueKind::Date => Value::Date(0),
            ValueKind::Handle => Value::Handle(0),
            ValueKind::Null => Value::Null,
        }
    }

    /// Converts `self` into a value of `target` kind.
    ///
    /// Returns `None` when no conversion exists or the value does not fit the
    /// target range. `Null` converts to the target's default.
    pub fn convert_to(self, target: ValueKind) -> Option<Value> {
        let kind = self.kind();
        if kind == target {
            return Some(self);
        }
        if kind == ValueKind::Null {
            return Some(Value::default_for(target));
        }
        if target == ValueKind::Str {
            return match self {
                Value::Handle(_) => None,
                other => Some(Value::Str(other.to_string())),
            };
        }
        if let Some(int) = self.as_integer() {
            return Self::from_integer(int, target);
        }
        match (self, target) {
            (Value::Float(v), ValueKind::Double) => Some(Value::Double(v.into())),
            (Value::Double(v), ValueKind::Float) => Some(Value::Float(v as f32)),
            _ => None,
        }
    }

    /// Compares two values of the same kind with the built-in ordering.
    ///
    /// Returns `None` for mismatched kinds and for [`ValueKind::Handle`],
    /// which has no natural order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let ordering = match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::UInt(a), Value::UInt(b)) => a.cmp(b),
            (Value::Long(a), Value::Long(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Null, Value::Null) => Ordering::Equal,
            _ => return None,
        };
        Some(ordering)
    }

    fn as_integer(&self) -> Option<i128> {
        match *self {
            Value::Int(v) => Some(v.into()),
            Value::UInt(v) => Some(v.into()),
            Value::Long(v) => Some(v.into()),
            Value::Byte(v) => Some(v.into()),
            Value::Date(v) => Some(v.into()),
            Value::Bool(v) => Some(v.into()),
            _ => None,
        }
    }

    fn from_integer(value: i128, target: ValueKind) -> Option<Value> {
        match target {
            ValueKind::Int => i32::try_from(value).ok().map(Value::Int),
            ValueKind::UInt => u32::try_from(value).ok().map(Value::UInt),
            ValueKind::Long => i64::try_from(value).ok().map(Value::Long),
            ValueKind::Byte => u8::try_from(value).ok().map(Value::Byte),
            ValueKind::Date => u64::try_from(value).ok().map(Value::Date),
            ValueKind::Float => Some(Value::Float(value as f32)),
            ValueKind::Double => Some(Value::Double(value as f64)),
            _ => None,
        }
    }
}

impl ValueKind {
    /// Returns a lower-case name for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::UInt => "uint",
            ValueKind::Long => "long",
            ValueKind::Bool => "bool",
            ValueKind::Byte => "byte",
            ValueKind::Char => "char",
            ValueKind::Str => "str",
            ValueKind::Date => "date",
            ValueKind::Handle => "handle",
            ValueKind::Null => "null",
        }
    }

    /// Returns `true` when a column of this kind can be declared.
    pub fn is_storable(self) -> bool {
        self != ValueKind::Null
    }

    /// Returns `true` when values of this kind have a built-in ordering.
    pub fn is_ordered(self) -> bool {
        !matches!(self, ValueKind::Handle | ValueKind::Null)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:.2}", v),
            Value::Double(v) => write!(f, "{:.4}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v),
            Value::Handle(v) => write!(f, "#{:x}", v),
            Value::Null => write!(f, "null"),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        }
    };
}

impl_from!(Int, i32);
impl_from!(Float, f32);
impl_from!(Double, f64);
impl_from!(UInt, u32);
impl_from!(Long, i64);
impl_from!(Bool, bool);
impl_from!(Byte, u8);
impl_from!(Char, char);
impl_from!(Date, u64);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

macro_rules! impl_try_from_value {
    ($ty:ty, $variant:ident) => {
        impl TryFrom<Value> for $ty {
            type Error = Value;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                if let Value::$variant(inner) = value {
                    Ok(inner.into())
                } else {
                    Err(value)
                }
            }
        }
    };
}

impl_try_from_value!(i32, Int);
impl_try_from_value!(f32, Float);
impl_try_from_value!(f64, Double);
impl_try_from_value!(u32, UInt);
impl_try_from_value!(i64, Long);
impl_try_from_value!(bool, Bool);
impl_try_from_value!(u8, Byte);
impl_try_from_value!(char, Char);
impl_try_from_value!(String, Str);
impl_try_from_value!(u64, Date);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversions_respect_range() {
        assert_eq!(Value::Int(7).convert_to(ValueKind::Long), Some(Value::Long(7)));
        assert_eq!(Value::Int(-1).convert_to(ValueKind::UInt), None);
        assert_eq!(Value::Long(300).convert_to(ValueKind::Byte), None);
        assert_eq!(Value::Bool(true).convert_to(ValueKind::Int), Some(Value::Int(1)));
    }

    #[test]
    fn scalars_convert_to_strings() {
        assert_eq!(
            Value::Int(42).convert_to(ValueKind::Str),
            Some(Value::Str("42".into()))
        );
        assert_eq!(Value::Handle(1).convert_to(ValueKind::Str), None);
        assert_eq!(Value::Str("1".into()).convert_to(ValueKind::Int), None);
    }

    #[test]
    fn null_resets_to_default() {
        assert_eq!(
            Value::Null.convert_to(ValueKind::Str),
            Some(Value::Str(String::new()))
        );
    }

    #[test]
    fn handles_are_unordered() {
        assert_eq!(Value::Handle(1).compare(&Value::Handle(2)), None);
        assert_eq!(Value::Int(1).compare(&Value::Long(1)), None);
        assert_eq!(
            Value::Str("a".into()).compare(&Value::Str("b".into())),
            Some(Ordering::Less)
        );
    }
}
