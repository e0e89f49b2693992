//! Converted values and their typed extraction.

use serde::Serialize;

use crate::error::BindError;

/// A value produced by type conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    String(String),
    Integer(i64),
    Number(f64),
    List(Vec<Value>),
}

impl Value {
    /// Short name of the value's shape, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Extraction of a Rust value from a converted [`Value`].
///
/// Used by field setters and command callables. A mismatch means the
/// bindings disagree with the descriptor, so it is reported as a
/// [`BindError`] rather than a syntax error.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, BindError>;
}

fn mismatch(expected: &'static str, found: &Value) -> BindError {
    BindError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, BindError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Number(n) => Ok(n),
            Value::Integer(i) => Ok(i as f64),
            other => Err(mismatch("number", &other)),
        }
    }
}

macro_rules! narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, BindError> {
                    let wide = i64::from_value(value)?;
                    <$ty>::try_from(wide).map_err(|_| BindError::OutOfRange {
                        value: wide,
                        target: stringify!($ty),
                    })
                }
            }
        )*
    };
}

narrow_integer!(i8, i16, i32, u8, u16, u32, u64, usize);

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("list", &other)),
        }
    }
}
