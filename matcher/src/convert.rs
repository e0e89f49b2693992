//! Token to value conversion.
//!
//! Conversion is a closed dispatch over [`ValueType`]: adding a supported
//! type means adding an arm here. Parsing is locale-neutral and stateless,
//! so a token always converts the same way for a given type.

use cmdline_core::ValueType;

use crate::error::{Result, SyntaxError};
use crate::value::Value;

/// Converts a single token to `value_type`.
///
/// # Errors
///
/// Returns [`SyntaxError::Conversion`] naming the token and the expected
/// type when the token does not parse.
///
/// # Examples
///
/// ```
/// use cmdline_core::ValueType;
/// use cmdline_matcher::{convert, SyntaxError, Value};
///
/// assert_eq!(convert("5", &ValueType::Integer), Ok(Value::Integer(5)));
/// assert_eq!(
///     convert("five", &ValueType::Integer),
///     Err(SyntaxError::Conversion { token: "five".into(), expected: "integer".into() })
/// );
/// ```
pub fn convert(token: &str, value_type: &ValueType) -> Result<Value> {
    let failed = || SyntaxError::Conversion {
        token: token.to_string(),
        expected: value_type.to_string(),
    };

    match value_type {
        ValueType::String => Ok(Value::String(token.to_string())),
        ValueType::Integer => token.parse::<i64>().map(Value::Integer).map_err(|_| failed()),
        ValueType::Number => match token.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Number(n)),
            _ => Err(failed()),
        },
        ValueType::Bool => token.parse::<bool>().map(Value::Bool).map_err(|_| failed()),
        ValueType::Choice(choices) => {
            if choices.iter().any(|choice| choice == token) {
                Ok(Value::String(token.to_string()))
            } else {
                Err(failed())
            }
        }
    }
}

/// Converts an ordered sequence of tokens element-wise into a list.
///
/// An empty sequence gives an empty list.
pub fn convert_all<S: AsRef<str>>(tokens: &[S], value_type: &ValueType) -> Result<Value> {
    tokens
        .iter()
        .map(|token| convert(token.as_ref(), value_type))
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}
