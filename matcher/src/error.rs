//! Error types for matching, binding and configuration.
//!
//! Matching failures ([`SyntaxError`]) are caused by user input and carry
//! enough detail for a host to render a message. Binding failures
//! ([`BindError`]) mean the bindings disagree with the descriptor, or the
//! invoked command itself failed; they are never caused by command-line text.

use thiserror::Error;

/// Errors raised while matching a token stream against a descriptor.
///
/// The first violated constraint aborts the match; errors are never
/// aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// An option-shaped token names no option of the active scope.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A required option was not supplied.
    #[error("missing required option: {0}")]
    MissingRequiredOption(String),

    /// A value-taking option was the last token.
    #[error("missing value for option: {0}")]
    MissingOptionValue(String),

    /// A required positional argument had no token left.
    #[error("missing required argument: {0}")]
    MissingRequiredArgument(String),

    /// A token could not be converted to the declared value type.
    #[error("cannot convert '{token}' to {expected}")]
    Conversion { token: String, expected: String },

    /// A token in sub-command position names no sub-command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Errors raised while applying a match to a target.
#[derive(Debug, Error)]
pub enum BindError {
    /// A class-scoped value has no field setter.
    #[error("no field binding for '{0}'")]
    UnboundField(String),

    /// The selected sub-command has no registered callable.
    #[error("no callable bound for command '{0}'")]
    UnboundCommand(String),

    /// A value has a different shape than the binding expects.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An integer does not fit the binding's integer type.
    #[error("integer {value} is out of range for {target}")]
    OutOfRange { value: i64, target: &'static str },

    /// A parameter index past the end of the parameter list.
    #[error("parameter index out of range: {0}")]
    ParameterIndex(usize),

    /// A parameter was read as the wrong kind of slot.
    #[error("parameter {index} is not {expected}")]
    SlotKind {
        index: usize,
        expected: &'static str,
    },

    /// An injected value is not of the requested type.
    #[error("injected parameter {index} ({key}) has a different type")]
    InjectedType { index: usize, key: String },

    /// The invoked command reported a failure of its own.
    #[error("command failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BindError {
    /// Wraps an error returned by a command callable.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Handler(err.into())
    }
}

/// Errors that can occur while loading or saving a matcher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`SyntaxError`].
pub type Result<T> = std::result::Result<T, SyntaxError>;
