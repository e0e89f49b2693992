//! The outcome of a successful match.
//!
//! A [`MatchResult`] is a plain owned value: it holds converted values keyed
//! by option canonical name or argument name, and, when a sub-command was
//! selected, that command's parameter slots in declaration order. It keeps no
//! reference to the descriptor or matcher that produced it.

use std::collections::BTreeMap;

use cmdline_core::ContextKey;
use serde::Serialize;

use crate::binder::Bindings;
use crate::context::InvocationContext;
use crate::error::BindError;
use crate::value::Value;

/// Values matched in the class scope.
///
/// Absent keys mean "not supplied"; list-typed entries are present as empty
/// lists when nothing was supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopeMatch {
    pub(crate) options: BTreeMap<String, Value>,
    pub(crate) arguments: BTreeMap<String, Value>,
}

impl ScopeMatch {
    /// Value of an option, by canonical name.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Value of a positional argument, by name.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Whether a flag option was given.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.options.get(name), Some(Value::Bool(true)))
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.options.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn arguments(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.arguments.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.arguments.is_empty()
    }

    pub(crate) fn into_values(self) -> impl Iterator<Item = (String, Value)> {
        self.options.into_iter().chain(self.arguments)
    }
}

/// One parameter slot of a selected sub-command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchedParameter {
    Option { name: String, value: Option<Value> },
    Argument { name: String, value: Option<Value> },
    Injected { key: ContextKey },
}

/// The selected sub-command and its parameter slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandMatch {
    /// Canonical command name, even when an alias was typed.
    pub name: String,
    /// Slots in declaration order.
    pub parameters: Vec<MatchedParameter>,
}

impl CommandMatch {
    /// Value of one of the command's options, by canonical name.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.parameters.iter().find_map(|param| match param {
            MatchedParameter::Option { name: n, value } if n == name => value.as_ref(),
            _ => None,
        })
    }

    /// Value of one of the command's arguments, by name.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.parameters.iter().find_map(|param| match param {
            MatchedParameter::Argument { name: n, value } if n == name => value.as_ref(),
            _ => None,
        })
    }
}

/// Result of a single successful match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub class: ScopeMatch,
    pub command: Option<CommandMatch>,
}

impl MatchResult {
    /// Name of the selected sub-command, if any.
    pub fn command_name(&self) -> Option<&str> {
        self.command.as_ref().map(|cmd| cmd.name.as_str())
    }

    /// Applies this result to `target`; see [`Bindings::apply`].
    pub fn apply<T>(
        self,
        bindings: &Bindings<T>,
        context: &InvocationContext,
        target: &mut T,
    ) -> Result<(), BindError> {
        bindings.apply(self, context, target)
    }

    /// Serializes the result as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
