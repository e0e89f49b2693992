//! Applying a match to a live target.
//!
//! [`Bindings`] registers, per target type, a setter for each class-scoped
//! option or argument and a callable for each sub-command. Applying a
//! [`MatchResult`] writes the supplied class values, then calls the selected
//! sub-command with its [`Parameters`] assembled in declaration order, pulling
//! injected slots from the [`InvocationContext`].
//!
//! All conversion already happened during matching. Any failure here means
//! the bindings and the descriptor disagree, or the invoked command failed.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cmdline_core::ContextKey;
use tracing::{debug, trace};

use crate::context::{Attribute, InvocationContext};
use crate::error::BindError;
use crate::result::{MatchResult, MatchedParameter};
use crate::value::{FromValue, Value};

type FieldSetter<T> = Box<dyn Fn(&mut T, Value) -> Result<(), BindError> + Send + Sync>;
type CommandHandler<T> = Box<dyn Fn(&mut T, &Parameters) -> Result<(), BindError> + Send + Sync>;

/// One assembled parameter handed to a command callable.
#[derive(Debug, Clone)]
pub enum Parameter {
    /// A matched option or argument; `None` when not supplied.
    Value { name: String, value: Option<Value> },
    /// An injected slot; `None` when the context has no entry for `key`.
    Injected {
        key: ContextKey,
        value: Option<Attribute>,
    },
}

/// Ordered parameter list of a sub-command invocation.
#[derive(Debug, Clone)]
pub struct Parameters {
    command: String,
    slots: Vec<Parameter>,
}

impl Parameters {
    fn assemble(
        command: String,
        matched: Vec<MatchedParameter>,
        context: &InvocationContext,
    ) -> Self {
        let slots = matched
            .into_iter()
            .map(|param| match param {
                MatchedParameter::Option { name, value }
                | MatchedParameter::Argument { name, value } => Parameter::Value { name, value },
                MatchedParameter::Injected { key } => {
                    let value = context.lookup(&key);
                    if value.is_none() {
                        debug!(
                            command = %command,
                            key = %key,
                            "No context value for injected parameter"
                        );
                    }
                    Parameter::Injected { key, value }
                }
            })
            .collect();
        Self { command, slots }
    }

    /// Name of the invoked command.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> + '_ {
        self.slots.iter()
    }

    fn slot(&self, index: usize) -> Result<&Parameter, BindError> {
        self.slots.get(index).ok_or(BindError::ParameterIndex(index))
    }

    /// The matched value at `index`.
    ///
    /// # Errors
    ///
    /// [`ParameterIndex`](BindError::ParameterIndex) past the end,
    /// [`SlotKind`](BindError::SlotKind) for an injected slot.
    pub fn value(&self, index: usize) -> Result<Option<&Value>, BindError> {
        match self.slot(index)? {
            Parameter::Value { value, .. } => Ok(value.as_ref()),
            Parameter::Injected { .. } => Err(BindError::SlotKind {
                index,
                expected: "a matched value",
            }),
        }
    }

    /// The matched value at `index`, extracted as `V`.
    pub fn get<V: FromValue>(&self, index: usize) -> Result<Option<V>, BindError> {
        self.value(index)?.cloned().map(V::from_value).transpose()
    }

    /// The matched value of the option or argument called `name`.
    pub fn find(&self, name: &str) -> Option<&Value> {
        self.slots.iter().find_map(|slot| match slot {
            Parameter::Value { name: n, value } if n == name => value.as_ref(),
            _ => None,
        })
    }

    /// The injected value at `index`, downcast to `C`.
    ///
    /// # Errors
    ///
    /// [`SlotKind`](BindError::SlotKind) for a matched-value slot,
    /// [`InjectedType`](BindError::InjectedType) when the context holds a
    /// value of another type under the slot's key.
    pub fn injected<C: Any + Send + Sync>(
        &self,
        index: usize,
    ) -> Result<Option<Arc<C>>, BindError> {
        match self.slot(index)? {
            Parameter::Injected { value: None, .. } => Ok(None),
            Parameter::Injected {
                key,
                value: Some(value),
            } => Arc::clone(value)
                .downcast::<C>()
                .map(Some)
                .map_err(|_| BindError::InjectedType {
                    index,
                    key: key.to_string(),
                }),
            Parameter::Value { .. } => Err(BindError::SlotKind {
                index,
                expected: "an injected value",
            }),
        }
    }
}

/// Field setters and command callables for targets of type `T`.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
/// use cmdline_matcher::{Bindings, InvocationContext, Matcher};
///
/// #[derive(Default)]
/// struct Tool {
///     verbose: bool,
///     greeted: Option<String>,
/// }
///
/// let desc = ClassDescriptor::new("tool")
///     .with_option(OptionDescriptor::flag(&["v", "verbose"]))
///     .with_command(
///         CommandDescriptor::new("greet")
///             .with_argument(ArgumentDescriptor::required("name", ValueType::String)),
///     );
///
/// let bindings = Bindings::new()
///     .field("v", |tool: &mut Tool, on: bool| tool.verbose = on)
///     .command("greet", |tool: &mut Tool, params| {
///         tool.greeted = params.get::<String>(0)?;
///         Ok(())
///     });
///
/// let matcher = Matcher::new(&desc).unwrap();
/// let mut tool = Tool::default();
/// matcher
///     .match_line("--verbose greet world")
///     .unwrap()
///     .apply(&bindings, &InvocationContext::new(), &mut tool)
///     .unwrap();
///
/// assert!(tool.verbose);
/// assert_eq!(tool.greeted.as_deref(), Some("world"));
/// ```
pub struct Bindings<T> {
    fields: HashMap<String, FieldSetter<T>>,
    commands: HashMap<String, CommandHandler<T>>,
}

impl<T> Bindings<T> {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            commands: HashMap::new(),
        }
    }

    /// Registers the setter for a class-scoped option (by canonical name) or
    /// argument (by name).
    pub fn field<V, F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        V: FromValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.fields.insert(
            name.into(),
            Box::new(move |target, value| {
                setter(target, V::from_value(value)?);
                Ok(())
            }),
        );
        self
    }

    /// Registers the callable for a sub-command (by canonical name).
    pub fn command<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut T, &Parameters) -> Result<(), BindError> + Send + Sync + 'static,
    {
        self.commands.insert(name.into(), Box::new(handler));
        self
    }

    /// Applies `result` to `target`.
    ///
    /// Supplied class values are written through their setters; absent ones
    /// leave the target untouched. Then the selected sub-command, if any, is
    /// called once.
    ///
    /// # Errors
    ///
    /// [`UnboundField`](BindError::UnboundField) or
    /// [`UnboundCommand`](BindError::UnboundCommand) when a binding is
    /// missing, extraction errors from setters, and whatever the command
    /// callable returns.
    pub fn apply(
        &self,
        result: MatchResult,
        context: &InvocationContext,
        target: &mut T,
    ) -> Result<(), BindError> {
        let MatchResult { class, command } = result;

        for (name, value) in class.into_values() {
            let setter = self
                .fields
                .get(&name)
                .ok_or_else(|| BindError::UnboundField(name.clone()))?;
            trace!(field = %name, "Writing class value");
            setter(target, value)?;
        }

        if let Some(command) = command {
            let handler = self
                .commands
                .get(&command.name)
                .ok_or_else(|| BindError::UnboundCommand(command.name.clone()))?;
            let parameters = Parameters::assemble(command.name, command.parameters, context);
            debug!(
                command = %parameters.command(),
                parameters = parameters.len(),
                "Invoking sub-command"
            );
            handler(target, &parameters)?;
        }

        Ok(())
    }
}

impl<T> Default for Bindings<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Bindings<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        let mut commands: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        fields.sort_unstable();
        commands.sort_unstable();
        f.debug_struct("Bindings")
            .field("fields", &fields)
            .field("commands", &commands)
            .finish()
    }
}
