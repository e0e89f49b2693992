//! Descriptor type definitions for command grammar modeling.
//!
//! This module defines the data model consumed by the matcher: named options,
//! positional arguments, sub-commands and the injected parameters a
//! sub-command resolves from its invocation context. The types are plain
//! data, serializable with [`serde`], and are never mutated by matching.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type for options and arguments.
///
/// Conversion from a command-line token is a closed dispatch over these
/// variants; extending the grammar means adding a variant here.
///
/// # Examples
///
/// ```
/// use cmdline_core::ValueType;
///
/// assert_eq!(ValueType::default(), ValueType::String);
/// assert!(!ValueType::Bool.takes_value());
/// assert!(ValueType::Integer.takes_value());
///
/// let format = ValueType::Choice(vec!["json".into(), "yaml".into()]);
/// assert_eq!(format.to_string(), "one of json|yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Presence flag, consumes no value token.
    Bool,
    /// Text, passed through unchanged (the default).
    #[default]
    String,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Number,
    /// One of a fixed set of words (e.g., `--format json|yaml`).
    Choice(Vec<String>),
}

impl ValueType {
    /// Returns `true` if an option of this type consumes a value token.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Bool)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("boolean"),
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::Choice(choices) => write!(f, "one of {}", choices.join("|")),
        }
    }
}

/// How many values a single option or argument collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// One value.
    #[default]
    Single,
    /// An ordered list. For arguments this is the unbounded form that takes
    /// every remaining token; for options each occurrence appends one value.
    List,
}

/// Renders an option alias as it is written on the command line.
///
/// One-character aliases take a single dash, longer ones a double dash.
///
/// # Examples
///
/// ```
/// use cmdline_core::option_token;
///
/// assert_eq!(option_token("o"), "-o");
/// assert_eq!(option_token("output"), "--output");
/// ```
pub fn option_token(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{alias}")
    } else {
        format!("--{alias}")
    }
}

fn alias_matches(alias: &str, token: &str) -> bool {
    if alias.chars().count() == 1 {
        !token.starts_with("--") && token.strip_prefix('-') == Some(alias)
    } else {
        token.strip_prefix("--") == Some(alias)
    }
}

/// A named command-line value.
///
/// Aliases are stored bare (`"o"`, `"output"`); the first alias is the
/// canonical name under which matched values are reported and bound.
///
/// # Examples
///
/// ```
/// use cmdline_core::{OptionDescriptor, ValueType};
///
/// let verbose = OptionDescriptor::flag(&["v", "verbose"])
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.canonical_name(), "v");
/// assert!(verbose.matches("-v"));
/// assert!(verbose.matches("--verbose"));
/// assert!(!verbose.takes_value());
///
/// let output = OptionDescriptor::with_value(&["o", "output"], ValueType::String).required();
/// assert!(output.required);
/// assert!(output.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Alias names, canonical name first.
    pub names: Vec<String>,
    /// Type of value this option accepts.
    #[serde(default)]
    pub value_type: ValueType,
    /// Single value or repeatable list.
    #[serde(default)]
    pub multiplicity: Multiplicity,
    /// Whether the option must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Description for help rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionDescriptor {
    /// Creates a boolean flag (no value).
    pub fn flag(names: &[&str]) -> Self {
        Self::with_value(names, ValueType::Bool)
    }

    /// Creates an option that takes a value of `value_type`.
    pub fn with_value(names: &[&str], value_type: ValueType) -> Self {
        Self {
            names: names.iter().map(|name| name.to_string()).collect(),
            value_type,
            multiplicity: Multiplicity::Single,
            required: false,
            description: None,
        }
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the option as repeatable, collecting one value per occurrence.
    pub fn allow_multiple(mut self) -> Self {
        self.multiplicity = Multiplicity::List;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns the canonical (first) alias.
    pub fn canonical_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    /// Returns `true` if the option consumes a value token.
    pub fn takes_value(&self) -> bool {
        self.value_type.takes_value()
    }

    /// Returns `true` if the option collects a list.
    pub fn is_list(&self) -> bool {
        self.multiplicity == Multiplicity::List
    }

    /// Checks if a command-line token (`-o`, `--output`) names this option.
    pub fn matches(&self, token: &str) -> bool {
        self.names.iter().any(|alias| alias_matches(alias, token))
    }
}

/// A positional command-line value.
///
/// Arguments are matched by their position within the scope, in declaration
/// order. The `name` is only used to report and bind the value.
///
/// # Examples
///
/// ```
/// use cmdline_core::{ArgumentDescriptor, ValueType};
///
/// let count = ArgumentDescriptor::required("count", ValueType::Integer);
/// assert!(count.required);
/// assert!(!count.is_unbounded());
///
/// let files = ArgumentDescriptor::optional("files", ValueType::String).unbounded();
/// assert!(files.is_unbounded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    /// Binding name of the argument.
    pub name: String,
    /// Type of value expected.
    #[serde(default)]
    pub value_type: ValueType,
    /// Single token or every remaining token.
    #[serde(default)]
    pub multiplicity: Multiplicity,
    /// Is this argument required?
    #[serde(default)]
    pub required: bool,
    /// Description for help rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentDescriptor {
    /// Creates a required positional argument.
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            multiplicity: Multiplicity::Single,
            required: true,
            description: None,
        }
    }

    /// Creates an optional positional argument.
    pub fn optional(name: &str, value_type: ValueType) -> Self {
        Self {
            required: false,
            ..Self::required(name, value_type)
        }
    }

    /// Makes the argument consume every remaining token as a list.
    pub fn unbounded(mut self) -> Self {
        self.multiplicity = Multiplicity::List;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns `true` for the unbounded (list) form.
    pub fn is_unbounded(&self) -> bool {
        self.multiplicity == Multiplicity::List
    }
}

/// Type identity of an injected parameter.
///
/// [`ContextKey::of`] derives the key from a Rust type, which is how the
/// invocation context stores typed attributes. Descriptor files may spell the
/// same key out, or use a host-chosen name registered with
/// [`ContextKey::named`].
///
/// # Examples
///
/// ```
/// use cmdline_core::ContextKey;
///
/// struct Locale;
/// assert_eq!(ContextKey::of::<Locale>(), ContextKey::of::<Locale>());
/// assert_ne!(ContextKey::of::<Locale>(), ContextKey::of::<String>());
/// assert_eq!(ContextKey::named("locale").as_str(), "locale");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextKey(String);

impl ContextKey {
    /// Key for values of type `T`, named by [`std::any::type_name`].
    ///
    /// Type names are not guaranteed unique or stable across compiler
    /// versions, so two distinct types may share a key and a key written by
    /// one build may not match another. Use [`named`](Self::named) for keys
    /// that are stored in descriptor documents. Values read back through a
    /// key are still downcast to the requested type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    /// Key with an explicit name.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One slot of a sub-command's parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDescriptor {
    /// Filled from a matched option.
    Option(OptionDescriptor),
    /// Filled from a matched positional argument.
    Argument(ArgumentDescriptor),
    /// Filled from the invocation context, never from the command line.
    Injected(ContextKey),
}

/// Descriptor for a sub-command.
///
/// The parameter list is ordered: it is both the order in which the
/// sub-command's positional arguments are matched and the order in which
/// values are handed to the command's callable.
///
/// # Examples
///
/// ```
/// use cmdline_core::{
///     ArgumentDescriptor, CommandDescriptor, ContextKey, OptionDescriptor, ValueType,
/// };
///
/// struct Locale;
///
/// let cmd = CommandDescriptor::new("commit")
///     .with_alias("ci")
///     .with_option(OptionDescriptor::with_value(&["m", "message"], ValueType::String))
///     .with_injected(ContextKey::of::<Locale>())
///     .with_argument(ArgumentDescriptor::optional("paths", ValueType::String).unbounded());
///
/// assert!(cmd.matches_name("ci"));
/// assert_eq!(cmd.parameters.len(), 3);
/// assert_eq!(cmd.options().count(), 1);
/// assert_eq!(cmd.arguments().count(), 1);
/// assert_eq!(cmd.injected().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Name of the sub-command.
    pub name: String,
    /// Alternative names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl CommandDescriptor {
    /// Creates a sub-command with no parameters.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Appends an option parameter.
    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.parameters.push(ParameterDescriptor::Option(option));
        self
    }

    /// Appends a positional argument parameter.
    pub fn with_argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.parameters.push(ParameterDescriptor::Argument(argument));
        self
    }

    /// Appends an injected parameter.
    pub fn with_injected(mut self, key: ContextKey) -> Self {
        self.parameters.push(ParameterDescriptor::Injected(key));
        self
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Options of this sub-command, in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &OptionDescriptor> + '_ {
        self.parameters.iter().filter_map(|param| match param {
            ParameterDescriptor::Option(option) => Some(option),
            _ => None,
        })
    }

    /// Positional arguments of this sub-command, in declaration order.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentDescriptor> + '_ {
        self.parameters.iter().filter_map(|param| match param {
            ParameterDescriptor::Argument(argument) => Some(argument),
            _ => None,
        })
    }

    /// Injected parameter keys, in declaration order.
    pub fn injected(&self) -> impl Iterator<Item = &ContextKey> + '_ {
        self.parameters.iter().filter_map(|param| match param {
            ParameterDescriptor::Injected(key) => Some(key),
            _ => None,
        })
    }

    /// Returns `true` if `name` is the command name or one of its aliases.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| alias == name)
    }

    /// Finds an option of this sub-command by command-line token.
    pub fn find_option(&self, token: &str) -> Option<&OptionDescriptor> {
        self.options().find(|option| option.matches(token))
    }
}

/// Complete grammar of a command.
///
/// Class-scoped options and arguments apply whichever sub-command (if any)
/// is chosen; each sub-command adds its own scope. At most one sub-command
/// can be the default entry point, selected when no sub-command is named.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
///
/// let desc = ClassDescriptor::new("tool")
///     .with_option(OptionDescriptor::with_value(&["s"], ValueType::String))
///     .with_command(
///         CommandDescriptor::new("main")
///             .with_argument(ArgumentDescriptor::optional("file", ValueType::String)),
///     )
///     .with_default_command("main");
///
/// assert!(desc.find_option("-s").is_some());
/// assert_eq!(desc.default_command().map(|c| c.name.as_str()), Some("main"));
/// assert_eq!(desc.command_names(), vec!["main"]);
/// assert!(validate_descriptor(&desc).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Command name.
    pub name: String,
    /// Short description of the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Class-scoped options.
    #[serde(default)]
    pub options: Vec<OptionDescriptor>,
    /// Class-scoped positional arguments.
    #[serde(default)]
    pub arguments: Vec<ArgumentDescriptor>,
    /// Sub-commands.
    #[serde(default)]
    pub commands: Vec<CommandDescriptor>,
    /// Name of the sub-command selected when none is named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_command: Option<String>,
}

impl ClassDescriptor {
    /// Creates an empty descriptor with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a class-scoped option.
    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a class-scoped positional argument.
    pub fn with_argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Adds a sub-command.
    pub fn with_command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    /// Sets the default sub-command.
    pub fn with_default_command(mut self, name: &str) -> Self {
        self.default_command = Some(name.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Finds a sub-command by name or alias.
    pub fn find_command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|cmd| cmd.matches_name(name))
    }

    /// Finds a class-scoped option by command-line token.
    pub fn find_option(&self, token: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|option| option.matches(token))
    }

    /// The default sub-command, if one is declared and exists.
    pub fn default_command(&self) -> Option<&CommandDescriptor> {
        self.default_command
            .as_deref()
            .and_then(|name| self.find_command(name))
    }

    /// Gets all sub-command names.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|cmd| cmd.name.as_str()).collect()
    }
}
