//! Descriptor validation.
//!
//! Validates the structural invariants of a [`ClassDescriptor`] before any
//! matching happens: names, duplicate aliases, positional ambiguity and the
//! default command. An invalid descriptor is a construction defect, so the
//! matcher refuses to be built from one.
//!
//! # Examples
//!
//! ```
//! use cmdline_core::*;
//!
//! let desc = ClassDescriptor::new("cp")
//!     .with_argument(ArgumentDescriptor::required("source", ValueType::String))
//!     .with_argument(ArgumentDescriptor::required("dest", ValueType::String));
//! assert!(validate_descriptor(&desc).is_empty());
//!
//! // Invalid: unbounded argument followed by another argument
//! let bad = ClassDescriptor::new("cp")
//!     .with_argument(ArgumentDescriptor::required("sources", ValueType::String).unbounded())
//!     .with_argument(ArgumentDescriptor::required("dest", ValueType::String));
//! assert_eq!(
//!     validate_descriptor(&bad),
//!     vec![DescriptorError::UnboundedNotLast("sources".to_string())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    ArgumentDescriptor, ClassDescriptor, CommandDescriptor, Multiplicity, OptionDescriptor,
    ValueType,
};

/// Descriptor validation errors.
///
/// Each variant describes a specific structural problem. The `Display` impl
/// provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Class name is empty or whitespace-only.
    #[error("descriptor name cannot be empty")]
    EmptyClassName,
    /// A name is empty, contains whitespace, or starts with a dash.
    #[error("invalid name: '{0}'")]
    InvalidName(String),
    /// An option has no alias at all.
    #[error("option must define at least one name")]
    MissingOptionName,
    /// Two options in the same scope share an alias.
    #[error("duplicate option in scope: {0}")]
    DuplicateOption(String),
    /// Two arguments in the same scope share a name.
    #[error("duplicate argument in scope: {0}")]
    DuplicateArgument(String),
    /// Two sub-commands share a name or alias.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    /// An unbounded argument is followed by another argument.
    #[error("unbounded argument must be the last positional argument: {0}")]
    UnboundedNotLast(String),
    /// A flag option is declared repeatable.
    #[error("flag option cannot collect a list: {0}")]
    ListFlag(String),
    /// A positional argument is declared as a flag.
    #[error("argument cannot be a flag: {0}")]
    FlagArgument(String),
    /// A choice type lists no choices.
    #[error("choice type declares no choices: {0}")]
    EmptyChoice(String),
    /// The default command is not declared.
    #[error("unknown default command: {0}")]
    UnknownDefaultCommand(String),
    /// A class argument is required while sub-commands can take its tokens.
    #[error("class argument cannot be required when sub-commands are declared: {0}")]
    RequiredClassArgument(String),
    /// A descriptor document could not be deserialized.
    #[error("malformed descriptor: {0}")]
    Malformed(String),
}

/// Validates a class descriptor.
///
/// Checks names, option aliases, positional arguments and sub-commands,
/// returning at the first problem found.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
///
/// let desc = ClassDescriptor::new("tool")
///     .with_command(CommandDescriptor::new("run"))
///     .with_default_command("build");
/// assert_eq!(
///     validate_descriptor(&desc),
///     vec![DescriptorError::UnknownDefaultCommand("build".to_string())]
/// );
/// ```
pub fn validate_descriptor(desc: &ClassDescriptor) -> Vec<DescriptorError> {
    let mut errors = Vec::new();

    if desc.name.trim().is_empty() {
        errors.push(DescriptorError::EmptyClassName);
        return errors;
    }

    errors.extend(validate_options(desc.options.iter()));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_arguments(desc.arguments.iter()));
    if !errors.is_empty() {
        return errors;
    }

    if !desc.commands.is_empty() {
        if let Some(arg) = desc.arguments.iter().find(|arg| arg.required) {
            errors.push(DescriptorError::RequiredClassArgument(arg.name.clone()));
            return errors;
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for cmd in &desc.commands {
        for name in std::iter::once(&cmd.name).chain(cmd.aliases.iter()) {
            if !is_valid_name(name) {
                errors.push(DescriptorError::InvalidName(name.clone()));
                return errors;
            }
            if !seen.insert(name.as_str()) {
                errors.push(DescriptorError::DuplicateCommand(name.clone()));
                return errors;
            }
        }

        errors.extend(validate_command(cmd));
        if !errors.is_empty() {
            return errors;
        }
    }

    if let Some(name) = &desc.default_command {
        if desc.find_command(name).is_none() {
            errors.push(DescriptorError::UnknownDefaultCommand(name.clone()));
        }
    }

    errors
}

/// Validates the options and arguments of one sub-command scope.
pub fn validate_command(cmd: &CommandDescriptor) -> Vec<DescriptorError> {
    let mut errors = validate_options(cmd.options());
    if !errors.is_empty() {
        return errors;
    }
    errors.extend(validate_arguments(cmd.arguments()));
    errors
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('-') && !name.chars().any(char::is_whitespace)
}

fn validate_value_type(owner: &str, value_type: &ValueType) -> Option<DescriptorError> {
    match value_type {
        ValueType::Choice(choices) if choices.is_empty() => {
            Some(DescriptorError::EmptyChoice(owner.to_string()))
        }
        _ => None,
    }
}

fn validate_options<'a>(
    options: impl Iterator<Item = &'a OptionDescriptor>,
) -> Vec<DescriptorError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in options {
        if option.names.is_empty() {
            errors.push(DescriptorError::MissingOptionName);
            return errors;
        }

        for name in &option.names {
            if !is_valid_name(name) {
                errors.push(DescriptorError::InvalidName(name.clone()));
                return errors;
            }
            if !seen.insert(name.clone()) {
                errors.push(DescriptorError::DuplicateOption(name.clone()));
                return errors;
            }
        }

        if option.value_type == ValueType::Bool && option.multiplicity == Multiplicity::List {
            errors.push(DescriptorError::ListFlag(option.canonical_name().to_string()));
            return errors;
        }

        if let Some(err) = validate_value_type(option.canonical_name(), &option.value_type) {
            errors.push(err);
            return errors;
        }
    }

    errors
}

fn validate_arguments<'a>(
    arguments: impl Iterator<Item = &'a ArgumentDescriptor>,
) -> Vec<DescriptorError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut unbounded: Option<&str> = None;

    for arg in arguments {
        if let Some(previous) = unbounded {
            errors.push(DescriptorError::UnboundedNotLast(previous.to_string()));
            return errors;
        }

        if !is_valid_name(&arg.name) {
            errors.push(DescriptorError::InvalidName(arg.name.clone()));
            return errors;
        }
        if !seen.insert(arg.name.as_str()) {
            errors.push(DescriptorError::DuplicateArgument(arg.name.clone()));
            return errors;
        }

        if arg.value_type == ValueType::Bool {
            errors.push(DescriptorError::FlagArgument(arg.name.clone()));
            return errors;
        }

        if let Some(err) = validate_value_type(&arg.name, &arg.value_type) {
            errors.push(err);
            return errors;
        }

        if arg.is_unbounded() {
            unbounded = Some(arg.name.as_str());
        }
    }

    errors
}
