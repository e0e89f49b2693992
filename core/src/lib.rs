//! Descriptor model for command-line grammars.
//!
//! This crate defines the immutable grammar description consumed by the
//! matcher:
//!
//! - [`ClassDescriptor`]: top-level grammar (class-scoped options and
//!   arguments, sub-commands, default command).
//! - [`OptionDescriptor`]: a named value with one or more aliases.
//! - [`ArgumentDescriptor`]: a positional value, single or unbounded.
//! - [`CommandDescriptor`]: a sub-command whose ordered parameters mix
//!   options, arguments and [`ContextKey`]-typed injected slots.
//!
//! Validation ([`validate_descriptor`]) catches construction defects such as
//! duplicate aliases, an unbounded argument that is not last, or a default
//! command that does not exist. Descriptors can also be loaded from JSON or
//! YAML documents ([`ClassDescriptor::from_json_str`],
//! [`ClassDescriptor::from_yaml_str`]).
//!
//! # Example
//!
//! ```
//! use cmdline_core::*;
//!
//! struct Locale;
//!
//! let desc = ClassDescriptor::new("tool")
//!     .with_option(OptionDescriptor::flag(&["v", "verbose"]))
//!     .with_command(
//!         CommandDescriptor::new("greet")
//!             .with_option(
//!                 OptionDescriptor::with_value(&["n", "name"], ValueType::String).required(),
//!             )
//!             .with_injected(ContextKey::of::<Locale>()),
//!     );
//!
//! assert!(desc.find_option("--verbose").is_some());
//! assert!(desc.find_command("greet").unwrap().find_option("-n").is_some());
//! assert!(validate_descriptor(&desc).is_empty());
//! ```

mod document;
mod types;
mod validate;

pub use types::*;
pub use validate::{DescriptorError, validate_command, validate_descriptor};
