//! Command-line matching and invocation binding.
//!
//! Given a [`ClassDescriptor`](cmdline_core::ClassDescriptor), this crate
//! turns raw input into typed values and feeds them to host code:
//!
//! - [`Tokenizer`] splits a line into tokens (whitespace or quote-aware).
//! - [`Matcher`] walks the tokens against the grammar: class options,
//!   sub-command selection, then positional arguments, producing a
//!   [`MatchResult`] or the first [`SyntaxError`].
//! - [`convert`] turns each token into a [`Value`] of the declared type.
//! - [`Bindings`] write class-scoped values into a target and invoke the
//!   selected sub-command with its [`Parameters`], resolving injected slots
//!   from an [`InvocationContext`].
//!
//! Matching is stateless between calls: a [`Matcher`] only reads its
//! descriptor, so it can be shared across threads and every call on the same
//! tokens yields the same result.
//!
//! # Example
//!
//! ```
//! use cmdline_core::*;
//! use cmdline_matcher::{Matcher, Value};
//!
//! let desc = ClassDescriptor::new("tool")
//!     .with_option(OptionDescriptor::flag(&["v", "verbose"]))
//!     .with_command(
//!         CommandDescriptor::new("copy")
//!             .with_option(OptionDescriptor::with_value(&["n"], ValueType::Integer))
//!             .with_argument(
//!                 ArgumentDescriptor::required("paths", ValueType::String).unbounded(),
//!             ),
//!     );
//!
//! let matcher = Matcher::new(&desc).unwrap();
//! let result = matcher.match_line("--verbose copy -n 2 a b").unwrap();
//!
//! assert!(result.class.flag("v"));
//! let copy = result.command.unwrap();
//! assert_eq!(copy.name, "copy");
//! assert_eq!(copy.option("n"), Some(&Value::Integer(2)));
//! assert_eq!(copy.argument("paths"), Some(&Value::from(vec!["a", "b"])));
//! ```

mod binder;
mod config;
mod context;
mod convert;
mod error;
mod matcher;
mod result;
mod tokenizer;
mod value;

pub use binder::{Bindings, Parameter, Parameters};
pub use config::MatcherConfig;
pub use context::{Attribute, InvocationContext};
pub use convert::{convert, convert_all};
pub use error::{BindError, ConfigError, Result, SyntaxError};
pub use matcher::{Matcher, is_option_shaped};
pub use result::{CommandMatch, MatchResult, MatchedParameter, ScopeMatch};
pub use tokenizer::{TokenizeMode, Tokenizer, tokenize};
pub use value::{FromValue, Value};
