//! Grammar matching.
//!
//! [`Matcher`] walks a token stream against a [`ClassDescriptor`] in scoped
//! passes that share one policy:
//!
//! 1. **Option scan**: option-shaped tokens are looked up among the scope's
//!    aliases and consume their value token; the first other token ends the
//!    scan. Required options are checked once the scan is over. With a
//!    default command, an option the class scope does not know ends the class
//!    scan and is left to that command.
//! 2. **Sub-command resolution** (class scope only): a token naming a
//!    sub-command hands the rest of the stream to that command's scope; the
//!    default command, if any, takes over when none is named.
//! 3. **Positional matching**: arguments are filled in declaration order, an
//!    unbounded argument takes everything left, and surplus tokens are
//!    dropped.
//!
//! The first violated constraint aborts the match. There is no backtracking:
//! once the option scan of a scope ends, every later token of that scope is
//! positional.

use std::collections::BTreeMap;

use cmdline_core::{
    ArgumentDescriptor, ClassDescriptor, CommandDescriptor, DescriptorError, OptionDescriptor,
    ParameterDescriptor, option_token, validate_descriptor,
};
use tracing::{debug, trace};

use crate::config::MatcherConfig;
use crate::convert::{convert, convert_all};
use crate::error::{Result, SyntaxError};
use crate::result::{CommandMatch, MatchResult, MatchedParameter, ScopeMatch};
use crate::tokenizer::Tokenizer;
use crate::value::Value;

const END_OF_OPTIONS: &str = "--";

/// Returns `true` if `token` is written like an option (`-o`, `--name`).
///
/// A lone dash, `--`, and negative numbers such as `-5` are positional.
///
/// # Examples
///
/// ```
/// use cmdline_matcher::is_option_shaped;
///
/// assert!(is_option_shaped("-o"));
/// assert!(is_option_shaped("--name=value"));
/// assert!(!is_option_shaped("-"));
/// assert!(!is_option_shaped("--"));
/// assert!(!is_option_shaped("-5"));
/// assert!(!is_option_shaped("foo"));
/// ```
pub fn is_option_shaped(token: &str) -> bool {
    token
        .strip_prefix('-')
        .map(|rest| rest.trim_start_matches('-'))
        .and_then(|rest| rest.chars().next())
        .is_some_and(|first| !first.is_ascii_digit())
}

// Options matched by one scan; `closed` when the scan stopped on `--`.
struct OptionScan {
    values: BTreeMap<String, Value>,
    closed: bool,
}

struct Cursor<'t> {
    tokens: &'t [&'t str],
    position: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [&'t str]) -> Self {
        Self { tokens, position: 0 }
    }

    fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.position).copied()
    }

    fn next(&mut self) -> Option<&'t str> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    fn take_rest(&mut self) -> &'t [&'t str] {
        let rest = &self.tokens[self.position..];
        self.position = self.tokens.len();
        rest
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.position
    }
}

/// Matches token streams against one descriptor.
///
/// The descriptor is validated once, when the matcher is built, and is only
/// read afterwards, so one matcher can serve any number of concurrent
/// matches.
///
/// # Examples
///
/// ```
/// use cmdline_core::*;
/// use cmdline_matcher::{Matcher, SyntaxError, Value};
///
/// let desc = ClassDescriptor::new("tool")
///     .with_option(OptionDescriptor::with_value(&["o"], ValueType::String).required());
/// let matcher = Matcher::new(&desc).unwrap();
///
/// let result = matcher.match_line("-o foo").unwrap();
/// assert_eq!(result.class.option("o"), Some(&Value::from("foo")));
///
/// assert_eq!(
///     matcher.match_line(""),
///     Err(SyntaxError::MissingRequiredOption("-o".to_string()))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Matcher<'d> {
    descriptor: &'d ClassDescriptor,
    default_command: Option<&'d CommandDescriptor>,
    config: MatcherConfig,
    tokenizer: Tokenizer,
}

impl<'d> Matcher<'d> {
    /// Creates a matcher with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`DescriptorError`] if the descriptor is invalid.
    pub fn new(descriptor: &'d ClassDescriptor) -> std::result::Result<Self, DescriptorError> {
        if let Some(err) = validate_descriptor(descriptor).into_iter().next() {
            return Err(err);
        }

        let config = MatcherConfig::default();
        Ok(Self {
            descriptor,
            default_command: descriptor.default_command(),
            tokenizer: config.tokenizer(),
            config,
        })
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: MatcherConfig) -> Self {
        self.tokenizer = config.tokenizer();
        self.config = config;
        self
    }

    /// Selects `name` as the default sub-command, overriding the descriptor.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::UnknownDefaultCommand`] if no sub-command has that
    /// name or alias.
    pub fn with_default_command(
        mut self,
        name: &str,
    ) -> std::result::Result<Self, DescriptorError> {
        let command = self
            .descriptor
            .find_command(name)
            .ok_or_else(|| DescriptorError::UnknownDefaultCommand(name.to_string()))?;
        self.default_command = Some(command);
        Ok(self)
    }

    pub fn descriptor(&self) -> &'d ClassDescriptor {
        self.descriptor
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Tokenizes `line` with the configured tokenizer and matches the tokens.
    pub fn match_line(&self, line: &str) -> Result<MatchResult> {
        let tokens = self.tokenizer.tokenize(line);
        self.match_tokens(&tokens)
    }

    /// Matches an already tokenized command line.
    ///
    /// # Errors
    ///
    /// The first [`SyntaxError`] encountered; no partial result is returned.
    pub fn match_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<MatchResult> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let mut cursor = Cursor::new(&tokens);
        let desc = self.descriptor;

        let class_options: Vec<&OptionDescriptor> = desc.options.iter().collect();
        let class_arguments: Vec<&ArgumentDescriptor> = desc.arguments.iter().collect();

        // An option unknown to the class scope may still belong to the
        // default command.
        let yield_unknown = self.default_command.is_some();
        let scan = self.scan_options(&mut cursor, &class_options, yield_unknown)?;
        let options_closed = scan.closed;
        let options = check_options(scan.values, &class_options)?;

        let named = cursor.peek().and_then(|token| desc.find_command(token));
        let selected = match named {
            Some(command) => {
                cursor.next();
                debug!(command = %command.name, "Selected sub-command");
                Some(command)
            }
            None => {
                if let Some(command) = self.default_command {
                    debug!(command = %command.name, "Falling back to default command");
                }
                self.default_command
            }
        };

        if let Some(command) = selected {
            let command = self.match_command(command, &mut cursor, options_closed)?;
            return Ok(MatchResult {
                class: ScopeMatch {
                    options,
                    arguments: BTreeMap::new(),
                },
                command: Some(command),
            });
        }

        if !desc.commands.is_empty() && class_arguments.is_empty() {
            if let Some(token) = cursor.peek() {
                return Err(SyntaxError::UnknownCommand(token.to_string()));
            }
        }

        let arguments = match_arguments(&mut cursor, &class_arguments)?;
        Ok(MatchResult {
            class: ScopeMatch { options, arguments },
            command: None,
        })
    }

    fn match_command(
        &self,
        command: &CommandDescriptor,
        cursor: &mut Cursor<'_>,
        options_closed: bool,
    ) -> Result<CommandMatch> {
        let options: Vec<&OptionDescriptor> = command.options().collect();
        let arguments: Vec<&ArgumentDescriptor> = command.arguments().collect();

        // A `--` seen in the class scope also closes the command's options.
        let option_values = if options_closed {
            BTreeMap::new()
        } else {
            self.scan_options(cursor, &options, false)?.values
        };
        let mut option_values = check_options(option_values, &options)?;
        let mut argument_values = match_arguments(cursor, &arguments)?;

        let parameters = command
            .parameters
            .iter()
            .map(|param| match param {
                ParameterDescriptor::Option(option) => MatchedParameter::Option {
                    name: option.canonical_name().to_string(),
                    value: option_values.remove(option.canonical_name()),
                },
                ParameterDescriptor::Argument(argument) => MatchedParameter::Argument {
                    name: argument.name.clone(),
                    value: argument_values.remove(&argument.name),
                },
                ParameterDescriptor::Injected(key) => {
                    MatchedParameter::Injected { key: key.clone() }
                }
            })
            .collect();

        Ok(CommandMatch {
            name: command.name.clone(),
            parameters,
        })
    }

    // Splits `--name=value` when attached values are enabled.
    fn split_attached<'t>(&self, token: &'t str) -> (&'t str, Option<&'t str>) {
        if self.config.attached_values && token.starts_with("--") {
            if let Some((name, value)) = token.split_once('=') {
                return (name, Some(value));
            }
        }
        (token, None)
    }

    fn scan_options(
        &self,
        cursor: &mut Cursor<'_>,
        options: &[&OptionDescriptor],
        yield_unknown: bool,
    ) -> Result<OptionScan> {
        let mut values: BTreeMap<String, Value> = BTreeMap::new();

        while let Some(token) = cursor.peek() {
            if self.config.end_of_options && token == END_OF_OPTIONS {
                cursor.next();
                return Ok(OptionScan {
                    values,
                    closed: true,
                });
            }
            if !is_option_shaped(token) {
                break;
            }

            let (name, attached) = self.split_attached(token);
            let found = options.iter().copied().find(|option| option.matches(name));
            let Some(option) = found else {
                if yield_unknown {
                    trace!(token, "Leaving unknown option to the default command");
                    break;
                }
                return Err(SyntaxError::UnknownOption(name.to_string()));
            };
            cursor.next();

            let value = if option.takes_value() {
                let raw = match attached {
                    Some(raw) => raw,
                    None => cursor
                        .next()
                        .ok_or_else(|| SyntaxError::MissingOptionValue(name.to_string()))?,
                };
                convert(raw, &option.value_type)?
            } else {
                match attached {
                    Some(raw) => convert(raw, &option.value_type)?,
                    None => Value::Bool(true),
                }
            };

            let key = option.canonical_name();
            trace!(option = key, "Matched option");
            if option.is_list() {
                let slot = values
                    .entry(key.to_string())
                    .or_insert_with(|| Value::List(Vec::new()));
                match slot {
                    Value::List(items) => items.push(value),
                    slot => *slot = Value::List(vec![value]),
                }
            } else {
                values.insert(key.to_string(), value);
            }
        }

        Ok(OptionScan {
            values,
            closed: false,
        })
    }
}

// Enforces required options, then records empty lists for unsupplied list
// options.
fn check_options(
    mut values: BTreeMap<String, Value>,
    options: &[&OptionDescriptor],
) -> Result<BTreeMap<String, Value>> {
    for option in options {
        let key = option.canonical_name();
        if values.contains_key(key) {
            continue;
        }
        if option.required {
            return Err(SyntaxError::MissingRequiredOption(option_token(key)));
        }
        if option.is_list() {
            values.insert(key.to_string(), Value::List(Vec::new()));
        }
    }
    Ok(values)
}

fn match_arguments(
    cursor: &mut Cursor<'_>,
    arguments: &[&ArgumentDescriptor],
) -> Result<BTreeMap<String, Value>> {
    let mut values = BTreeMap::new();

    for argument in arguments {
        if argument.is_unbounded() {
            let rest = cursor.take_rest();
            if rest.is_empty() && argument.required {
                return Err(SyntaxError::MissingRequiredArgument(argument.name.clone()));
            }
            values.insert(argument.name.clone(), convert_all(rest, &argument.value_type)?);
            continue;
        }

        match cursor.next() {
            Some(token) => {
                values.insert(argument.name.clone(), convert(token, &argument.value_type)?);
            }
            None if argument.required => {
                return Err(SyntaxError::MissingRequiredArgument(argument.name.clone()));
            }
            None => {}
        }
    }

    let surplus = cursor.remaining();
    if surplus > 0 {
        debug!(surplus, "Discarding surplus positional tokens");
        cursor.take_rest();
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use cmdline_core::{ContextKey, ValueType};

    use super::*;

    fn desc_with_list_option() -> ClassDescriptor {
        ClassDescriptor::new("tool")
            .with_option(
                OptionDescriptor::with_value(&["i", "include"], ValueType::String).allow_multiple(),
            )
            .with_option(OptionDescriptor::flag(&["v", "verbose"]))
            .with_argument(ArgumentDescriptor::optional("file", ValueType::String))
    }

    #[test]
    fn test_list_option_accumulates() {
        let desc = desc_with_list_option();
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("-i a --include b -v c").unwrap();
        assert_eq!(result.class.option("i"), Some(&Value::from(vec!["a", "b"])));
        assert!(result.class.flag("v"));
        assert_eq!(result.class.argument("file"), Some(&Value::from("c")));

        let result = matcher.match_line("").unwrap();
        assert_eq!(result.class.option("i"), Some(&Value::List(Vec::new())));
        assert!(!result.class.flag("v"));
        assert_eq!(result.class.option("v"), None);
    }

    #[test]
    fn test_scalar_option_last_wins() {
        let desc = ClassDescriptor::new("tool")
            .with_option(OptionDescriptor::with_value(&["o"], ValueType::String));
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("-o a -o b").unwrap();
        assert_eq!(result.class.option("o"), Some(&Value::from("b")));
    }

    #[test]
    fn test_attached_values() {
        let desc = desc_with_list_option();
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("--include=a --verbose=false").unwrap();
        assert_eq!(result.class.option("i"), Some(&Value::from(vec!["a"])));
        assert_eq!(result.class.option("v"), Some(&Value::Bool(false)));

        let strict = Matcher::new(&desc).unwrap().with_config(MatcherConfig {
            attached_values: false,
            ..MatcherConfig::default()
        });
        assert_eq!(
            strict.match_line("--include=a"),
            Err(SyntaxError::UnknownOption("--include=a".to_string()))
        );
    }

    #[test]
    fn test_missing_option_value() {
        let desc = desc_with_list_option();
        let matcher = Matcher::new(&desc).unwrap();

        assert_eq!(
            matcher.match_line("-v -i"),
            Err(SyntaxError::MissingOptionValue("-i".to_string()))
        );
    }

    #[test]
    fn test_end_of_options_marker() {
        let desc = desc_with_list_option();
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("-v -- -i").unwrap();
        assert_eq!(result.class.argument("file"), Some(&Value::from("-i")));

        let literal = Matcher::new(&desc).unwrap().with_config(MatcherConfig {
            end_of_options: false,
            ..MatcherConfig::default()
        });
        let result = literal.match_line("-v -- -i").unwrap();
        assert_eq!(result.class.argument("file"), Some(&Value::from("--")));
    }

    #[test]
    fn test_options_after_positionals_are_positional() {
        let desc = ClassDescriptor::new("tool")
            .with_option(OptionDescriptor::flag(&["v"]))
            .with_argument(ArgumentDescriptor::optional("rest", ValueType::String).unbounded());
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("a -v -x").unwrap();
        assert_eq!(result.class.argument("rest"), Some(&Value::from(vec!["a", "-v", "-x"])));
        assert!(!result.class.flag("v"));
    }

    #[test]
    fn test_negative_number_is_positional() {
        let desc = ClassDescriptor::new("tool")
            .with_argument(ArgumentDescriptor::required("n", ValueType::Integer));
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("-5").unwrap();
        assert_eq!(result.class.argument("n"), Some(&Value::Integer(-5)));
    }

    #[test]
    fn test_conversion_failure_names_token_and_type() {
        let desc = ClassDescriptor::new("tool")
            .with_argument(ArgumentDescriptor::optional("n", ValueType::Integer).unbounded());
        let matcher = Matcher::new(&desc).unwrap();

        assert_eq!(
            matcher.match_line("1 two 3"),
            Err(SyntaxError::Conversion {
                token: "two".to_string(),
                expected: "integer".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_command_without_class_arguments() {
        let desc = ClassDescriptor::new("git").with_command(CommandDescriptor::new("commit"));
        let matcher = Matcher::new(&desc).unwrap();

        assert_eq!(
            matcher.match_line("push"),
            Err(SyntaxError::UnknownCommand("push".to_string()))
        );
        assert_eq!(matcher.match_line("").unwrap().command, None);
    }

    #[test]
    fn test_command_alias_reports_canonical_name() {
        let desc = ClassDescriptor::new("git").with_command(
            CommandDescriptor::new("commit")
                .with_alias("ci")
                .with_injected(ContextKey::named("locale")),
        );
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("ci").unwrap();
        assert_eq!(result.command_name(), Some("commit"));
        assert_eq!(
            result.command.unwrap().parameters,
            vec![MatchedParameter::Injected {
                key: ContextKey::named("locale")
            }]
        );
    }

    #[test]
    fn test_command_scope_does_not_see_class_options() {
        let desc = ClassDescriptor::new("tool")
            .with_option(OptionDescriptor::with_value(&["s"], ValueType::String))
            .with_command(CommandDescriptor::new("m"));
        let matcher = Matcher::new(&desc).unwrap();

        assert_eq!(
            matcher.match_line("m -s foo"),
            Err(SyntaxError::UnknownOption("-s".to_string()))
        );
    }

    #[test]
    fn test_default_command_takes_unknown_options() {
        let desc = ClassDescriptor::new("tool")
            .with_option(OptionDescriptor::flag(&["v"]))
            .with_command(
                CommandDescriptor::new("main")
                    .with_option(OptionDescriptor::with_value(&["o"], ValueType::Integer)),
            )
            .with_default_command("main");
        let matcher = Matcher::new(&desc).unwrap();

        let result = matcher.match_line("-v -o 5").unwrap();
        assert!(result.class.flag("v"));
        let command = result.command.unwrap();
        assert_eq!(command.name, "main");
        assert_eq!(command.option("o"), Some(&Value::Integer(5)));

        assert_eq!(
            matcher.match_line("-x"),
            Err(SyntaxError::UnknownOption("-x".to_string()))
        );
    }

    #[test]
    fn test_end_of_options_carries_into_command_scope() {
        let desc = ClassDescriptor::new("tool")
            .with_command(
                CommandDescriptor::new("main")
                    .with_option(OptionDescriptor::flag(&["x"]))
                    .with_argument(ArgumentDescriptor::optional("file", ValueType::String)),
            )
            .with_default_command("main");
        let matcher = Matcher::new(&desc).unwrap();

        let main = matcher.match_line("-- -x").unwrap().command.unwrap();
        assert_eq!(main.argument("file"), Some(&Value::from("-x")));
        assert_eq!(main.option("x"), None);

        let main = matcher.match_line("main -- -x").unwrap().command.unwrap();
        assert_eq!(main.argument("file"), Some(&Value::from("-x")));

        let main = matcher.match_line("-x -- y").unwrap().command.unwrap();
        assert_eq!(main.option("x"), Some(&Value::Bool(true)));
        assert_eq!(main.argument("file"), Some(&Value::from("y")));
    }

    #[test]
    fn test_end_of_options_still_checks_required_command_options() {
        let desc = ClassDescriptor::new("tool")
            .with_command(
                CommandDescriptor::new("main")
                    .with_option(OptionDescriptor::with_value(&["o"], ValueType::String).required())
                    .with_option(
                        OptionDescriptor::with_value(&["t"], ValueType::String).allow_multiple(),
                    )
                    .with_argument(ArgumentDescriptor::optional("file", ValueType::String)),
            )
            .with_default_command("main");
        let matcher = Matcher::new(&desc).unwrap();

        assert_eq!(
            matcher.match_line("-- -o"),
            Err(SyntaxError::MissingRequiredOption("-o".to_string()))
        );

        let main = matcher.match_line("-o a -- -t").unwrap().command.unwrap();
        assert_eq!(main.option("o"), Some(&Value::from("a")));
        assert_eq!(main.option("t"), Some(&Value::List(Vec::new())));
        assert_eq!(main.argument("file"), Some(&Value::from("-t")));
    }

    #[test]
    fn test_with_default_command_validates_name() {
        let desc = ClassDescriptor::new("tool").with_command(CommandDescriptor::new("a"));

        assert!(Matcher::new(&desc).unwrap().with_default_command("a").is_ok());
        assert_eq!(
            Matcher::new(&desc).unwrap().with_default_command("b").unwrap_err(),
            DescriptorError::UnknownDefaultCommand("b".to_string())
        );
    }

    #[test]
    fn test_invalid_descriptor_is_refused() {
        let desc = ClassDescriptor::new("");
        assert_eq!(Matcher::new(&desc).unwrap_err(), DescriptorError::EmptyClassName);
    }
}
