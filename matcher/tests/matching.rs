//! Matching behavior that holds across descriptors and configurations.

use std::fs;

use cmdline_core::*;
use cmdline_matcher::{MatchedParameter, Matcher, MatcherConfig, SyntaxError, TokenizeMode, Value};
use rayon::prelude::*;

fn deploy_descriptor() -> ClassDescriptor {
    ClassDescriptor::new("deploy")
        .with_option(OptionDescriptor::flag(&["v", "verbose"]))
        .with_option(OptionDescriptor::with_value(&["e", "env"], ValueType::String))
        .with_command(
            CommandDescriptor::new("push")
                .with_alias("p")
                .with_option(OptionDescriptor::with_value(&["r", "retries"], ValueType::Integer))
                .with_option(
                    OptionDescriptor::with_value(&["t", "tag"], ValueType::String).allow_multiple(),
                )
                .with_argument(ArgumentDescriptor::required("target", ValueType::String))
                .with_argument(
                    ArgumentDescriptor::optional("paths", ValueType::String).unbounded(),
                ),
        )
        .with_command(
            CommandDescriptor::new("rollback")
                .with_option(OptionDescriptor::with_value(
                    &["to"],
                    ValueType::Choice(vec!["previous".to_string(), "stable".to_string()]),
                ))
                .with_argument(ArgumentDescriptor::optional("steps", ValueType::Integer)),
        )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_matching_is_idempotent() {
    let desc = deploy_descriptor();
    let matcher = Matcher::new(&desc).unwrap();

    for line in ["-v push -r 3 prod a b", "--env=qa rollback --to stable 2", "", "push"] {
        assert_eq!(matcher.match_line(line), matcher.match_line(line), "line {line:?}");
    }
}

#[test]
fn test_injected_slots_do_not_shift_matched_values() {
    struct Clock;
    struct Locale;

    let plain = CommandDescriptor::new("run")
        .with_option(OptionDescriptor::with_value(&["o"], ValueType::String))
        .with_argument(ArgumentDescriptor::optional("a", ValueType::String));
    let injected = CommandDescriptor::new("run")
        .with_injected(ContextKey::of::<Clock>())
        .with_option(OptionDescriptor::with_value(&["o"], ValueType::String))
        .with_injected(ContextKey::of::<Locale>())
        .with_argument(ArgumentDescriptor::optional("a", ValueType::String));

    let plain_desc = ClassDescriptor::new("tool").with_command(plain);
    let injected_desc = ClassDescriptor::new("tool").with_command(injected);

    let line = "run -o x y";
    let plain = Matcher::new(&plain_desc).unwrap().match_line(line).unwrap().command.unwrap();
    let injected = Matcher::new(&injected_desc).unwrap().match_line(line).unwrap().command.unwrap();

    assert_eq!(plain.option("o"), injected.option("o"));
    assert_eq!(plain.argument("a"), injected.argument("a"));
    assert_eq!(injected.parameters.len(), 4);
    assert!(matches!(injected.parameters[0], MatchedParameter::Injected { .. }));
    assert!(matches!(injected.parameters[2], MatchedParameter::Injected { .. }));
}

#[test]
fn test_option_scan_ends_at_first_positional() {
    let desc = deploy_descriptor();
    let matcher = Matcher::new(&desc).unwrap();

    let push = matcher.match_line("push prod -r 3 --tag x").unwrap().command.unwrap();
    assert_eq!(push.argument("target"), Some(&Value::from("prod")));
    assert_eq!(push.argument("paths"), Some(&Value::from(vec!["-r", "3", "--tag", "x"])));
    assert_eq!(push.option("r"), None);
    assert_eq!(push.option("t"), Some(&Value::List(Vec::new())));
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

#[test]
fn test_class_and_command_scopes() {
    let desc = deploy_descriptor();
    let matcher = Matcher::new(&desc).unwrap();

    let result = matcher.match_line("-v -e qa p -t a -t b -r 2 prod x y").unwrap();
    assert!(result.class.flag("v"));
    assert_eq!(result.class.option("e"), Some(&Value::from("qa")));
    assert_eq!(result.command_name(), Some("push"));

    let push = result.command.unwrap();
    assert_eq!(push.option("r"), Some(&Value::Integer(2)));
    assert_eq!(push.option("t"), Some(&Value::from(vec!["a", "b"])));
    assert_eq!(push.argument("target"), Some(&Value::from("prod")));
    assert_eq!(push.argument("paths"), Some(&Value::from(vec!["x", "y"])));
}

#[test]
fn test_first_error_is_reported() {
    let desc = deploy_descriptor();
    let matcher = Matcher::new(&desc).unwrap();

    let cases = [
        ("-x push prod", SyntaxError::UnknownOption("-x".to_string())),
        ("deploy", SyntaxError::UnknownCommand("deploy".to_string())),
        ("push", SyntaxError::MissingRequiredArgument("target".to_string())),
        ("push -r", SyntaxError::MissingOptionValue("-r".to_string())),
        (
            "push -r many prod",
            SyntaxError::Conversion {
                token: "many".to_string(),
                expected: "integer".to_string(),
            },
        ),
        (
            "rollback --to latest",
            SyntaxError::Conversion {
                token: "latest".to_string(),
                expected: "one of previous|stable".to_string(),
            },
        ),
    ];
    for (line, expected) in cases {
        assert_eq!(matcher.match_line(line), Err(expected), "line {line:?}");
    }
}

#[test]
fn test_concurrent_matches_share_one_matcher() {
    let desc = deploy_descriptor();
    let matcher = Matcher::new(&desc).unwrap();

    let lines: Vec<String> = (0..64).map(|i| format!("-e env{i} push -r {i} target{i}")).collect();
    let results: Vec<_> = lines.par_iter().map(|line| matcher.match_line(line)).collect();

    for (i, result) in results.into_iter().enumerate() {
        let result = result.unwrap();
        assert_eq!(result.class.option("e"), Some(&Value::from(format!("env{i}"))));
        let push = result.command.unwrap();
        assert_eq!(push.option("r"), Some(&Value::Integer(i as i64)));
        assert_eq!(push.argument("target"), Some(&Value::from(format!("target{i}"))));
    }
}

// ---------------------------------------------------------------------------
// Documents and configuration
// ---------------------------------------------------------------------------

#[test]
fn test_yaml_descriptor_and_quoted_config() {
    let yaml = r#"
name: notes
options:
  - names: [q, quiet]
    value_type: bool
commands:
  - name: add
    parameters:
      - option: { names: [t, title], value_type: string, required: true }
      - injected: author
      - argument: { name: body, multiplicity: list }
"#;
    let desc = ClassDescriptor::from_yaml_str(yaml).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matcher.yml");
    fs::write(&path, "tokenizer: quoted\n").unwrap();
    let config = MatcherConfig::load(&path).unwrap();
    assert_eq!(config.tokenizer, TokenizeMode::Quoted);

    let matcher = Matcher::new(&desc).unwrap().with_config(config);
    let result = matcher.match_line(r#"-q add --title "Weekly sync" 'first line' second"#).unwrap();

    assert!(result.class.flag("q"));
    let add = result.command.unwrap();
    assert_eq!(add.option("t"), Some(&Value::from("Weekly sync")));
    assert_eq!(add.argument("body"), Some(&Value::from(vec!["first line", "second"])));
    assert_eq!(
        add.parameters[1],
        MatchedParameter::Injected {
            key: ContextKey::named("author")
        }
    );

    let err = matcher.match_line("add").unwrap_err();
    assert_eq!(err.to_string(), "missing required option: -t");
}

#[test]
fn test_result_serializes_to_json() {
    let desc = deploy_descriptor();
    let matcher = Matcher::new(&desc).unwrap();

    let result = matcher.match_line("rollback --to stable 2").unwrap();
    let json: serde_json::Value = serde_json::from_str(&result.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["command"]["name"], "rollback");
    assert_eq!(json["command"]["parameters"][0]["value"], "stable");
    assert_eq!(json["command"]["parameters"][1]["value"], 2);
}
