//! Splitting a raw command line into tokens.
//!
//! The tokenizer knows nothing about the grammar. It is total: any input,
//! including an empty or blank one, produces a (possibly empty) token list.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// How a raw line is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenizeMode {
    /// Runs of whitespace separate tokens.
    #[default]
    Whitespace,
    /// Shell-style words: single and double quotes group text and a
    /// backslash escapes the next character. Empty quoted words (`''`) are
    /// dropped, so every token is non-empty. Input that does not split cleanly,
    /// such as an unterminated quote, falls back to `Whitespace`.
    Quoted,
}

/// Splits `line` on runs of whitespace.
///
/// # Examples
///
/// ```
/// use cmdline_matcher::tokenize;
///
/// assert_eq!(tokenize("  -o  foo bar "), vec!["-o", "foo", "bar"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// A configured tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    mode: TokenizeMode,
}

impl Tokenizer {
    pub fn new(mode: TokenizeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> TokenizeMode {
        self.mode
    }

    /// Splits `line` according to the configured mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_matcher::{TokenizeMode, Tokenizer};
    ///
    /// let tokenizer = Tokenizer::new(TokenizeMode::Quoted);
    /// assert_eq!(
    ///     tokenizer.tokenize(r#"commit -m "first draft" it\'s"#),
    ///     vec!["commit", "-m", "first draft", "it's"]
    /// );
    /// ```
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        match self.mode {
            TokenizeMode::Whitespace => tokenize(line),
            TokenizeMode::Quoted => tokenize_quoted(line),
        }
    }
}

fn tokenize_quoted(line: &str) -> Vec<String> {
    match shlex::split(line) {
        Some(words) => words.into_iter().filter(|word| !word.is_empty()).collect(),
        None => {
            trace!(line, "Unbalanced quoting, splitting on whitespace");
            tokenize(line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_mode_splits_runs() {
        assert_eq!(tokenize("a\t b\n\nc"), vec!["a", "b", "c"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_whitespace_mode_keeps_quotes() {
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.tokenize(r#""a b""#), vec!["\"a", "b\""]);
    }

    #[test]
    fn test_quoted_mode_groups_and_strips() {
        let tokenizer = Tokenizer::new(TokenizeMode::Quoted);

        assert_eq!(tokenizer.tokenize(r#"a "b c" 'd "e"'"#), vec!["a", "b c", "d \"e\""]);
        assert_eq!(tokenizer.tokenize(r#"pre"fix"post"#), vec!["prefixpost"]);
        assert_eq!(tokenizer.tokenize(r#"x "" y '' z"#), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_quoted_mode_escapes() {
        let tokenizer = Tokenizer::new(TokenizeMode::Quoted);

        assert_eq!(tokenizer.tokenize(r"a\ b"), vec!["a b"]);
        assert_eq!(tokenizer.tokenize(r#""say \"hi\"""#), vec!["say \"hi\""]);
        assert_eq!(tokenizer.tokenize(r"'no\escape'"), vec![r"no\escape"]);
    }

    #[test]
    fn test_quoted_mode_is_total() {
        let tokenizer = Tokenizer::new(TokenizeMode::Quoted);

        assert_eq!(tokenizer.tokenize("\"open ended"), vec!["\"open", "ended"]);
        assert_eq!(tokenizer.tokenize("-m 'it is"), vec!["-m", "'it", "is"]);
        assert!(tokenizer.tokenize("  ").is_empty());
    }
}
