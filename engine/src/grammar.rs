//! Method-call grammar: `Class.verb(arg0, arg1, ...)`.
//!
//! Only the surface split happens here. [`Command`](crate::Command) turns the
//! pieces into the same typed command the canonical grammar produces.

use std::sync::LazyLock;

use regex::Regex;

static METHOD_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\.(\w+)\((.*)\)$").expect("method-call regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall<'a> {
    pub class: &'a str,
    pub verb: &'a str,
    /// Trimmed arguments, quotes still attached.
    pub args: Vec<&'a str>,
}

impl<'a> MethodCall<'a> {
    /// Returns `None` unless the whole line is `identifier.identifier(...)`.
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = METHOD_CALL.captures(line.trim())?;
        let class = caps.get(1)?.as_str();
        let verb = caps.get(2)?.as_str();
        let inner = caps.get(3)?.as_str();
        Some(Self {
            class,
            verb,
            args: split_top_level(inner),
        })
    }
}

/// Strip surrounding double quotes from an id or attribute-name argument.
#[must_use]
pub fn strip_quotes(arg: &str) -> &str {
    arg.trim_matches('"')
}

/// Split on commas that sit outside double quotes and outside `{}`/`[]`.
pub(crate) fn split_top_level(inner: &str) -> Vec<&str> {
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut scanner = Scanner::default();
    let mut start = 0;
    for (i, ch) in inner.char_indices() {
        if ch == ',' && scanner.at_top_level() {
            parts.push(inner[start..i].trim());
            start = i + 1;
        } else {
            scanner.feed(ch);
        }
    }
    parts.push(inner[start..].trim());
    parts
}

/// True when every `{`/`[` outside a string is closed in order and no string is
/// left open.
pub(crate) fn is_balanced(text: &str) -> bool {
    let mut stack = Vec::new();
    let mut scanner = Scanner::default();
    for ch in text.chars() {
        if !scanner.in_string {
            match ch {
                '{' | '[' => stack.push(ch),
                '}' if stack.pop() != Some('{') => return false,
                ']' if stack.pop() != Some('[') => return false,
                _ => {}
            }
        }
        scanner.feed(ch);
    }
    stack.is_empty() && !scanner.in_string
}

#[derive(Default)]
struct Scanner {
    in_string: bool,
    escaped: bool,
    depth: usize,
}

impl Scanner {
    fn at_top_level(&self) -> bool {
        !self.in_string && self.depth == 0
    }

    fn feed(&mut self, ch: char) {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
            return;
        }
        match ch {
            '"' => self.in_string = true,
            '{' | '[' => self.depth += 1,
            '}' | ']' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MethodCall, is_balanced, split_top_level, strip_quotes};

    #[test]
    fn parses_call_without_arguments() {
        let call = MethodCall::parse("User.all()").unwrap();
        assert_eq!(call.class, "User");
        assert_eq!(call.verb, "all");
        assert!(call.args.is_empty());
    }

    #[test]
    fn keeps_argument_order() {
        let call = MethodCall::parse(r#"User.update("38f2", first_name, "John")"#).unwrap();
        assert_eq!(call.args, vec![r#""38f2""#, "first_name", r#""John""#]);
    }

    #[test]
    fn dictionary_argument_is_not_split() {
        let call =
            MethodCall::parse(r#"User.update("38f2", {"name": "Julien", "job": "CEO"})"#).unwrap();
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args[1], r#"{"name": "Julien", "job": "CEO"}"#);
    }

    #[test]
    fn quoted_commas_stay_in_one_argument() {
        let parts = split_top_level(r#""a, b", c"#);
        assert_eq!(parts, vec![r#""a, b""#, "c"]);
    }

    #[test]
    fn rejects_lines_that_are_not_calls() {
        assert!(MethodCall::parse("show User 1234").is_none());
        assert!(MethodCall::parse("User.show").is_none());
        assert!(MethodCall::parse("User.show(1) trailing").is_none());
        assert!(MethodCall::parse(".show()").is_none());
        assert!(MethodCall::parse("User-x.show()").is_none());
    }

    #[test]
    fn strip_quotes_removes_surrounding_quotes_only() {
        assert_eq!(strip_quotes(r#""abc""#), "abc");
        assert_eq!(strip_quotes("abc"), "abc");
        assert_eq!(strip_quotes(r#""""#), "");
    }

    #[test]
    fn balance_ignores_delimiters_inside_strings() {
        assert!(is_balanced(r#"{"a": "}{", "b": [1, 2]}"#));
        assert!(!is_balanced(r#"{"a": [1, 2}"#));
        assert!(!is_balanced(r#"{"a": "open}"#));
        assert!(is_balanced(r#"{"a": "esc\"aped"}"#));
    }
}
