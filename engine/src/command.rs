//! Command parsing for the console.
//!
//! Both surface grammars land on the same [`Command`]:
//!
//! - canonical: `update User 1234 first_name "John"`
//! - method call: `User.update("1234", "first_name", "John")`

use roster_types::AttrValue;

use crate::grammar::{MethodCall, strip_quotes};
use crate::update::{extract_value, parse_dictionary};

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

const COMMAND_SPECS: &[CommandSpec] = &[
    CommandSpec {
        name: "EOF",
        usage: "EOF",
        description: "Exit the console (end of input)",
    },
    CommandSpec {
        name: "all",
        usage: "all [<class>]  |  <class>.all()",
        description: "Print every instance, or every instance of a class",
    },
    CommandSpec {
        name: "count",
        usage: "count <class>  |  <class>.count()",
        description: "Print the number of instances of a class",
    },
    CommandSpec {
        name: "create",
        usage: "create <class>",
        description: "Create an instance, save it, and print its id",
    },
    CommandSpec {
        name: "destroy",
        usage: "destroy <class> <id>  |  <class>.destroy(<id>)",
        description: "Delete an instance and save the change",
    },
    CommandSpec {
        name: "help",
        usage: "help [<command>]",
        description: "List commands, or describe one",
    },
    CommandSpec {
        name: "quit",
        usage: "quit",
        description: "Exit the console",
    },
    CommandSpec {
        name: "show",
        usage: "show <class> <id>  |  <class>.show(<id>)",
        description: "Print an instance",
    },
    CommandSpec {
        name: "update",
        usage: "update <class> <id> <attr> <value>  |  <class>.update(<id>, <attr>, <value>)  |  <class>.update(<id>, {<attr>: <value>, ...})",
        description: "Set attributes on an instance and save the change",
    },
];

#[must_use]
pub fn command_specs() -> &'static [CommandSpec] {
    COMMAND_SPECS
}

#[must_use]
pub fn command_help_summary() -> String {
    let names: Vec<&str> = COMMAND_SPECS.iter().map(|spec| spec.name).collect();
    let header = "Documented commands (type help <topic>):";
    format!("{header}\n{}\n{}", "=".repeat(header.len()), names.join("  "))
}

/// Help for one topic, or the "no help" line for unknown topics.
#[must_use]
pub fn command_help(topic: &str) -> String {
    COMMAND_SPECS
        .iter()
        .find(|spec| spec.name == topic)
        .map_or_else(
            || format!("*** No help on {topic}"),
            |spec| format!("{}\nUsage: {}", spec.description, spec.usage),
        )
}

/// Class and id operands as typed by the operator, unvalidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target<'a> {
    pub class: Option<&'a str>,
    pub id: Option<&'a str>,
}

/// What an `update` asks to change.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<'a> {
    /// No attribute name given.
    Missing,
    /// Single attribute; `value` is `None` when it was omitted.
    Attribute {
        name: &'a str,
        value: Option<String>,
    },
    /// Dictionary literal, applied all-or-nothing.
    Batch(Vec<(String, AttrValue)>),
}

/// Parsed command with typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    Create { class: Option<&'a str> },
    Show(Target<'a>),
    Destroy(Target<'a>),
    All { class: Option<&'a str> },
    Count { class: Option<&'a str> },
    Update { target: Target<'a>, change: Change<'a> },
    Help(Option<&'a str>),
    Quit,
    Eof,
    Unknown(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    /// Parse one input line.
    pub fn parse(raw: &'a str) -> Self {
        let line = raw.trim();
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.first().copied() {
            Some("create") => Command::Create {
                class: parts.get(1).copied(),
            },
            Some("show") => Command::Show(target_from(&parts)),
            Some("destroy") => Command::Destroy(target_from(&parts)),
            Some("all") => Command::All {
                class: parts.get(1).copied(),
            },
            Some("count") => Command::Count {
                class: parts.get(1).copied(),
            },
            Some("update") => Command::Update {
                target: target_from(&parts),
                change: Change::from_tokens(parts.get(3..).unwrap_or_default()),
            },
            Some("help") => Command::Help(parts.get(1).copied()),
            Some("quit") => Command::Quit,
            Some("EOF") => Command::Eof,
            Some(_) => MethodCall::parse(line)
                .map_or(Command::Unknown(line), |call| Command::from_call(line, call)),
            None => Command::Empty,
        }
    }

    fn from_call(line: &'a str, call: MethodCall<'a>) -> Self {
        let class = Some(call.class);
        let target = Target {
            class,
            id: argument(&call.args, 0),
        };

        match call.verb {
            "show" => Command::Show(target),
            "destroy" => Command::Destroy(target),
            "all" => Command::All { class },
            "count" => Command::Count { class },
            "update" => Command::Update {
                target,
                change: Change::from_arguments(call.args.get(1..).unwrap_or_default()),
            },
            _ => Command::Unknown(line),
        }
    }
}

impl<'a> Change<'a> {
    /// Canonical form: tokens after `update <class> <id>`.
    fn from_tokens(tokens: &[&'a str]) -> Self {
        match tokens.split_first() {
            None => Change::Missing,
            Some((&name, rest)) => Change::Attribute {
                name,
                value: extract_value(rest),
            },
        }
    }

    /// Method-call form: arguments after the id.
    ///
    /// A dictionary literal that fails to parse falls back to a single
    /// attribute. Names containing whitespace cannot come from the canonical
    /// grammar and count as missing.
    fn from_arguments(args: &[&'a str]) -> Self {
        let Some((&first, rest)) = args.split_first() else {
            return Change::Missing;
        };
        if let Some(pairs) = parse_dictionary(first) {
            return Change::Batch(pairs);
        }
        let name = strip_quotes(first);
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Change::Missing;
        }
        let value_tokens: Vec<&str> = rest.iter().flat_map(|arg| arg.split_whitespace()).collect();
        Change::Attribute {
            name,
            value: extract_value(&value_tokens),
        }
    }
}

fn target_from<'a>(parts: &[&'a str]) -> Target<'a> {
    Target {
        class: parts.get(1).copied(),
        id: parts.get(2).copied(),
    }
}

/// Method-call argument with quotes stripped; empty counts as absent.
fn argument<'a>(args: &[&'a str], index: usize) -> Option<&'a str> {
    args.get(index)
        .copied()
        .map(strip_quotes)
        .filter(|arg| !arg.is_empty())
}
