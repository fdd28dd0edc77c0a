//! Command interpreter for Roster.
//!
//! Parses console input in either surface grammar into a [`Command`], runs it
//! against a [`FileStorage`](roster_store::FileStorage) through an
//! [`Interpreter`], and drives the read/dispatch/print loop in [`run_shell`].

mod command;
mod error;
mod grammar;
mod interpreter;
mod shell;
mod update;

pub use command::{
    Change, Command, CommandSpec, Target, command_help, command_help_summary, command_specs,
};
pub use error::{EngineError, UserError};
pub use grammar::{MethodCall, strip_quotes};
pub use interpreter::{Interpreter, Outcome};
pub use shell::run_shell;
pub use update::{coerce_assignments, extract_value, is_dictionary, parse_dictionary};
