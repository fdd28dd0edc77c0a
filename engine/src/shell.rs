//! Line-oriented read/dispatch/print loop.

use std::io::{self, BufRead, Write};

use crate::command::Command;
use crate::interpreter::{Interpreter, Outcome};

/// Run the console until `quit`, `EOF`, or end of input.
///
/// `prompt` is written before each line when set. End of input behaves like
/// an `EOF` line. Command failures go to `err` and the loop keeps reading.
/// Bytes that are not UTF-8 are replaced with U+FFFD; only a failed read or
/// write ends the loop early.
pub fn run_shell<R, W, E>(
    interpreter: &mut Interpreter<'_>,
    mut input: R,
    out: &mut W,
    err: &mut E,
    prompt: Option<&str>,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut buf = Vec::new();
    loop {
        if let Some(prompt) = prompt {
            write!(out, "{prompt}")?;
            out.flush()?;
        }

        buf.clear();
        let read = input.read_until(b'\n', &mut buf)?;
        let line = String::from_utf8_lossy(&buf);
        let result = if read == 0 {
            interpreter.dispatch(Command::Eof)
        } else {
            interpreter.execute(&line)
        };

        match result {
            Ok(Outcome::Silent) => {}
            Ok(Outcome::Message(text)) => writeln!(out, "{text}")?,
            Ok(Outcome::Quit { newline }) => {
                if newline {
                    writeln!(out)?;
                }
                out.flush()?;
                return Ok(());
            }
            Err(e) => {
                tracing::error!(line = line.trim(), "Command failed: {e}");
                writeln!(err, "Error: {e}")?;
            }
        }
    }
}
