//! Shared test utilities and fixtures
//!
//! Every session gets its own temp directory so store files never collide.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use roster_engine::{Interpreter, Outcome, run_shell};
use roster_store::FileStorage;
use tempfile::TempDir;

pub struct Session {
    dir: TempDir,
    pub storage: FileStorage,
}

impl Session {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let storage = FileStorage::new(dir.path().join("file.json"));
        Self { dir, storage }
    }

    pub fn store_path(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Run one line and return what the console would print, if anything.
    pub fn line(&mut self, line: &str) -> Option<String> {
        let mut interp = Interpreter::new(&mut self.storage);
        match interp.execute(line).expect("command should not fail") {
            Outcome::Message(text) => Some(text),
            Outcome::Silent | Outcome::Quit { .. } => None,
        }
    }

    /// Run one line that must print something.
    pub fn print(&mut self, line: &str) -> String {
        self.line(line)
            .unwrap_or_else(|| panic!("`{line}` printed nothing"))
    }

    pub fn create(&mut self, class: &str) -> String {
        self.print(&format!("create {class}"))
    }

    /// Feed a whole script through the shell loop, returning (stdout, stderr).
    pub fn script(&mut self, script: &str) -> (String, String) {
        let mut interp = Interpreter::new(&mut self.storage);
        let mut out = Vec::new();
        let mut err = Vec::new();
        run_shell(
            &mut interp,
            Cursor::new(script.to_string()),
            &mut out,
            &mut err,
            None,
        )
        .expect("in-memory I/O");
        (
            String::from_utf8(out).expect("utf-8 stdout"),
            String::from_utf8(err).expect("utf-8 stderr"),
        )
    }

    /// Reload the store file into a fresh registry.
    pub fn reopen(&self) -> FileStorage {
        FileStorage::open(self.store_path()).expect("reload store")
    }
}
