//! Command dispatch against the object store.

use roster_store::{FileStorage, StoreError};
use roster_types::{AttrValue, RecordClass, RecordError, RecordId, StoreKey};

use crate::command::{Change, Command, Target, command_help, command_help_summary};
use crate::update::coerce_assignments;
use crate::{EngineError, UserError};

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to print.
    Silent,
    /// Print this line.
    Message(String),
    /// Stop reading input. `newline` asks for a trailing blank line first.
    Quit { newline: bool },
}

impl From<UserError> for Outcome {
    fn from(err: UserError) -> Self {
        Outcome::Message(err.to_string())
    }
}

/// Handler failure: input errors become messages, the rest propagate.
enum Failure {
    User(UserError),
    Engine(EngineError),
}

impl From<UserError> for Failure {
    fn from(err: UserError) -> Self {
        Failure::User(err)
    }
}

impl From<EngineError> for Failure {
    fn from(err: EngineError) -> Self {
        Failure::Engine(err)
    }
}

impl From<StoreError> for Failure {
    fn from(err: StoreError) -> Self {
        Failure::Engine(err.into())
    }
}

impl From<RecordError> for Failure {
    fn from(err: RecordError) -> Self {
        Failure::Engine(err.into())
    }
}

pub struct Interpreter<'s> {
    storage: &'s mut FileStorage,
}

impl<'s> Interpreter<'s> {
    pub fn new(storage: &'s mut FileStorage) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn storage(&self) -> &FileStorage {
        &*self.storage
    }

    /// Parse and run one input line.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, EngineError> {
        self.dispatch(Command::parse(line))
    }

    pub fn dispatch(&mut self, command: Command<'_>) -> Result<Outcome, EngineError> {
        let result = match command {
            Command::Create { class } => self.create(class),
            Command::Show(target) => self.show(target),
            Command::Destroy(target) => self.destroy(target),
            Command::All { class } => self.all(class),
            Command::Count { class } => self.count(class),
            Command::Update { target, change } => self.update(target, change),
            Command::Help(None) => Ok(Outcome::Message(command_help_summary())),
            Command::Help(Some(topic)) => Ok(Outcome::Message(command_help(topic))),
            Command::Quit => Ok(Outcome::Quit { newline: false }),
            Command::Eof => Ok(Outcome::Quit { newline: true }),
            Command::Empty => Ok(Outcome::Silent),
            Command::Unknown(line) => {
                tracing::debug!(line, "Ignoring unrecognized command");
                Ok(Outcome::Silent)
            }
        };

        match result {
            Ok(outcome) => Ok(outcome),
            Err(Failure::User(err)) => Ok(err.into()),
            Err(Failure::Engine(err)) => Err(err),
        }
    }

    fn create(&mut self, class: Option<&str>) -> Result<Outcome, Failure> {
        let class = resolve_class(class)?;
        let key = self.storage.create(class)?;
        tracing::info!(key = %key, "Created record");
        Ok(Outcome::Message(key.id().to_string()))
    }

    fn show(&self, target: Target<'_>) -> Result<Outcome, Failure> {
        let key = self.resolve_key(target)?;
        let record = self.storage.get(&key).ok_or(UserError::NoInstanceFound)?;
        Ok(Outcome::Message(record.to_string()))
    }

    fn destroy(&mut self, target: Target<'_>) -> Result<Outcome, Failure> {
        let key = self.resolve_key(target)?;
        self.storage.remove(&key);
        self.storage.persist()?;
        tracing::info!(key = %key, "Destroyed record");
        Ok(Outcome::Silent)
    }

    fn all(&self, class: Option<&str>) -> Result<Outcome, Failure> {
        let rendered: Vec<String> = match class {
            None => self.storage.all().values().map(ToString::to_string).collect(),
            Some(name) => {
                let class = RecordClass::from_name(name).ok_or(UserError::ClassDoesNotExist)?;
                self.storage
                    .iter_class(class)
                    .map(ToString::to_string)
                    .collect()
            }
        };
        Ok(Outcome::Message(format!("[{}]", rendered.join(", "))))
    }

    fn count(&self, class: Option<&str>) -> Result<Outcome, Failure> {
        let class = resolve_class(class)?;
        Ok(Outcome::Message(self.storage.count(class).to_string()))
    }

    fn update(&mut self, target: Target<'_>, change: Change<'_>) -> Result<Outcome, Failure> {
        let key = self.resolve_key(target)?;
        let assignments = match change {
            Change::Missing => return Err(UserError::AttributeNameMissing.into()),
            Change::Attribute { value: None, .. } => return Err(UserError::ValueMissing.into()),
            Change::Attribute {
                name,
                value: Some(value),
            } => vec![(name.to_string(), AttrValue::Str(value))],
            Change::Batch(pairs) => pairs,
        };

        let record = self
            .storage
            .get_mut(&key)
            .ok_or(UserError::NoInstanceFound)?;
        let coerced = coerce_assignments(record, assignments)?;
        let count = coerced.len();
        for (name, value) in coerced {
            record.set(name, value)?;
        }
        record.touch();
        self.storage.persist()?;
        tracing::info!(key = %key, attributes = count, "Updated record");
        Ok(Outcome::Silent)
    }

    fn resolve_key(&self, target: Target<'_>) -> Result<StoreKey, UserError> {
        let class = resolve_class(target.class)?;
        let id = target.id.ok_or(UserError::InstanceIdMissing)?;
        let key = StoreKey::new(class, RecordId::new(id));
        if self.storage.contains(&key) {
            Ok(key)
        } else {
            Err(UserError::NoInstanceFound)
        }
    }
}

fn resolve_class(class: Option<&str>) -> Result<RecordClass, UserError> {
    let name = class.ok_or(UserError::ClassNameMissing)?;
    RecordClass::from_name(name).ok_or(UserError::ClassDoesNotExist)
}
