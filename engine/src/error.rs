use roster_store::StoreError;
use roster_types::{CoerceError, RecordError};
use thiserror::Error;

/// Recoverable input errors. `Display` is the exact message shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("** class name missing **")]
    ClassNameMissing,
    #[error("** class doesn't exist **")]
    ClassDoesNotExist,
    #[error("** instance id missing **")]
    InstanceIdMissing,
    #[error("** no instance found **")]
    NoInstanceFound,
    #[error("** attribute name missing **")]
    AttributeNameMissing,
    #[error("** value missing **")]
    ValueMissing,
}

/// Failures that abort the current command. The shell reports them and keeps
/// reading.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid value for attribute `{attr}`: {source}")]
    Coercion { attr: String, source: CoerceError },
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
