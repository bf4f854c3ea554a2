use thiserror::Error;

use crate::schema::Domain;

/// Constraint and arity violations raised by [`crate::table::Table`].
///
/// Each variant's `Display` message is the diagnostic line the command
/// executor prints verbatim for that rejection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("value '{value}' at column '{column}' does not conform to domain {domain:?}")]
    DomainViolation {
        column: String,
        domain: Domain,
        value: String,
    },

    #[error("text value at column '{column}' exceeds maximum length of {max} characters")]
    TextOverflow { column: String, max: usize },

    #[error("primary key column '{column}' cannot be null or blank")]
    NullKey { column: String },

    #[error("duplicate primary key value '{key}' in table '{table}'")]
    DuplicateKey { table: String, key: String },

    #[error("table '{0}' has no primary key")]
    NoPrimaryKey(String),

    #[error("schema has more than one primary key attribute")]
    MultiplePrimaryKeys,

    #[error("rename list length {given} does not match schema length {expected}")]
    RenameArityMismatch { expected: usize, given: usize },
}
