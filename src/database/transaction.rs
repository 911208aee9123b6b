//! Transaction abstraction
//!
//! The importer only ever talks to the database through [`ImportTransaction`],
//! so the setup call and the script runner can be driven against Oracle in
//! production and against an in-memory recorder in tests.

use thiserror::Error;

/// Error reported by the database driver
///
/// Driver errors are flattened to their message so that the importer's error
/// type does not depend on a particular driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DatabaseError {
    message: String,
}

impl DatabaseError {
    /// Create a new database error from a driver message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<oracle::Error> for DatabaseError {
    fn from(err: oracle::Error) -> Self {
        DatabaseError::new(err.to_string())
    }
}

/// A positional bind value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    /// Nullable integer
    Integer(Option<i64>),
    /// Nullable string
    Text(Option<String>),
}

/// An open transaction the importer executes against
///
/// Implementations must keep every call inside one transaction; nothing is
/// committed until [`ImportTransaction::commit`] is called.
pub trait ImportTransaction {
    /// Execute a statement without binds
    fn execute(&mut self, sql: &str) -> Result<(), DatabaseError>;

    /// Execute a statement with positional binds (`:1`, `:2`, ...)
    fn execute_with_binds(&mut self, sql: &str, binds: &[BindValue]) -> Result<(), DatabaseError>;

    /// Commit the transaction
    fn commit(&mut self) -> Result<(), DatabaseError>;

    /// Roll the transaction back
    fn rollback(&mut self) -> Result<(), DatabaseError>;
}
