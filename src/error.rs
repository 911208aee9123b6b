//! Error types for apex-import
//!
//! This module defines the error types used throughout the importer.
//! Nothing below `main` terminates the process; every failure travels
//! back up as an `ImportError`.

use crate::database::DatabaseError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for apex-import
pub type Result<T> = std::result::Result<T, ImportError>;

/// Main error type for apex-import
#[derive(Error, Debug)]
pub enum ImportError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A config file exists but could not be parsed
    #[error("Failed to parse config file {path} (config files are TOML, not YAML): {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Required inputs are missing after all config layers were applied
    #[error("Missing required input: {}", .0.join(", "))]
    MissingInput(Vec<String>),

    /// The import script could not be read
    #[error("Failed to read script {path}: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connecting to the database failed
    #[error("Failed to connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: DatabaseError,
    },

    /// The install-context call failed
    #[error("Failed to execute: {0}")]
    SetupInvocation(#[source] DatabaseError),

    /// A statement from the script body failed
    #[error("Failed to execute: {statement} (err: {source})")]
    StatementExecution {
        statement: String,
        #[source]
        source: DatabaseError,
    },

    /// A statement failed and it could not be written to the failure file
    #[error("Failed to execute: {statement} (err: {database}); could not write {path}: {source}")]
    FailureFile {
        path: PathBuf,
        statement: String,
        database: DatabaseError,
        #[source]
        source: std::io::Error,
    },

    /// Commit or rollback at the end of the run failed
    #[error("Failed to end transaction: {0}")]
    TransactionEnd(#[source] DatabaseError),

    /// The blocking import task panicked or was cancelled
    #[error("Import task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ImportError {
    /// Create a connection error
    pub fn connection(target: impl Into<String>, source: DatabaseError) -> Self {
        ImportError::Connection {
            target: target.into(),
            source,
        }
    }

    /// The statement text that caused the failure, if any
    pub fn failed_statement(&self) -> Option<&str> {
        match self {
            ImportError::StatementExecution { statement, .. }
            | ImportError::FailureFile { statement, .. } => Some(statement),
            _ => None,
        }
    }
}
