//! Database module
//!
//! This module provides the Oracle connection and the transaction
//! abstraction the importer executes against.

pub mod connection;
pub mod transaction;

// Re-exports
pub use connection::{ConnectString, OracleTransaction};
pub use transaction::{BindValue, DatabaseError, ImportTransaction};
