//! Oracle connection
//!
//! This module parses the `user/password@connect_identifier` connection
//! string and wraps an `oracle::Connection` as an [`ImportTransaction`].

use crate::database::transaction::{BindValue, DatabaseError, ImportTransaction};
use crate::error::{ImportError, Result};
use oracle::sql_type::ToSql;
use oracle::Connection;
use std::fmt;
use std::str::FromStr;

/// A parsed `user/password@connect_identifier` connection string
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectString {
    /// Database user
    pub username: String,
    /// Password for the user
    pub password: String,
    /// Easy Connect identifier or TNS alias (e.g. `host:1521/service`)
    pub connect_identifier: String,
}

impl ConnectString {
    /// Create a connect string from its parts
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        connect_identifier: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            connect_identifier: connect_identifier.into(),
        }
    }

    /// Connection target safe for logs (no password)
    pub fn redacted(&self) -> String {
        format!("{}@{}", self.username, self.connect_identifier)
    }
}

impl FromStr for ConnectString {
    type Err = ImportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        // The password may itself contain '@', the identifier never does
        let (credentials, identifier) = s.rsplit_once('@').ok_or_else(|| {
            ImportError::Config(
                "Connection string must look like user/password@host:port/service".to_string(),
            )
        })?;
        let (username, password) = credentials.split_once('/').ok_or_else(|| {
            ImportError::Config("Connection string is missing the /password part".to_string())
        })?;

        if username.is_empty() || identifier.is_empty() {
            return Err(ImportError::Config(format!(
                "Incomplete connection string for user '{}'",
                username
            )));
        }

        Ok(ConnectString::new(username, password, identifier))
    }
}

impl fmt::Display for ConnectString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.username, self.password, self.connect_identifier
        )
    }
}

// Never print the password through `{:?}`
impl fmt::Debug for ConnectString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectString")
            .field("username", &self.username)
            .field("password", &"********")
            .field("connect_identifier", &self.connect_identifier)
            .finish()
    }
}

/// An open Oracle connection used as a single transaction
///
/// Autocommit is off on a fresh `oracle::Connection`, so everything executed
/// here stays in one transaction until `commit` or `rollback`.
pub struct OracleTransaction {
    conn: Connection,
}

impl OracleTransaction {
    /// Connect to the database described by the connect string
    pub fn connect(target: &ConnectString) -> Result<Self> {
        let conn = Connection::connect(
            &target.username,
            &target.password,
            &target.connect_identifier,
        )
        .map_err(|e| ImportError::connection(target.redacted(), e.into()))?;

        Ok(Self { conn })
    }
}

impl ImportTransaction for OracleTransaction {
    fn execute(&mut self, sql: &str) -> std::result::Result<(), DatabaseError> {
        self.conn.execute(sql, &[])?;
        Ok(())
    }

    fn execute_with_binds(
        &mut self,
        sql: &str,
        binds: &[BindValue],
    ) -> std::result::Result<(), DatabaseError> {
        let params: Vec<&dyn ToSql> = binds
            .iter()
            .map(|bind| match bind {
                BindValue::Integer(value) => value as &dyn ToSql,
                BindValue::Text(value) => value as &dyn ToSql,
            })
            .collect();

        self.conn.execute(sql, &params)?;
        Ok(())
    }

    fn commit(&mut self) -> std::result::Result<(), DatabaseError> {
        self.conn.commit()?;
        Ok(())
    }

    fn rollback(&mut self) -> std::result::Result<(), DatabaseError> {
        self.conn.rollback()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect_string() {
        let target: ConnectString = "apex/secret@localhost:1521/XEPDB1".parse().unwrap();
        assert_eq!(target.username, "apex");
        assert_eq!(target.password, "secret");
        assert_eq!(target.connect_identifier, "localhost:1521/XEPDB1");
    }

    #[test]
    fn test_parse_password_with_at_sign() {
        let target: ConnectString = "apex/p@ss@db:1521/ORCL".parse().unwrap();
        assert_eq!(target.password, "p@ss");
        assert_eq!(target.connect_identifier, "db:1521/ORCL");
    }

    #[test]
    fn test_invalid_connect_string() {
        assert!("apex@localhost:1521/XE".parse::<ConnectString>().is_err());
        assert!("apex/secret".parse::<ConnectString>().is_err());
        assert!("/secret@localhost:1521/XE".parse::<ConnectString>().is_err());
        assert!("apex/secret@".parse::<ConnectString>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let raw = "apex/secret@localhost:1521/XEPDB1";
        let target: ConnectString = raw.parse().unwrap();
        assert_eq!(target.to_string(), raw);
    }

    #[test]
    fn test_password_hidden() {
        let target = ConnectString::new("apex", "secret", "localhost:1521/XE");
        assert_eq!(target.redacted(), "apex@localhost:1521/XE");
        assert!(!format!("{:?}", target).contains("secret"));
    }
}
