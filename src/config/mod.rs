//! Configuration module
//!
//! This module resolves everything the importer needs before it connects:
//! the install parameters, the connection parameters and the run options.
//! Layers are applied lowest to highest: general config file, connection
//! file, environment, command-line flags.

pub mod storage;

use crate::database::ConnectString;
use crate::error::{ImportError, Result};
use crate::import::EndOfRun;
use std::path::{Path, PathBuf};
use storage::{config_path, ConnectionConfig, GeneralConfig, DEFAULT_CONFIG_NAME};

/// Environment variable holding a full connection string
pub const ENV_CONNECTION: &str = "APEX_IMPORT_DB";

/// Environment variable overriding the connection file password
pub const ENV_PASSWORD: &str = "APEX_IMPORT_PASSWORD";

/// Default failure file
pub const DEFAULT_FAILURE_FILE: &str = "./output.txt";

const DEFAULT_ORACLE_PORT: u16 = 1521;

/// Install-time parameters handed to the setup call
///
/// A `None` means "use the installer default": current user for the
/// workspace, a generated id for the application, and no override for the
/// schema or alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportParameters {
    pub application_id: Option<i64>,
    pub alias: Option<String>,
    pub schema: Option<String>,
    pub workspace: Option<String>,
}

impl ImportParameters {
    /// Create import parameters, treating blank strings as absent
    pub fn new(
        application_id: Option<i64>,
        alias: Option<String>,
        schema: Option<String>,
        workspace: Option<String>,
    ) -> Self {
        Self {
            application_id,
            alias: non_blank(alias),
            schema: non_blank(schema),
            workspace: non_blank(workspace),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// How to reach the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionParameters {
    /// A full `user/password@host:port/service` string
    ConnectionString(String),
    /// Individual parts
    Parts {
        username: String,
        password: String,
        host: String,
        port: u16,
        service: String,
    },
}

impl ConnectionParameters {
    /// The resolved `user/password@host:port/service` string
    pub fn connection_string(&self) -> String {
        match self {
            ConnectionParameters::ConnectionString(s) => s.clone(),
            ConnectionParameters::Parts {
                username,
                password,
                host,
                port,
                service,
            } => format!("{}/{}@{}:{}/{}", username, password, host, port, service),
        }
    }

    /// Parse into the parts the driver needs
    pub fn connect_string(&self) -> Result<ConnectString> {
        self.connection_string().parse()
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub connection: Option<String>,
    pub db: Option<String>,
    pub script: Option<PathBuf>,
    pub application_id: Option<i64>,
    pub alias: Option<String>,
    pub schema: Option<String>,
    pub workspace: Option<String>,
    pub debug: bool,
    pub commit: bool,
    pub failure_file: Option<PathBuf>,
}

/// Fully resolved settings for one import run
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub params: ImportParameters,
    pub connection: ConnectionParameters,
    pub script: PathBuf,
    pub debug: bool,
    pub end_of_run: EndOfRun,
    pub failure_file: PathBuf,
}

impl ImportSettings {
    /// Resolve settings from config files, the process environment and flags
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        Self::resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup
    pub fn resolve_with_env<F>(overrides: Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let general = match &overrides.config_file {
            Some(name) => GeneralConfig::load(&config_path(Path::new("."), &name.to_string_lossy()))?,
            None => GeneralConfig::load_optional(&config_path(Path::new("."), DEFAULT_CONFIG_NAME))?,
        };

        let connection_file = match overrides
            .connection
            .as_deref()
            .or(general.connection_config.as_deref())
        {
            Some(name) => {
                let dir = general
                    .connections_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("."));
                ConnectionConfig::load(&config_path(&dir, name))?
            }
            None => ConnectionConfig::default(),
        };

        let connection = resolve_connection(overrides.db.clone(), connection_file, &env);

        let mut missing = Vec::new();
        if connection.is_none() {
            missing.push("database connection (--db or a connection file)".to_string());
        }
        if overrides.script.is_none() {
            missing.push("script to import (-i)".to_string());
        }
        let (Some(connection), Some(script)) = (connection, overrides.script) else {
            return Err(ImportError::MissingInput(missing));
        };

        let end_of_run = if overrides.commit || general.commit_on_success {
            EndOfRun::Commit
        } else {
            EndOfRun::Rollback
        };

        Ok(Self {
            params: ImportParameters::new(
                overrides.application_id,
                overrides.alias,
                overrides.schema,
                overrides.workspace,
            ),
            connection,
            script,
            debug: overrides.debug || general.debug_mode,
            end_of_run,
            failure_file: overrides
                .failure_file
                .or(general.failure_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FAILURE_FILE)),
        })
    }
}

fn resolve_connection<F>(
    db: Option<String>,
    file: ConnectionConfig,
    env: &F,
) -> Option<ConnectionParameters>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = non_blank(db)
        .or_else(|| non_blank(env(ENV_CONNECTION)))
        .or_else(|| non_blank(file.db_connection_string));
    if let Some(s) = explicit {
        return Some(ConnectionParameters::ConnectionString(s));
    }

    let password = env(ENV_PASSWORD).or(file.password);
    match (non_blank(file.username), password, non_blank(file.hostname), non_blank(file.service)) {
        (Some(username), Some(password), Some(host), Some(service)) => {
            Some(ConnectionParameters::Parts {
                username,
                password,
                host,
                port: file.port.unwrap_or(DEFAULT_ORACLE_PORT),
                service,
            })
        }
        _ => None,
    }
}
