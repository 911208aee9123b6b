//! Command-line arguments

use crate::config::Overrides;
use clap::Parser;
use std::path::PathBuf;

/// apex-import - import an exported APEX application script
#[derive(Parser, Debug)]
#[command(name = "apex-import")]
#[command(version, about = "Import an exported APEX application script into a workspace", long_about = None)]
pub struct Cli {
    /// Script file to import
    #[arg(short = 'i', long = "script")]
    pub script: Option<PathBuf>,

    /// General configuration file (default: ./config.toml)
    #[arg(long = "config-file", alias = "configFile")]
    pub config_file: Option<PathBuf>,

    /// Connection file name inside connectionsDir
    #[arg(long = "connection")]
    pub connection: Option<String>,

    /// Database connection, e.g. user/password@host:port/service
    #[arg(long = "db")]
    pub db: Option<String>,

    /// Application ID to import into (generated when omitted)
    #[arg(long = "app-id", alias = "appID")]
    pub app_id: Option<i64>,

    /// Application alias override
    #[arg(long = "alias")]
    pub alias: Option<String>,

    /// Parsing schema override
    #[arg(long = "schema")]
    pub schema: Option<String>,

    /// Workspace to import into (defaults to the connecting user)
    #[arg(long = "workspace")]
    pub workspace: Option<String>,

    /// Enable debug logging
    #[arg(long = "debug")]
    pub debug: bool,

    /// Commit after a successful import instead of rolling back
    #[arg(long = "commit")]
    pub commit: bool,

    /// File the failing statement is written to (default: ./output.txt)
    #[arg(long = "failure-file")]
    pub failure_file: Option<PathBuf>,
}

impl Cli {
    /// Flag values as the highest config layer
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config_file.clone(),
            connection: self.connection.clone(),
            db: self.db.clone(),
            script: self.script.clone(),
            application_id: self.app_id,
            alias: self.alias.clone(),
            schema: self.schema.clone(),
            workspace: self.workspace.clone(),
            debug: self.debug,
            commit: self.commit,
            failure_file: self.failure_file.clone(),
        }
    }
}
