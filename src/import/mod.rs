//! Import module
//!
//! This module drives one import run: establish the install context, run the
//! script body, then end the transaction.
//!
//! ```text
//! Idle -> SetupRunning -> SetupDone -> (ExecutingBlock -> BlockDone)* -> Finished
//!              |                              |
//!              +----------> Aborted <---------+
//! ```

pub mod directives;
pub mod runner;
pub mod setup;
pub mod splitter;

// Re-exports
pub use runner::{ScriptRunner, ScriptSummary};
pub use setup::run_setup;
pub use splitter::{SlashDelimitedSplitter, StatementSplitter};

use crate::config::ImportParameters;
use crate::database::ImportTransaction;
use crate::error::{ImportError, Result};
use std::fmt;
use std::path::Path;

/// Import run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    SetupRunning,
    SetupDone,
    /// Block index in script order
    ExecutingBlock(usize),
    BlockDone(usize),
    Finished,
    Aborted,
}

impl ImportState {
    /// Check if the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportState::Finished | ImportState::Aborted)
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportState::Idle => write!(f, "idle"),
            ImportState::SetupRunning => write!(f, "setup running"),
            ImportState::SetupDone => write!(f, "setup done"),
            ImportState::ExecutingBlock(i) => write!(f, "executing block {}", i),
            ImportState::BlockDone(i) => write!(f, "block {} done", i),
            ImportState::Finished => write!(f, "finished"),
            ImportState::Aborted => write!(f, "aborted"),
        }
    }
}

/// What happens to the transaction after a successful run
///
/// Failed runs are always rolled back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndOfRun {
    /// Roll back even on success (dry run)
    #[default]
    Rollback,
    /// Commit on success
    Commit,
}

/// Result of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub summary: ScriptSummary,
    pub end_of_run: EndOfRun,
}

/// Runs setup and script against one transaction
pub struct Importer {
    runner: ScriptRunner,
    end_of_run: EndOfRun,
    state: ImportState,
}

impl Importer {
    /// Create an importer
    pub fn new(runner: ScriptRunner, end_of_run: EndOfRun) -> Self {
        Self {
            runner,
            end_of_run,
            state: ImportState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> ImportState {
        self.state
    }

    /// Run the whole import
    ///
    /// An importer that already finished or aborted starts over from `Idle`.
    /// DDL in the script commits implicitly on Oracle; the final commit or
    /// rollback only covers what DDL has not already committed.
    pub fn run(
        &mut self,
        params: &ImportParameters,
        script: &str,
        tx: &mut dyn ImportTransaction,
    ) -> Result<ImportReport> {
        if self.state.is_terminal() {
            self.transition(ImportState::Idle);
        }

        let outcome = match self.run_body(params, script, tx) {
            Ok(summary) => self.end_transaction(tx).map(|()| summary),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(summary) => {
                self.transition(ImportState::Finished);
                tracing::info!(
                    executed = summary.executed,
                    skipped = summary.skipped,
                    "Import finished"
                );
                Ok(ImportReport {
                    summary,
                    end_of_run: self.end_of_run,
                })
            }
            Err(err) => {
                self.transition(ImportState::Aborted);
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!("Rollback after failure also failed: {}", rollback);
                }
                Err(err)
            }
        }
    }

    fn run_body(
        &mut self,
        params: &ImportParameters,
        script: &str,
        tx: &mut dyn ImportTransaction,
    ) -> Result<ScriptSummary> {
        self.transition(ImportState::SetupRunning);
        run_setup(params, tx)?;
        self.transition(ImportState::SetupDone);

        let runner = &self.runner;
        let state = &mut self.state;
        runner.run_script_observed(script, tx, &mut |next| {
            tracing::debug!(from = %state, to = %next, "State change");
            *state = next;
        })
    }

    fn end_transaction(&self, tx: &mut dyn ImportTransaction) -> Result<()> {
        match self.end_of_run {
            EndOfRun::Commit => tx.commit().map_err(ImportError::TransactionEnd),
            EndOfRun::Rollback => {
                tx.rollback().map_err(ImportError::TransactionEnd)?;
                tracing::warn!("Transaction rolled back, no changes were persisted (use --commit)");
                Ok(())
            }
        }
    }

    fn transition(&mut self, next: ImportState) {
        tracing::debug!(from = %self.state, to = %next, "State change");
        self.state = next;
    }
}

/// Read the script file
pub fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ImportError::ScriptRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Connect and run the import on a blocking thread
///
/// The driver is synchronous, so the whole run happens inside one
/// `spawn_blocking` task; the async caller just waits for it.
pub async fn run_import<C, T>(
    connect: C,
    mut importer: Importer,
    params: ImportParameters,
    script: String,
) -> Result<ImportReport>
where
    C: FnOnce() -> Result<T> + Send + 'static,
    T: ImportTransaction + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut tx = connect()?;
        importer.run(&params, &script, &mut tx)
    })
    .await?
}
