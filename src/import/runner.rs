//! Script runner
//!
//! Executes the body of an export script block by block. The first failing
//! statement stops the run; its text is written to the failure file so the
//! operator can inspect it.

use crate::database::{DatabaseError, ImportTransaction};
use crate::error::{ImportError, Result};
use crate::import::directives::{assemble_statement, is_blank};
use crate::import::splitter::{SlashDelimitedSplitter, StatementSplitter};
use crate::import::ImportState;
use std::fs;
use std::path::PathBuf;

/// Counts for one script run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Blocks produced by the splitter
    pub blocks: usize,
    /// Statements executed successfully
    pub executed: usize,
    /// Blocks with nothing left after filtering
    pub skipped: usize,
}

/// Splits, filters and executes a script
pub struct ScriptRunner {
    splitter: Box<dyn StatementSplitter>,
    failure_file: PathBuf,
}

impl ScriptRunner {
    /// Create a runner with the slash-delimited splitter
    pub fn new(failure_file: impl Into<PathBuf>) -> Self {
        Self {
            splitter: Box::new(SlashDelimitedSplitter),
            failure_file: failure_file.into(),
        }
    }

    /// Replace the splitting strategy
    pub fn with_splitter(mut self, splitter: impl StatementSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    /// Execute every statement of the script
    pub fn run_script(&self, script: &str, tx: &mut dyn ImportTransaction) -> Result<ScriptSummary> {
        self.run_script_observed(script, tx, &mut |_| {})
    }

    /// Execute every statement, reporting block state changes to `observe`
    pub fn run_script_observed(
        &self,
        script: &str,
        tx: &mut dyn ImportTransaction,
        observe: &mut dyn FnMut(ImportState),
    ) -> Result<ScriptSummary> {
        let blocks = self.splitter.split(script);
        let mut summary = ScriptSummary {
            blocks: blocks.len(),
            ..Default::default()
        };
        tracing::debug!(
            splitter = self.splitter.name(),
            blocks = blocks.len(),
            "Split script"
        );

        for (index, block) in blocks.into_iter().enumerate() {
            let statement = assemble_statement(block);
            if is_blank(&statement) {
                summary.skipped += 1;
                continue;
            }

            observe(ImportState::ExecutingBlock(index));
            tracing::debug!(block = index, bytes = statement.len(), "Executing block");

            if let Err(source) = tx.execute(&statement) {
                return Err(self.capture_failure(statement, source));
            }

            summary.executed += 1;
            observe(ImportState::BlockDone(index));
        }

        Ok(summary)
    }

    /// Write the failing statement to the failure file and build the error
    fn capture_failure(&self, statement: String, source: DatabaseError) -> ImportError {
        match fs::write(&self.failure_file, &statement) {
            Ok(()) => {
                tracing::debug!(path = %self.failure_file.display(), "Wrote failing statement");
                ImportError::StatementExecution { statement, source }
            }
            Err(io) => ImportError::FailureFile {
                path: self.failure_file.clone(),
                statement,
                database: source,
                source: io,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::test_support::{Call, RecordingTransaction};

    fn runner(dir: &tempfile::TempDir) -> ScriptRunner {
        ScriptRunner::new(dir.path().join("output.txt"))
    }

    #[test]
    fn test_end_to_end_two_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::default();
        let script = "create table t(x number);\n/\nprompt done\ninsert into t values(1);\n";

        let summary = runner(&dir).run_script(script, &mut tx).unwrap();

        assert_eq!(
            tx.calls,
            vec![
                Call::Plain("create table t(x number);\n".to_string()),
                Call::Plain("insert into t values(1);\n".to_string()),
            ]
        );
        assert_eq!(summary.executed, 2);
        assert!(!dir.path().join("output.txt").exists());
    }

    #[test]
    fn test_single_block_without_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::default();

        let summary = runner(&dir).run_script("select 1 from dual\n", &mut tx).unwrap();

        assert_eq!(tx.calls, vec![Call::Plain("select 1 from dual\n".to_string())]);
        assert_eq!(summary, ScriptSummary { blocks: 1, executed: 1, skipped: 0 });
    }

    #[test]
    fn test_directive_only_block_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::default();

        let summary = runner(&dir)
            .run_script("set define off\nwhenever sqlerror exit\n", &mut tx)
            .unwrap();

        assert!(tx.calls.is_empty());
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_trailing_delimiter_block_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::default();

        let summary = runner(&dir)
            .run_script("begin null; end;\n/\nbegin null; end;\n/\n", &mut tx)
            .unwrap();

        assert_eq!(summary, ScriptSummary { blocks: 3, executed: 2, skipped: 1 });
    }

    #[test]
    fn test_failure_stops_run_and_writes_statement() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::failing_on("bad_table");
        let script = "begin ok; end;\n/\nprompt step 2\ninsert into bad_table values(1);\n/\nbegin never; end;\n";

        let err = runner(&dir).run_script(script, &mut tx).unwrap_err();

        match &err {
            ImportError::StatementExecution { statement, .. } => {
                assert_eq!(statement, "insert into bad_table values(1);\n");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(tx.calls.len(), 2);
        assert!(!tx.executed("begin never; end;\n"));
        assert_eq!(
            fs::read_to_string(dir.path().join("output.txt")).unwrap(),
            "insert into bad_table values(1);\n"
        );
    }

    #[test]
    fn test_failure_file_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        fs::write(&path, "a much longer statement from a previous run\n").unwrap();
        let mut tx = RecordingTransaction::failing_on("boom");

        let _ = runner(&dir).run_script("boom\n", &mut tx);

        assert_eq!(fs::read_to_string(&path).unwrap(), "boom\n");
    }

    #[test]
    fn test_unwritable_failure_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptRunner::new(dir.path().join("missing").join("output.txt"));
        let mut tx = RecordingTransaction::failing_on("boom");

        let err = runner.run_script("boom\n/\nselect 1 from dual\n", &mut tx).unwrap_err();

        assert!(matches!(err, ImportError::FailureFile { .. }));
        assert_eq!(err.failed_statement(), Some("boom\n"));
        assert_eq!(tx.calls.len(), 1);
    }

    #[test]
    fn test_observer_sees_block_states() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::default();
        let mut states = Vec::new();

        runner(&dir)
            .run_script_observed("a\n/\nprompt x\n/\nb\n", &mut tx, &mut |s| states.push(s))
            .unwrap();

        assert_eq!(
            states,
            vec![
                ImportState::ExecutingBlock(0),
                ImportState::BlockDone(0),
                ImportState::ExecutingBlock(2),
                ImportState::BlockDone(2),
            ]
        );
    }

    struct SemicolonSplitter;

    impl StatementSplitter for SemicolonSplitter {
        fn split<'a>(&self, script: &'a str) -> Vec<&'a str> {
            script.split(";\n").collect()
        }

        fn name(&self) -> &str {
            "semicolon"
        }
    }

    #[test]
    fn test_custom_splitter() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::default();

        runner(&dir)
            .with_splitter(SemicolonSplitter)
            .run_script("select 1 from dual;\nselect 2 from dual;\n", &mut tx)
            .unwrap();

        assert_eq!(
            tx.calls,
            vec![
                Call::Plain("select 1 from dual\n".to_string()),
                Call::Plain("select 2 from dual\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_mixed_case_prompt_is_executed() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = RecordingTransaction::default();

        runner(&dir)
            .run_script("a\n/\nset define off\n/\nPrompt kept\n", &mut tx)
            .unwrap();

        assert_eq!(
            tx.calls,
            vec![
                Call::Plain("a\n".to_string()),
                Call::Plain("Prompt kept\n".to_string()),
            ]
        );
    }
}
