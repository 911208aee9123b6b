//! SQL*Plus directive filtering
//!
//! Exported scripts carry client-side directives (`prompt`, `set define off`,
//! ...) that the database cannot execute. They are dropped line by line
//! before a block is sent to the server.

/// Line prefixes dropped from every block (case-sensitive)
pub const DIRECTIVE_PREFIXES: [&str; 4] = [
    "prompt",
    "set define",
    "set verify on",
    "whenever sqlerror",
];

const PROMPT_PREFIX: &str = "prompt";

/// Check if a line is a client directive
pub fn is_directive(line: &str) -> bool {
    DIRECTIVE_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// Turn a block into the statement text sent to the database
///
/// One trailing newline is stripped, directive lines are dropped and every
/// remaining line gets its newline back. `prompt` lines are logged at debug
/// level so the export's progress messages are still visible.
pub fn assemble_statement(block: &str) -> String {
    let block = block.strip_suffix('\n').unwrap_or(block);
    let mut statement = String::with_capacity(block.len() + 1);

    for line in block.split('\n') {
        if line.starts_with(PROMPT_PREFIX) {
            tracing::debug!("{}", line);
        }
        if is_directive(line) {
            continue;
        }
        statement.push_str(line);
        statement.push('\n');
    }

    statement
}

/// Check if an assembled statement has nothing to execute
pub fn is_blank(statement: &str) -> bool {
    statement.trim().is_empty()
}
