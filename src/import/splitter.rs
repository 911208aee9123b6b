//! Statement splitting strategies
//!
//! The default [`SlashDelimitedSplitter`] cuts the script on every `/` that
//! ends a line, the way SQL*Plus scripts terminate PL/SQL units. It is a plain
//! text split: a line ending in `/` inside a string literal or a comment also
//! ends the block, and `\r\n` line endings are not recognised. A SQL-aware
//! splitter can be plugged in through [`StatementSplitter`].

/// Block terminator for exported scripts
pub const BLOCK_DELIMITER: &str = "/\n";

/// Splits raw script text into statement blocks
pub trait StatementSplitter: Send + Sync {
    /// Split the script into blocks, in script order
    fn split<'a>(&self, script: &'a str) -> Vec<&'a str>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Textual split on [`BLOCK_DELIMITER`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SlashDelimitedSplitter;

impl StatementSplitter for SlashDelimitedSplitter {
    fn split<'a>(&self, script: &'a str) -> Vec<&'a str> {
        script.split(BLOCK_DELIMITER).collect()
    }

    fn name(&self) -> &str {
        "slash-delimited"
    }
}
