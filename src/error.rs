//! Error types shared across the crate.

use thiserror::Error;

/// Everything that can abort a `gitqq` command.
///
/// `RewriteFailed` is the only variant that is reported per item and does
/// not stop a command; the planner collects it into its apply report.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid commit type '{given}' (valid types: {valid})")]
    InvalidType { given: String, valid: String },

    #[error("a commit subject is required in non-interactive mode")]
    MissingSubject,

    #[error("commit '{0}' could not be resolved")]
    UnknownCommit(String),

    #[error("failed to rewrite commit {hash}: {reason}")]
    RewriteFailed { hash: String, reason: String },

    #[error("git {context} failed: {reason}")]
    Gateway { context: String, reason: String },

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("sequence editor error: {0}")]
    SequenceEditor(String),
}

impl Error {
    /// Builds a [`Error::Gateway`] from the failing git subcommand and its stderr.
    pub fn gateway(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Gateway {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
