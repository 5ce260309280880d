//! Error types for codepad

use thiserror::Error;

/// Result type alias for codepad operations
pub type Result<T> = std::result::Result<T, CodepadError>;

/// Codepad error types
///
/// A program that runs and fails is not an error: non-zero exits, stderr
/// output and timeouts are reported through `ExecutionResult`.
#[derive(Error, Debug)]
pub enum CodepadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern for rule `{rule}`: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown token type: {0}")]
    UnknownToken(String),

    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Unknown overlay policy: {0}")]
    UnknownPolicy(String),

    #[error("Unknown syntax: {0}")]
    UnknownSyntax(String),

    #[error("Rule file error: {0}")]
    RuleFile(#[from] toml::de::Error),

    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Run task failed: {0}")]
    TaskFailed(String),
}
