//! Execution sandbox: request and result types.
//!
//! Each run spawns one interpreter process, captures its stdout and
//! stderr separately, and ends when the child exits, the timeout fires
//! or the caller cancels. A program that fails is data in the result;
//! only a sandbox that cannot do its job returns an error.

use std::time::Duration;

mod capture;
pub mod env;
mod handle;
mod runner;

pub use env::EnvPolicy;
pub use handle::RunHandle;
pub use runner::{Invocation, Sandbox, SandboxConfig};

/// Code to run and how long to let it run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub source_code: String,
    /// None waits for the child however long it takes
    pub timeout: Option<Duration>,
}

impl ExecutionRequest {
    pub fn new(source_code: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_ms(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }
}

/// What a run produced
///
/// `exit_code` is None only when the sandbox killed the child (timeout
/// or cancellation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Captured stdout, decoded as UTF-8 with replacement
    pub stdout: String,
    /// Captured stderr, decoded as UTF-8 with replacement
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub cancelled: bool,
    /// A stream hit the output limit and the excess was dropped
    pub truncated: bool,
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// Exited on its own with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out && !self.cancelled
    }

    /// stdout followed by stderr, the way an output pane shows them
    pub fn combined_output(&self) -> String {
        let mut output = String::with_capacity(self.stdout.len() + self.stderr.len());
        output.push_str(&self.stdout);
        output.push_str(&self.stderr);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = ExecutionRequest::new("print(1)");
        assert_eq!(request.timeout, None);
        let request = request.with_timeout_ms(250);
        assert_eq!(request.timeout, Some(Duration::from_millis(250)));
        assert_eq!(request.source_code, "print(1)");
    }

    #[test]
    fn test_result_helpers() {
        let mut result = ExecutionResult {
            stdout: "2\n".to_string(),
            stderr: "warning\n".to_string(),
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(result.success());
        assert_eq!(result.combined_output(), "2\nwarning\n");

        result.exit_code = Some(1);
        assert!(!result.success());

        result.exit_code = None;
        result.timed_out = true;
        assert!(!result.success());
    }
}
