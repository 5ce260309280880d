//! Interpreter process management (spawn, capture, timeout, kill)

use std::future::{self, Future};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::capture::StreamCapture;
use super::env::EnvPolicy;
use super::{ExecutionRequest, ExecutionResult};
use crate::error::{CodepadError, Result};

/// How the source code reaches the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// As an argument after `flag` (`python3 -c CODE`, `sh -c CODE`)
    Inline { flag: String },
    /// Written to the child's stdin, which is then closed
    Stdin,
}

impl Invocation {
    pub fn inline(flag: &str) -> Self {
        Invocation::Inline {
            flag: flag.to_string(),
        }
    }
}

/// Sandbox settings shared by every run
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Interpreter program, looked up on PATH
    pub interpreter: String,
    /// Arguments placed before the code
    pub args: Vec<String>,
    pub invocation: Invocation,
    /// Child working directory; the system temp dir when None
    pub working_dir: Option<PathBuf>,
    pub env: EnvPolicy,
    /// Bytes kept per stream
    pub output_limit: usize,
    /// How long to wait for pipes to close once the child is gone
    pub drain_grace: Duration,
}

/// Interpreter used when none is configured
pub fn default_interpreter() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter().to_string(),
            args: Vec::new(),
            invocation: Invocation::inline("-c"),
            working_dir: None,
            env: EnvPolicy::default(),
            output_limit: 1024 * 1024,
            drain_grace: Duration::from_millis(500),
        }
    }
}

impl SandboxConfig {
    /// Python, code passed with `-c`
    pub fn python() -> Self {
        Self::default()
    }

    /// POSIX shell, code passed with `-c`
    pub fn shell() -> Self {
        Self {
            interpreter: "sh".to_string(),
            ..Self::default()
        }
    }
}

/// How the wait ended
enum Ending {
    Exited(std::io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

/// Runs code in child processes
///
/// Cheap to clone; every clone shares the same read-only config and
/// nothing else. Runs never share a process or a pipe.
#[derive(Debug, Clone)]
pub struct Sandbox {
    config: Arc<SandboxConfig>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(SandboxConfig::default())
    }
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    fn command(&self, request: &ExecutionRequest) -> Command {
        let config = &self.config;
        let mut command = Command::new(&config.interpreter);
        command.args(&config.args);
        match &config.invocation {
            Invocation::Inline { flag } => {
                command.arg(flag).arg(&request.source_code);
                command.stdin(Stdio::null());
            }
            Invocation::Stdin => {
                command.stdin(Stdio::piped());
            }
        }
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .current_dir(config.working_dir.clone().unwrap_or_else(std::env::temp_dir))
            .kill_on_drop(true);
        // Own process group, so a kill reaches everything the code started.
        #[cfg(unix)]
        command.process_group(0);
        config.env.apply(&mut command);
        command
    }

    /// Run a request to completion or timeout
    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult> {
        self.execute_until(request, future::pending::<()>()).await
    }

    /// Run a request, killing the child early if `cancel` completes
    ///
    /// Cancellation behaves like a timeout: the child is killed and the
    /// output read so far is returned with `cancelled` set.
    pub async fn execute_until<F>(&self, request: ExecutionRequest, cancel: F) -> Result<ExecutionResult>
    where
        F: Future<Output = ()>,
    {
        let config = &self.config;
        let started = Instant::now();

        let mut child = self.command(&request).spawn().map_err(|source| CodepadError::Spawn {
            program: config.interpreter.clone(),
            source,
        })?;
        let pid = child.id();
        debug!(?pid, interpreter = %config.interpreter, "spawned child");

        let feeder = child.stdin.take().map(|mut stdin| {
            let code = request.source_code.clone();
            tokio::spawn(async move {
                if let Err(err) = stdin.write_all(code.as_bytes()).await {
                    debug!(%err, "stdin closed before the code was written");
                }
            })
        });
        let stdout = StreamCapture::spawn(child.stdout.take(), config.output_limit);
        let stderr = StreamCapture::spawn(child.stderr.take(), config.output_limit);

        let deadline = async {
            match request.timeout {
                Some(limit) => sleep(limit).await,
                None => future::pending::<()>().await,
            }
        };

        let ending = tokio::select! {
            status = child.wait() => Ending::Exited(status),
            _ = deadline => Ending::TimedOut,
            _ = cancel => Ending::Cancelled,
        };

        let (exit_code, timed_out, cancelled) = match ending {
            Ending::Exited(status) => {
                // Background processes left behind die with the run.
                kill_group(pid);
                (exit_code(status?), false, false)
            }
            Ending::TimedOut => {
                kill_child(&mut child, "timeout").await;
                (None, true, false)
            }
            Ending::Cancelled => {
                kill_child(&mut child, "cancelled").await;
                (None, false, true)
            }
        };

        if let Some(feeder) = feeder {
            feeder.abort();
        }
        let (stdout, stderr) = tokio::join!(
            stdout.finish(config.drain_grace),
            stderr.finish(config.drain_grace)
        );

        let result = ExecutionResult {
            stdout: stdout.text,
            stderr: stderr.text,
            exit_code,
            timed_out,
            cancelled,
            truncated: stdout.truncated || stderr.truncated,
            elapsed: started.elapsed(),
        };
        debug!(?pid, exit_code = ?result.exit_code, elapsed_ms = result.elapsed.as_millis() as u64, "run finished");
        Ok(result)
    }
}

/// Kill the child's process group, then reap the child
async fn kill_child(child: &mut Child, reason: &str) {
    let pid = child.id();
    warn!(?pid, reason, "killing child");
    if !kill_group(pid) {
        if let Err(err) = child.start_kill() {
            warn!(?pid, %err, "kill failed");
        }
    }
    if let Err(err) = child.wait().await {
        warn!(?pid, %err, "reaping child failed");
    }
}

/// SIGKILL the process group led by `pid`; false if nothing was signalled
#[cfg(unix)]
fn kill_group(pid: Option<u32>) -> bool {
    let Some(pgid) = pid.and_then(|pid| libc::pid_t::try_from(pid).ok()) else {
        return false;
    };
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        debug!(pgid, err = %std::io::Error::last_os_error(), "group kill skipped");
    }
    rc == 0
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) -> bool {
    false
}

/// Exit status as a code; signal deaths become 128 + signal on Unix
fn exit_code(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.code().or_else(|| status.signal().map(|signal| 128 + signal))
    }
    #[cfg(not(unix))]
    {
        status.code()
    }
}


#[cfg(test)]
mod python_tests {
    //! Python runs; skipped when no interpreter is installed.

    use super::*;

    fn python() -> Option<Sandbox> {
        let available = std::process::Command::new(default_interpreter())
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        available.then(Sandbox::default)
    }

    #[tokio::test]
    async fn test_print_arithmetic() {
        let Some(sandbox) = python() else { return };
        let result = sandbox
            .execute(ExecutionRequest::new("print(1+1)").with_timeout_ms(5000))
            .await
            .unwrap();
        assert!(result.stdout.contains('2'));
        assert_eq!(result.exit_code, Some(0));
        assert!(!result.timed_out);
    }

    #[tokio::test]
    async fn test_infinite_loop_times_out() {
        let Some(sandbox) = python() else { return };
        let started = Instant::now();
        let result = sandbox
            .execute(ExecutionRequest::new("while True: pass").with_timeout_ms(200))
            .await
            .unwrap();
        assert!(result.timed_out);
        assert_eq!(result.exit_code, None);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_exception_reports_stderr() {
        let Some(sandbox) = python() else { return };
        let result = sandbox
            .execute(ExecutionRequest::new("raise ValueError('x')").with_timeout_ms(5000))
            .await
            .unwrap();
        assert_ne!(result.exit_code, Some(0));
        assert!(result.exit_code.is_some());
        assert!(result.stderr.contains("ValueError: x"));
        assert!(!result.timed_out);
    }

    #[tokio::test]
    async fn test_partial_output_before_timeout() {
        let Some(sandbox) = python() else { return };
        let result = sandbox
            .execute(ExecutionRequest::new("print('tick')\nwhile True: pass").with_timeout_ms(500))
            .await
            .unwrap();
        assert!(result.timed_out);
        assert_eq!(result.stdout, "tick\n");
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_attributed() {
        let Some(sandbox) = python() else { return };
        let first = sandbox.spawn(ExecutionRequest::new("print('first' * 3)").with_timeout_ms(5000));
        let second = sandbox.spawn(ExecutionRequest::new("print('second' * 3)").with_timeout_ms(5000));
        let (first, second) = (first.join().await.unwrap(), second.join().await.unwrap());
        assert_eq!(first.stdout, "firstfirstfirst\n");
        assert_eq!(second.stdout, "secondsecondsecond\n");
    }
}
