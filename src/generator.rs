//! External text generation.
//!
//! The server only depends on the [`Generator`] trait; [`CliGenerator`] is the production
//! implementation that runs `<program> -p <prompt>` as a child process.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Default wait bound for one generation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default generation program.
pub const DEFAULT_PROGRAM: &str = "claude";

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The program ran and exited unsuccessfully.
    #[error("{program} CLI error: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The program did not finish within the time bound and was killed.
    #[error("{program} timed out after {timeout_secs}s")]
    Timeout { program: String, timeout_secs: u64 },

    /// The program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Anything else (I/O while collecting output, ...).
    #[error("{0}")]
    Other(String),
}

/// Turns a prompt into generated text.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Runs a local command-line generator: `<program> -p <prompt>`.
///
/// Stdout (trimmed) is the generated text, stderr is kept for error reporting.
/// The child is killed if the timeout elapses.
#[derive(Debug, Clone)]
pub struct CliGenerator {
    program: PathBuf,
    timeout: Duration,
}

impl CliGenerator {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl Default for CliGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Generator for CliGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let program = self.program_name();

        let child = Command::new(&self.program)
            .arg("-p")
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GenerateError::Spawn {
                program: program.clone(),
                source,
            })?;

        debug!(program = %program, pid = ?child.id(), "generator started");

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(GenerateError::Other(e.to_string())),
            Err(_) => {
                return Err(GenerateError::Timeout {
                    program,
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        };

        if !output.status.success() {
            return Err(GenerateError::Failed {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
