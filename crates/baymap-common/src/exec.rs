//! External tool invocation for the baymap utilities.
//!
//! Commands are spawned directly from a program path and an argument
//! vector; nothing is routed through a shell, so arguments reach the tool
//! byte-for-byte and no quoting layer exists to get wrong. Paths and
//! arguments containing whitespace need no special handling.
//!
//! # Example
//!
//! ```ignore
//! use baymap_common::exec;
//!
//! let report = exec::run(Path::new("/usr/bin/storcli64"), &["show"], None).await?;
//! if report.success() {
//!     println!("{}", report.stdout);
//! }
//! ```

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// Errors raised while spawning or supervising an external tool.
///
/// A tool that runs to completion with a non-zero exit status is *not* an
/// error at this layer; callers inspect [`ExecResult::success`] and decide.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The executable does not exist at the given path.
    #[error("executable '{program}' not found")]
    NotFound {
        /// The program that could not be located.
        program: String,
    },

    /// The process could not be spawned for a reason other than absence.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The process did not finish within the configured bound.
    #[error("'{program}' did not finish within {timeout:?}")]
    Timeout {
        /// The program that overran.
        program: String,
        /// The bound that was exceeded.
        timeout: Duration,
    },
}

/// Captured outcome of a completed tool invocation.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// Decoded stdout, trimmed.
    pub stdout: String,
    /// Decoded stderr, trimmed.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Runs `program` with `args`, capturing stdout and stderr.
///
/// With `timeout = Some(d)` the invocation is abandoned after `d` and
/// [`ExecError::Timeout`] is returned; `None` waits indefinitely, which is
/// the baseline behavior for the slow hardware-inventory query.
pub async fn run(
    program: &Path,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<ExecResult, ExecError> {
    tracing::debug!(program = %program.display(), ?args, "executing external tool");

    // kill_on_drop reaps the child if the timeout abandons the wait.
    let future = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match timeout {
        Some(bound) => match tokio::time::timeout(bound, future).await {
            Ok(output) => output,
            Err(_) => {
                return Err(ExecError::Timeout {
                    program: program.display().to_string(),
                    timeout: bound,
                })
            }
        },
        None => future.await,
    };

    let output = output.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ExecError::NotFound {
                program: program.display().to_string(),
            }
        } else {
            ExecError::Spawn {
                program: program.display().to_string(),
                source: e,
            }
        }
    })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(program = %program.display(), exit_code, "tool succeeded");
    } else {
        tracing::warn!(
            program = %program.display(),
            exit_code,
            stderr = %result.stderr,
            "tool failed"
        );
    }

    Ok(result)
}
