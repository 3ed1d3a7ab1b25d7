//! Process spawning and I/O
//!
//! Runs the compiler and the user's program as child processes, capturing
//! their output and enforcing the wall time and output limits.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::types::{ExecutionResult, ExecutionStatus, ResourceLimits};
use crate::workspace::WorkspaceError;

/// A fully expanded command line plus the environment it runs in
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    working_dir: Option<PathBuf>,
    limits: ResourceLimits,
}

impl ProcessCommand {
    /// Create a command from an argument vector (program first)
    pub fn new(argv: Vec<String>) -> Result<Self, WorkspaceError> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| WorkspaceError::CommandFailed("empty command arguments".to_string()))?;

        Ok(Self {
            program,
            args: argv.collect(),
            env: Vec::new(),
            working_dir: None,
            limits: ResourceLimits::unbounded(),
        })
    }

    /// Add an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Add several environment variables
    pub fn envs<'a>(mut self, vars: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set the working directory
    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set resource limits
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    truncated: bool,
}

/// Run a command to completion and capture its output.
///
/// A non-zero exit is reported in the result, not as an error. When the wall
/// time limit expires the child is killed and whatever it printed so far is
/// kept.
#[instrument(skip(command), fields(program = %command.program))]
pub async fn run_process(command: ProcessCommand) -> Result<ExecutionResult, WorkspaceError> {
    let time_limit = command.limits.wall_time().map_err(|e| {
        WorkspaceError::InvalidLimit(format!(
            "wall_time_limit {:?}: {e}",
            command.limits.wall_time_limit
        ))
    })?;

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(ref dir) = command.working_dir {
        cmd.current_dir(dir);
    }

    debug!(args = ?command.args, "spawning process");

    let start = Instant::now();
    let mut child = cmd.spawn().map_err(|source| WorkspaceError::SpawnFailed {
        program: command.program.clone(),
        source,
    })?;

    let cap = command.limits.max_output_bytes();
    let stdout = child
        .stdout
        .take()
        .map(|pipe| tokio::spawn(read_capped(pipe, cap)));
    let stderr = child
        .stderr
        .take()
        .map(|pipe| tokio::spawn(read_capped(pipe, cap)));

    let timed_out = match time_limit {
        Some(limit) => {
            match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => {
                    status?;
                    false
                }
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "failed to kill process after timeout");
                    }
                    true
                }
            }
        }
        None => {
            child.wait().await?;
            false
        }
    };
    let status = child.wait().await?;
    let wall_time = start.elapsed().as_secs_f64();

    let stdout = collect(stdout).await?;
    let stderr = collect(stderr).await?;

    let exit_code = status.code();
    let signal = exit_signal(&status);
    let output_truncated = stdout.truncated || stderr.truncated;

    let mut notes = Vec::new();
    if timed_out && let Some(seconds) = command.limits.wall_time_limit {
        notes.push(format!("wall time limit exceeded ({seconds}s)"));
    }
    if output_truncated && let Some(kb) = command.limits.max_output.filter(|&kb| kb != 0) {
        notes.push(format!("output truncated at {kb} KB"));
    }

    let result = ExecutionResult {
        status: ExecutionStatus::classify(exit_code, timed_out),
        wall_time,
        exit_code,
        signal,
        message: (!notes.is_empty()).then(|| notes.join("; ")),
        stdout: stdout.bytes,
        stderr: stderr.bytes,
        output_truncated,
    };

    debug!(
        status = ?result.status,
        exit_code = ?result.exit_code,
        wall_time = result.wall_time,
        "process finished"
    );

    Ok(result)
}

/// Read a pipe to EOF, keeping at most `cap` bytes.
///
/// The pipe is drained past the cap so the child never blocks on a full pipe.
async fn read_capped<R>(mut reader: R, cap: Option<usize>) -> io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Captured::default();
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let room = match cap {
            Some(cap) => cap.saturating_sub(captured.bytes.len()).min(n),
            None => n,
        };
        captured.bytes.extend_from_slice(&buf[..room]);
        if room < n {
            captured.truncated = true;
        }
    }
    Ok(captured)
}

async fn collect(handle: Option<JoinHandle<io::Result<Captured>>>) -> Result<Captured, WorkspaceError> {
    match handle {
        Some(handle) => {
            let captured = handle.await.map_err(io::Error::other)??;
            Ok(captured)
        }
        None => Ok(Captured::default()),
    }
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}
