use std::time::{Duration, TryFromFloatSecsError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Wall clock time limit in seconds, `0` for none
    #[serde(default)]
    pub wall_time_limit: Option<f64>,

    /// Maximum captured size of each output stream in kilobytes, `0` for none
    #[serde(default)]
    pub max_output: Option<u64>,
}

impl ResourceLimits {
    /// 1 megabyte in kilobytes
    pub const MB: u64 = 1024;

    /// Limits with nothing bounded
    pub fn unbounded() -> Self {
        Self {
            wall_time_limit: None,
            max_output: None,
        }
    }

    /// Set the wall clock time limit in seconds
    pub fn with_wall_time_limit(mut self, seconds: f64) -> Self {
        self.wall_time_limit = Some(seconds);
        self
    }

    /// Set the maximum output size in kilobytes
    pub fn with_max_output(mut self, kb: u64) -> Self {
        self.max_output = Some(kb);
        self
    }

    /// Apply overrides from another ResourceLimits, preferring values from `overrides`
    pub fn with_overrides(&self, overrides: &ResourceLimits) -> ResourceLimits {
        ResourceLimits {
            wall_time_limit: overrides.wall_time_limit.or(self.wall_time_limit),
            max_output: overrides.max_output.or(self.max_output),
        }
    }

    /// Wall time limit as a [`Duration`]; `None` when unbounded
    pub fn wall_time(&self) -> Result<Option<Duration>, TryFromFloatSecsError> {
        match self.wall_time_limit {
            Some(seconds) if seconds != 0.0 => Duration::try_from_secs_f64(seconds).map(Some),
            _ => Ok(None),
        }
    }

    /// Output cap in bytes; `None` when unbounded
    pub fn max_output_bytes(&self) -> Option<usize> {
        self.max_output
            .filter(|&kb| kb != 0)
            .map(|kb| usize::try_from(kb.saturating_mul(1024)).unwrap_or(usize::MAX))
    }
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            wall_time_limit: Some(10.0),
            max_output: Some(64 * Self::MB),
        }
    }
}

/// Result of running a child process
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,

    /// Wall clock time used in seconds
    pub wall_time: f64,

    /// Exit code if the program exited normally
    pub exit_code: Option<i32>,

    /// Signal number if the program was killed by a signal
    pub signal: Option<i32>,

    /// Diagnostic produced by the runner itself (timeouts, truncation)
    pub message: Option<String>,

    pub stdout: Vec<u8>,

    pub stderr: Vec<u8>,

    /// Whether either stream was cut at the output limit
    pub output_truncated: bool,
}

impl ExecutionResult {
    /// Check if the execution was successful (exited with code 0)
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, ExecutionStatus::Ok) && self.exit_code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self {
            status: ExecutionStatus::Ok,
            wall_time: 0.0,
            exit_code: None,
            signal: None,
            message: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
            output_truncated: false,
        }
    }
}

/// Status of an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Program exited with code 0
    #[serde(rename = "OK")]
    Ok,

    /// Program exited with a non-zero code
    #[serde(rename = "RE")]
    RuntimeError,

    /// Wall time limit exceeded; the process was killed
    #[serde(rename = "TO")]
    TimeLimitExceeded,

    /// Program was killed by a signal
    #[serde(rename = "SG")]
    Signaled,
}

impl ExecutionStatus {
    /// Classify a finished process
    pub fn classify(exit_code: Option<i32>, timed_out: bool) -> Self {
        if timed_out {
            return ExecutionStatus::TimeLimitExceeded;
        }
        match exit_code {
            Some(0) => ExecutionStatus::Ok,
            Some(_) => ExecutionStatus::RuntimeError,
            None => ExecutionStatus::Signaled,
        }
    }
}
