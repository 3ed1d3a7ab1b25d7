//! Code runner for javarun
//!
//! Provides the compile → verify → execute → cleanup pipeline behind the
//! HTTP endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub use crate::runner::compile::{CompileResult, compile};
pub use crate::runner::execute::execute;

mod compile;
mod execute;

use crate::{
    config::Config,
    source::Program,
    types::ExecutionResult,
    workspace::{Workspace, WorkspaceError, WorkspacePool},
};

/// Errors that occur during compilation
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("compilation failed with exit code {exit_code:?}: {output}")]
    Failed {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("compilation timed out after {seconds}s")]
    Timeout { seconds: f64 },

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
}

/// Errors that occur during execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("Compiled class file not found at {}", .0.display())]
    ClassNotFound(PathBuf),

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
}

/// Errors from a full run
///
/// Compile and execute failures carry the generated source so callers can
/// show what was actually compiled.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Missing Java code in request body")]
    MissingCode,

    #[error("compilation error: {error}")]
    Compile {
        #[source]
        error: CompileError,
        program: String,
    },

    #[error("execution error: {error}")]
    Execute {
        #[source]
        error: ExecuteError,
        program: String,
    },

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
}

/// Outcome of a run that got as far as executing the program
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub program: Program,
    pub execution: ExecutionResult,
}

impl RunOutcome {
    /// The program's standard output
    pub fn output(&self) -> String {
        self.execution.stdout_lossy()
    }

    /// The program's standard error, followed by any runner diagnostic
    pub fn error(&self) -> String {
        let mut error = self.execution.stderr_lossy();
        if let Some(ref message) = self.execution.message {
            if !error.is_empty() && !error.ends_with('\n') {
                error.push('\n');
            }
            error.push_str(message);
        }
        error
    }
}

/// High-level runner for Java code
#[derive(Debug, Clone)]
pub struct Runner {
    config: Arc<Config>,
    pool: Arc<WorkspacePool>,
}

impl Runner {
    /// Create a new runner with the given configuration
    pub fn new(config: Config) -> Self {
        let pool = WorkspacePool::new(config.workspace.clone(), config.max_concurrent_runs);
        Self {
            config: Arc::new(config),
            pool: Arc::new(pool),
        }
    }

    /// Create a new runner with default configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the workspace pool
    pub fn pool(&self) -> &WorkspacePool {
        &self.pool
    }

    /// Compile a program in the given workspace
    pub async fn compile(
        &self,
        workspace: &Workspace,
        program: &Program,
    ) -> Result<CompileResult, CompileError> {
        compile::compile(workspace, &self.config, program).await
    }

    /// Execute an already compiled program
    pub async fn execute(
        &self,
        workspace: &Workspace,
        program: &Program,
    ) -> Result<ExecutionResult, ExecuteError> {
        execute::execute(workspace, &self.config, program).await
    }

    /// Compile and run user code in one step
    ///
    /// # Errors
    ///
    /// Returns [`RunError::MissingCode`] for empty code,
    /// [`RunError::Compile`] if compilation fails, and
    /// [`RunError::Execute`] if the program could not be started. A program
    /// that runs and exits non-zero is a successful outcome.
    #[instrument(skip_all)]
    pub async fn run(&self, code: &str) -> Result<RunOutcome, RunError> {
        if code.is_empty() {
            return Err(RunError::MissingCode);
        }

        debug!(code, "user code received");

        let program = Program::from_code(code);
        info!(
            class = program.class_name(),
            wrapped = program.is_wrapped(),
            "detected class name"
        );
        debug!(source = program.source(), "final Java code");

        let mut workspace = self.pool.acquire().await?;
        let result = self.run_in(&workspace, &program).await;

        if let Err(e) = workspace.cleanup().await {
            warn!(error = %e, "failed to remove workspace");
        }

        let execution = result?;
        info!(
            status = ?execution.status,
            exit_code = ?execution.exit_code,
            "run complete"
        );

        Ok(RunOutcome { program, execution })
    }

    async fn run_in(
        &self,
        workspace: &Workspace,
        program: &Program,
    ) -> Result<ExecutionResult, RunError> {
        let compiled = self
            .compile(workspace, program)
            .await
            .map_err(|error| RunError::Compile {
                error,
                program: program.source().to_owned(),
            })?;
        if !compiled.output.is_empty() {
            info!(output = %compiled.output, "compiler warnings");
        }

        let execution = self
            .execute(workspace, program)
            .await
            .map_err(|error| RunError::Execute {
                error,
                program: program.source().to_owned(),
            })?;

        // Artifacts are only removed once the program has run
        workspace
            .remove_files(&[program.source_file_name(), program.class_file_name()])
            .await;

        Ok(execution)
    }
}
