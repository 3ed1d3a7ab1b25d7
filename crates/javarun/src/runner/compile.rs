//! Compilation step
//!
//! Writes the generated source into the workspace and runs the compiler on it.

use tracing::{debug, instrument};

use crate::config::{Config, Toolchain};
use crate::runner::CompileError;
use crate::source::Program;
use crate::types::{ExecutionResult, ExecutionStatus, ResourceLimits};
use crate::workspace::{ProcessCommand, Workspace, run_process};

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Execution result from the compiler process
    pub execution: ExecutionResult,

    /// Compiler output (warnings, notes)
    pub output: String,
}

/// Default compilation limits
fn default_compile_limits() -> ResourceLimits {
    ResourceLimits {
        wall_time_limit: Some(60.0),         // 60 seconds wall time
        max_output: Some(64 * ResourceLimits::MB), // 64 MB output
    }
}

/// Compile a program in a workspace
#[instrument(skip(workspace, config, program), fields(class = program.class_name()))]
pub async fn compile(
    workspace: &Workspace,
    config: &Config,
    program: &Program,
) -> Result<CompileResult, CompileError> {
    let compile_config = &config.toolchain.compile;

    // Write source file to workspace
    let source_name = program.source_file_name();
    workspace
        .write_file(&source_name, program.source().as_bytes())
        .await?;
    let source_path = workspace.file_path(&source_name)?;

    debug!(source = %source_path.display(), "wrote Java file");

    let limits = match compile_config.limits {
        Some(ref lang) => default_compile_limits().with_overrides(lang),
        None => default_compile_limits(),
    };
    let wall_time_limit = limits.wall_time_limit;

    let argv = Toolchain::expand_command(
        &compile_config.command,
        &source_path.to_string_lossy(),
        program.class_name(),
        &workspace.path().to_string_lossy(),
    );

    let command = ProcessCommand::new(argv)?
        .envs(&compile_config.env)
        .working_dir(workspace.path())
        .limits(limits);

    let result = run_process(command).await?;

    debug!(
        stdout = %result.stdout_lossy(),
        stderr = %result.stderr_lossy(),
        exit_code = ?result.exit_code,
        "compilation complete"
    );

    if result.status == ExecutionStatus::TimeLimitExceeded {
        return Err(CompileError::Timeout {
            seconds: wall_time_limit.unwrap_or_default(),
        });
    }

    let output = compiler_output(&result);
    if !result.is_success() {
        return Err(CompileError::Failed {
            exit_code: result.exit_code,
            output,
        });
    }

    Ok(CompileResult {
        execution: result,
        output,
    })
}

/// Diagnostics to report for a compiler run: stderr, else stdout, else a fixed message
fn compiler_output(result: &ExecutionResult) -> String {
    let stderr = result.stderr_lossy();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = result.stdout_lossy();
    if !stdout.is_empty() {
        return stdout;
    }
    if result.is_success() {
        String::new()
    } else {
        "Compilation failed".to_owned()
    }
}
