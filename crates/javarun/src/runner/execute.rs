//! Execution step
//!
//! Runs the compiled class with the configured runtime.

use tracing::{debug, error, instrument};

use crate::config::{Config, Toolchain};
use crate::runner::ExecuteError;
use crate::source::Program;
use crate::types::ExecutionResult;
use crate::workspace::{ProcessCommand, Workspace, run_process};

/// Execute a compiled program in a workspace
///
/// The program's own exit status is part of the result; only failures to
/// start it are errors.
#[instrument(skip(workspace, config, program), fields(class = program.class_name()))]
pub async fn execute(
    workspace: &Workspace,
    config: &Config,
    program: &Program,
) -> Result<ExecutionResult, ExecuteError> {
    let run_config = &config.toolchain.run;

    // Check the compiler left the expected class behind
    let class_file = program.class_file_name();
    if !workspace.file_exists(&class_file).await? {
        let path = workspace.file_path(&class_file)?;
        error!(path = %path.display(), "class file not found");
        return Err(ExecuteError::ClassNotFound(path));
    }

    let source_path = workspace.file_path(&program.source_file_name())?;
    let argv = Toolchain::expand_command(
        &run_config.command,
        &source_path.to_string_lossy(),
        program.class_name(),
        &workspace.path().to_string_lossy(),
    );

    debug!(?argv, "executing program");

    let command = ProcessCommand::new(argv)?
        .envs(&run_config.env)
        .working_dir(workspace.path())
        .limits(config.run_limits());

    let result = run_process(command).await?;

    debug!(
        stdout = %result.stdout_lossy(),
        stderr = %result.stderr_lossy(),
        status = ?result.status,
        exit_code = ?result.exit_code,
        wall_time = result.wall_time,
        "execution complete"
    );

    Ok(result)
}
