use javarun::{CompileError, ExecutionStatus, RunError, Runner};

use super::{fixture_source, test_config, test_runner};

#[tokio::test]
async fn test_run_hello_world() {
    let (runner, _root) = test_runner();

    let outcome = runner
        .run(&fixture_source("Hello.java"))
        .await
        .expect("Run failed");

    assert_eq!(outcome.program.class_name(), "Hello");
    assert!(!outcome.program.is_wrapped());
    assert_eq!(outcome.execution.status, ExecutionStatus::Ok);
    assert_eq!(outcome.output(), "Hello, World!\n");
    assert_eq!(outcome.error(), "");
}

#[tokio::test]
async fn test_run_fragment() {
    let (runner, _root) = test_runner();

    let outcome = runner
        .run(&fixture_source("fragment.txt"))
        .await
        .expect("Run failed");

    assert_eq!(outcome.program.class_name(), "Main");
    assert_eq!(outcome.output(), "sum=55\n");
}

#[tokio::test]
async fn test_run_single_statement() {
    let (runner, _root) = test_runner();

    let outcome = runner
        .run("System.out.println(1+1);")
        .await
        .expect("Run failed");

    assert_eq!(outcome.output(), "2\n");
    assert_eq!(outcome.error(), "");
}

#[tokio::test]
async fn test_run_captures_stderr() {
    let (runner, _root) = test_runner();

    let outcome = runner
        .run(&fixture_source("Greeter.java"))
        .await
        .expect("Run failed");

    assert_eq!(outcome.output(), "Hi, javarun\n");
    assert_eq!(outcome.error(), "done\n");
}

#[tokio::test]
async fn test_run_runtime_error_is_an_outcome() {
    let (runner, _root) = test_runner();

    let outcome = runner
        .run(&fixture_source("runtime_error.java"))
        .await
        .expect("Run failed");

    assert_eq!(outcome.execution.status, ExecutionStatus::RuntimeError);
    assert_eq!(outcome.execution.exit_code, Some(1));
    assert_eq!(outcome.output(), "before\n");
    assert!(outcome.error().contains("IllegalStateException: boom"));
}

#[tokio::test]
async fn test_run_compile_error() {
    let (runner, _root) = test_runner();

    let result = runner.run(&fixture_source("compile_error.java")).await;

    match result {
        Err(RunError::Compile {
            error: CompileError::Failed { output, .. },
            program,
        }) => {
            assert!(output.contains("error"));
            assert!(program.contains("public class Broken"));
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_run_wall_time_limit() {
    let (mut config, _root) = test_config();
    config.default_limits.wall_time_limit = Some(2.0);
    let runner = Runner::new(config);

    let outcome = runner
        .run(&fixture_source("infinite_loop.java"))
        .await
        .expect("Run failed");

    assert_eq!(outcome.execution.status, ExecutionStatus::TimeLimitExceeded);
    assert!(outcome.execution.wall_time < 10.0);
    assert!(outcome.error().contains("wall time limit exceeded"));
}

#[tokio::test]
async fn test_run_removes_workspaces() {
    let (runner, root) = test_runner();

    runner
        .run(&fixture_source("Hello.java"))
        .await
        .expect("Run failed");
    let _ = runner.run(&fixture_source("compile_error.java")).await;

    let leftovers: Vec<_> = std::fs::read_dir(root.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "leftover entries: {leftovers:?}");
}

#[tokio::test]
async fn test_concurrent_runs_of_same_class() {
    let (runner, _root) = test_runner();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let runner = runner.clone();
            tokio::spawn(async move {
                runner
                    .run(&format!("System.out.println({i});"))
                    .await
                    .map(|outcome| outcome.output())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.await.unwrap().expect("Run failed");
        assert_eq!(output, format!("{i}\n"));
    }
}
