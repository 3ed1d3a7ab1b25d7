use javarun::{CompileError, Program};

use super::{fixture_source, test_runner};

#[tokio::test]
async fn test_compile_success() {
    let (runner, _root) = test_runner();
    let mut workspace = runner.pool().acquire().await.expect("Failed to acquire workspace");

    let program = Program::from_code(&fixture_source("Hello.java"));
    let result = runner
        .compile(&workspace, &program)
        .await
        .expect("Compilation failed");

    assert!(result.execution.is_success());
    assert!(workspace.file_exists("Hello.class").await.unwrap());

    workspace.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
async fn test_compile_error() {
    let (runner, _root) = test_runner();
    let mut workspace = runner.pool().acquire().await.expect("Failed to acquire workspace");

    let program = Program::from_code(&fixture_source("compile_error.java"));
    let result = runner.compile(&workspace, &program).await;

    match result {
        Err(CompileError::Failed { exit_code, output }) => {
            assert_ne!(exit_code, Some(0));
            assert!(output.contains("Broken.java"), "unexpected output: {output}");
        }
        other => panic!("expected compile failure, got {other:?}"),
    }
    assert!(!workspace.file_exists("Broken.class").await.unwrap());

    workspace.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
async fn test_compile_wrapped_fragment() {
    let (runner, _root) = test_runner();
    let mut workspace = runner.pool().acquire().await.expect("Failed to acquire workspace");

    let program = Program::from_code(&fixture_source("fragment.txt"));
    assert!(program.is_wrapped());

    runner
        .compile(&workspace, &program)
        .await
        .expect("Compilation failed");

    assert!(workspace.file_exists("Main.java").await.unwrap());
    assert!(workspace.file_exists("Main.class").await.unwrap());

    workspace.cleanup().await.expect("Failed to cleanup");
}

#[tokio::test]
async fn test_compile_writes_helper_classes() {
    let (runner, _root) = test_runner();
    let mut workspace = runner.pool().acquire().await.expect("Failed to acquire workspace");

    let program = Program::from_code(&fixture_source("Greeter.java"));
    assert_eq!(program.class_name(), "Greeter");

    runner
        .compile(&workspace, &program)
        .await
        .expect("Compilation failed");

    assert!(workspace.file_exists("Greeter.class").await.unwrap());
    assert!(workspace.file_exists("Helper.class").await.unwrap());

    workspace.cleanup().await.expect("Failed to cleanup");
}
