//! Integration tests for javarun
//!
//! These tests need `javac` and `java` on PATH.
//! Run with: cargo test -p javarun --features integration-tests

#![cfg(feature = "integration-tests")]

use std::fs;

use javarun::{Config, Runner};
use tempfile::TempDir;

mod compilation;
mod compile_and_run;
mod config_loading;
mod http_endpoint;

const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Helper to get fixture file content
pub(crate) fn fixture_source(name: &str) -> String {
    let path = format!("{FIXTURES_PATH}/sources/{name}");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {path}: {e}"))
}

/// Default config with its workspace root moved into a fresh temp dir
pub(crate) fn test_config() -> (Config, TempDir) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.workspace.root = root.path().to_path_buf();
    (config, root)
}

pub(crate) fn test_runner() -> (Runner, TempDir) {
    let (config, root) = test_config();
    (Runner::new(config), root)
}
