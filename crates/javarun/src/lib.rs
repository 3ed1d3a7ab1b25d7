//! A library for compiling and running Java code over HTTP.
//!
//! Javarun takes a Java program (or a bare statement fragment), writes it to
//! a working directory, compiles it with `javac`, runs it with `java` and
//! reports what it printed. The same pipeline is exposed as an async Rust
//! API ([`Runner`]) and as a single HTTP endpoint ([`server`]).
//!
//! # Features
//!
//! - **Class inference** — The class to compile and run is taken from the first `public class` declaration.
//! - **Fragment wrapping** — Code without a public class is wrapped in a `Main` class with a `main` method.
//! - **Workspace isolation** — Each run gets its own directory, removed once the run is over.
//! - **Limits** — Wall time and output size caps for both compiling and running.
//! - **Layered configuration** — Embedded defaults, a TOML file, then `JAVARUN_*` environment variables.

pub use config::{Config, ConfigError, EXAMPLE_CONFIG, WorkspaceConfig};
pub use runner::{CompileError, CompileResult, ExecuteError, RunError, RunOutcome, Runner};
pub use server::{ApiError, ServerError, build_router, serve, serve_with_shutdown};
pub use source::{DEFAULT_CLASS_NAME, Program, infer_class_name};
pub use types::{ExecutionResult, ExecutionStatus, ResourceLimits};
pub use workspace::{Workspace, WorkspaceError, WorkspacePool};

pub mod config;
pub mod runner;
pub mod server;
pub mod source;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod test_support;
