use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::server::{CorsConfig, CorsProfile, ServerConfig};
pub use crate::config::toolchain::{CommandConfig, Toolchain};
use crate::types::ResourceLimits;

mod loader;
pub mod server;
pub mod toolchain;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../javarun.example.toml");

/// Prefix for environment variable overrides (`JAVARUN_SERVER__BIND`, ...)
pub const ENV_PREFIX: &str = "JAVARUN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for javarun
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Maximum number of compile/run pipelines in flight at once
    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: usize,

    /// Where source files and classes are written
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Limits applied when running the user's program.
    /// The toolchain's run limits take precedence over these.
    #[serde(default)]
    pub default_limits: ResourceLimits,

    #[serde(default)]
    pub toolchain: Toolchain,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cors: CorsConfig,
}

/// Working directory layout for runs
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory under which sources and classes are written
    #[serde(default = "default_workspace_root")]
    pub root: PathBuf,

    /// Give every run its own subdirectory of `root`.
    ///
    /// When disabled, all runs share `root` and artifacts are keyed only by
    /// the inferred class name, so concurrent runs of the same class race.
    #[serde(default = "default_isolate_requests")]
    pub isolate_requests: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
            isolate_requests: default_isolate_requests(),
        }
    }
}

impl Config {
    /// Create a new config from the embedded defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Run limits after merging the toolchain's own limits over the defaults
    pub fn run_limits(&self) -> ResourceLimits {
        match self.toolchain.run.limits {
            Some(ref limits) => self.default_limits.with_overrides(limits),
            None => self.default_limits.clone(),
        }
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        self.server.bind
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}

fn default_max_concurrent_runs() -> usize {
    4
}

fn default_workspace_root() -> PathBuf {
    std::env::temp_dir()
}

fn default_isolate_requests() -> bool {
    true
}
