use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ResourceLimits;

/// Compiler and runtime invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toolchain {
    #[serde(default = "default_compile")]
    pub compile: CommandConfig,

    #[serde(default = "default_run")]
    pub run: CommandConfig,
}

impl Toolchain {
    /// Expand placeholders in the given command
    ///
    /// `{source}` is the absolute path of the source file, `{class}` the
    /// class name and `{dir}` the workspace directory (the classpath).
    pub fn expand_command(command: &[String], source: &str, class: &str, dir: &str) -> Vec<String> {
        command
            .iter()
            .map(|arg| {
                arg.replace("{source}", source)
                    .replace("{class}", class)
                    .replace("{dir}", dir)
            })
            .collect()
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compile: default_compile(),
            run: default_run(),
        }
    }
}

/// One external command with its environment and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Command and arguments with placeholders
    pub command: Vec<String>,

    /// Environment variables added on top of the service's own environment
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Resource limits (override the defaults for this step)
    #[serde(default)]
    pub limits: Option<ResourceLimits>,
}

impl CommandConfig {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            env: HashMap::new(),
            limits: None,
        }
    }
}

fn default_compile() -> CommandConfig {
    CommandConfig::new(["javac", "{source}"])
}

fn default_run() -> CommandConfig {
    CommandConfig::new(["java", "-cp", "{dir}", "{class}"])
}
