//! Configuration file loading for javarun
//!
//! Handles loading and parsing configuration files using the config crate.
//! Sources are layered: embedded defaults, then an optional file, then
//! `JAVARUN_*` environment variables.

use std::path::Path;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};

use crate::config::{Config, ConfigError, ENV_PREFIX, EXAMPLE_CONFIG};
use crate::server::HEALTH_PATH;
use crate::types::ResourceLimits;

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load the layered configuration: embedded defaults, optional file, environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(File::from_str(EXAMPLE_CONFIG, FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder.add_source(env).build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.toolchain.compile.command.is_empty() {
            return Err(ConfigError::Invalid("compile command is empty".to_owned()));
        }
        if self.toolchain.run.command.is_empty() {
            return Err(ConfigError::Invalid("run command is empty".to_owned()));
        }
        if self.max_concurrent_runs == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_runs must be at least 1".to_owned(),
            ));
        }
        if !self.server.path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server path '{}' must start with '/'",
                self.server.path
            )));
        }
        if self.server.path == HEALTH_PATH {
            return Err(ConfigError::Invalid(format!(
                "server path '{HEALTH_PATH}' is reserved for the health check"
            )));
        }
        if self.workspace.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("workspace root is empty".to_owned()));
        }

        validate_limits("default_limits", Some(&self.default_limits))?;
        validate_limits("toolchain.compile.limits", self.toolchain.compile.limits.as_ref())?;
        validate_limits("toolchain.run.limits", self.toolchain.run.limits.as_ref())?;

        Ok(())
    }
}

fn validate_limits(section: &str, limits: Option<&ResourceLimits>) -> Result<(), ConfigError> {
    if let Some(limits) = limits
        && let Err(e) = limits.wall_time()
    {
        return Err(ConfigError::Invalid(format!(
            "{section}.wall_time_limit must be a non-negative number of seconds (0 for none): {e}"
        )));
    }
    Ok(())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
