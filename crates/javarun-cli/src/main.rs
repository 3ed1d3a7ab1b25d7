//! Javarun CLI
//!
//! Serves the compile-and-run endpoint, or runs a single snippet locally.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use javarun::{Config, EXAMPLE_CONFIG, ResourceLimits, RunError, Runner};
use tokio::io::AsyncReadExt;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "javarun")]
#[command(about = "Compile and run Java code over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Path of the run endpoint (overrides the config file)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Compile and run a Java file or fragment
    Run {
        /// Source file, or `-` for stdin
        #[arg(value_name = "FILE", default_value = "-")]
        source: PathBuf,

        /// Wall time limit in seconds (0 for none)
        #[arg(short, long)]
        time_limit: Option<f64>,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path (default: javarun.toml)
        #[arg(short, long, default_value = "javarun.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { output, force } => init_config(&output, force).await,
        Commands::Serve { bind, path } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(path) = path {
                anyhow::ensure!(path.starts_with('/'), "endpoint path must start with '/'");
                config.server.path = path;
            }
            javarun::serve(Runner::new(config))
                .await
                .context("server failed")
        }
        Commands::Run { source, time_limit } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(seconds) = time_limit {
                ResourceLimits::unbounded()
                    .with_wall_time_limit(seconds)
                    .wall_time()
                    .context("time limit must be a non-negative number of seconds")?;
                config.default_limits.wall_time_limit = Some(seconds);
                if let Some(ref mut limits) = config.toolchain.run.limits {
                    limits.wall_time_limit = Some(seconds);
                }
            }
            run_source(config, &source).await
        }
        Commands::ShowConfig => {
            show_config(&load_config(cli.config.as_deref())?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => info!(?path, "loading configuration"),
        None => debug!("using default configuration"),
    }
    Config::load(path).context("failed to load configuration")
}

async fn read_source(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut code = String::new();
        tokio::io::stdin()
            .read_to_string(&mut code)
            .await
            .context("failed to read code from stdin")?;
        Ok(code)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read source file '{}'", source.display()))
    }
}

async fn run_source(config: Config, source: &Path) -> Result<()> {
    let code = read_source(source).await?;
    let runner = Runner::new(config);

    let outcome = match runner.run(&code).await {
        Ok(outcome) => outcome,
        Err(RunError::Compile { error, program }) => {
            eprintln!("Compilation failed:");
            eprintln!("{error}");
            debug!(%program, "generated source");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("run failed"),
    };

    print!("{}", outcome.output());
    let error = outcome.error();
    if !error.is_empty() {
        eprintln!("{error}");
    }

    // Keep stdout clean for piping
    info!(
        status = ?outcome.execution.status,
        wall_time = format_args!("{:.3}s", outcome.execution.wall_time),
        exit_code = outcome.execution.exit_code,
        signal = outcome.execution.signal,
        "execution result"
    );

    if outcome.execution.is_success() {
        Ok(())
    } else {
        std::process::exit(outcome.execution.exit_code.unwrap_or(1));
    }
}

fn show_config(config: &Config) {
    println!("Server:");
    println!("  Bind: {}", config.server.bind);
    println!("  Path: {}", config.server.path);
    println!();
    println!("Workspace:");
    println!("  Root: {}", config.workspace.root.display());
    println!("  Isolate requests: {}", config.workspace.isolate_requests);
    println!("  Max concurrent runs: {}", config.max_concurrent_runs);
    println!();
    let limits = config.run_limits();
    println!("Run limits:");
    println!("  Wall time limit: {:?}", limits.wall_time_limit);
    println!("  Max output: {:?} KB", limits.max_output);
    println!();
    println!("Compile command: {}", config.toolchain.compile.command.join(" "));
    println!("Run command: {}", config.toolchain.run.command.join(" "));
}

async fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at '{}'. Use --force to overwrite.",
            output.display()
        );
    }

    tokio::fs::write(output, EXAMPLE_CONFIG)
        .await
        .context("failed to write configuration file")?;

    println!("Created configuration file at '{}'", output.display());
    Ok(())
}
