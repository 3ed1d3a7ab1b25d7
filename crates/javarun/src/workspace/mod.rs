//! Working directories and child processes
//!
//! A [`Workspace`] is the directory a single run writes its source into,
//! compiles in and executes from. Workspaces are handed out by a
//! [`WorkspacePool`], which also bounds how many runs are in flight.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::workspace::manager::{Workspace, WorkspacePool};
pub use crate::workspace::process::{ProcessCommand, run_process};

mod manager;
mod process;

/// Errors that occur while preparing a workspace or running a process in it
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace at {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove workspace at {path}: {source}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("workspace pool is closed")]
    PoolClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
