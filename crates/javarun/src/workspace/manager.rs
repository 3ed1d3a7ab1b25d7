//! Workspace lifecycle management
//!
//! Manages creation, use, and cleanup of run directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::WorkspaceConfig;
use crate::workspace::WorkspaceError;

/// A directory in which one run writes, compiles and executes its program
///
/// Isolated workspaces are private subdirectories that are removed by
/// [`cleanup()`](Self::cleanup). Shared workspaces are the configured root
/// itself and are never removed; only the files a run names are deleted.
///
/// # Cleanup
///
/// **Important:** Always call [`cleanup()`](Self::cleanup) explicitly before
/// dropping an isolated workspace. The `Drop` implementation falls back to a
/// blocking removal and logs a warning.
#[derive(Debug)]
pub struct Workspace {
    /// Directory holding the run's files
    dir: PathBuf,

    /// Whether the directory belongs to this workspace alone
    isolated: bool,

    /// Whether the directory still needs removing
    active: bool,

    /// Pool permit (if acquired from a pool)
    _permit: Option<OwnedSemaphorePermit>,
}

impl Workspace {
    /// Create a workspace according to the configured layout
    #[instrument(skip(config), fields(root = %config.root.display()))]
    pub async fn create(config: &WorkspaceConfig) -> Result<Self, WorkspaceError> {
        let dir = if config.isolate_requests {
            config.root.join(format!("javarun-{}", Uuid::new_v4()))
        } else {
            config.root.clone()
        };

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| WorkspaceError::CreateFailed {
                path: dir.clone(),
                source,
            })?;

        debug!(?dir, isolated = config.isolate_requests, "workspace ready");

        Ok(Self {
            dir,
            isolated: config.isolate_requests,
            active: true,
            _permit: None,
        })
    }

    /// Get the path to the workspace directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Whether this workspace is a private per-run directory
    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    /// Get the path to a file inside the workspace
    ///
    /// Returns an error if the name would escape the workspace.
    pub fn file_path(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        if name.is_empty() || name.contains("..") || name.starts_with('/') {
            return Err(WorkspaceError::InvalidPath(format!(
                "path traversal not allowed: {}",
                name
            )));
        }
        Ok(self.dir.join(name))
    }

    /// Write a file into the workspace
    #[instrument(skip(self, content))]
    pub async fn write_file(&self, name: &str, content: &[u8]) -> Result<(), WorkspaceError> {
        let path = self.file_path(name)?;
        tokio::fs::write(&path, content).await?;
        debug!(?path, len = content.len(), "wrote file to workspace");
        Ok(())
    }

    /// Check if a file exists in the workspace
    pub async fn file_exists(&self, name: &str) -> Result<bool, WorkspaceError> {
        let path = self.file_path(name)?;
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }

    /// Remove the named files, logging failures instead of returning them
    ///
    /// Returns the number of files actually removed.
    #[instrument(skip(self))]
    pub async fn remove_files(&self, names: &[String]) -> usize {
        let mut removed = 0;
        for name in names {
            let path = match self.file_path(name) {
                Ok(path) => path,
                Err(e) => {
                    warn!(name, error = %e, "refusing to remove file");
                    continue;
                }
            };
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "cleanup error"),
            }
        }
        debug!(removed, "temporary files cleaned up");
        removed
    }

    /// Release the workspace
    ///
    /// Isolated workspaces are removed from disk along with everything in
    /// them. Shared workspaces are left as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory could not be removed.
    #[must_use = "cleanup errors should be handled"]
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn cleanup(&mut self) -> Result<(), WorkspaceError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        if !self.isolated {
            return Ok(());
        }

        tokio::fs::remove_dir_all(&self.dir)
            .await
            .map_err(|source| WorkspaceError::CleanupFailed {
                path: self.dir.clone(),
                source,
            })?;

        debug!("workspace removed");
        Ok(())
    }

    /// Attach a pool permit to this workspace
    pub(crate) fn with_permit(mut self, permit: OwnedSemaphorePermit) -> Self {
        self._permit = Some(permit);
        self
    }

    /// Check if the workspace has not been cleaned up yet
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.active && self.isolated {
            warn!(
                dir = %self.dir.display(),
                "Workspace dropped without explicit cleanup! \
                 Call cleanup() before dropping. Removing it synchronously."
            );
            if let Err(e) = std::fs::remove_dir_all(&self.dir) {
                warn!(dir = %self.dir.display(), error = %e, "best-effort cleanup failed");
            }
        }
    }
}

/// Pool of workspaces bounding concurrent runs
#[derive(Debug)]
pub struct WorkspacePool {
    /// Layout for the workspaces handed out
    config: WorkspaceConfig,

    /// Number of runs allowed at once
    capacity: usize,

    /// Semaphore to limit concurrent runs
    semaphore: Arc<Semaphore>,
}

impl WorkspacePool {
    /// Create a new workspace pool
    pub fn new(config: WorkspaceConfig, capacity: usize) -> Self {
        Self {
            config,
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Acquire a workspace, waiting while the pool is at capacity
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<Workspace, WorkspaceError> {
        // Wait for a permit
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| WorkspaceError::PoolClosed)?;

        debug!(available = self.semaphore.available_permits(), "acquired run slot");

        let workspace = Workspace::create(&self.config).await?;

        Ok(workspace.with_permit(permit))
    }

    /// Get the number of free run slots
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Get the total number of run slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Layout used for new workspaces
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }
}
