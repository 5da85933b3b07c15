//! Per-request temp workspace lifecycle management.
//!
//! Every upload request stages its files in a private directory under the OS
//! temp root. The `WorkspaceRegistry` hands out uniquely named directories and
//! tracks them until they are released, so that a shutdown signal can sweep
//! away anything still on disk. Directories are destroyed recursively and
//! release is idempotent: a workspace whose directory is already gone releases
//! cleanly.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::RwLock;

use crate::error::AppError;

/// Directory name prefix for all workspaces.
const WORKSPACE_PREFIX: &str = "uploadrelay";

/// Length of the random suffix appended to each workspace name.
const SUFFIX_LENGTH: usize = 8;

/// Handle to an acquired workspace directory.
///
/// The handle does not delete anything on drop; callers release it through the
/// registry so that cleanup failures can be logged in one place.
#[derive(Debug)]
pub struct Workspace {
    /// Absolute path of the workspace directory.
    pub path: PathBuf,
    /// When the workspace was created.
    pub created_at: DateTime<Utc>,
}

/// Registry of live workspace directories.
///
/// Cheaply clonable; all clones share the same tracking set. The set is part
/// of the application state rather than a process-wide global so tests can run
/// registries in isolation.
#[derive(Clone)]
pub struct WorkspaceRegistry {
    tracked: Arc<RwLock<HashSet<PathBuf>>>,
}

impl WorkspaceRegistry {
    pub fn new() -> Self {
        Self {
            tracked: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Creates a uniquely named workspace directory and registers it.
    ///
    /// The name combines a millisecond timestamp with a random alphanumeric
    /// suffix, so two requests arriving in the same instant cannot collide.
    /// Creation uses `create_dir` rather than `create_dir_all`: an existing
    /// directory would mean the name was not unique and must fail loudly.
    ///
    /// # Returns
    /// - `Ok(Workspace)` - Directory created and tracked
    /// - `Err(AppError::IoErr)` - Filesystem refused the directory
    pub async fn acquire(&self) -> Result<Workspace, AppError> {
        let created_at = Utc::now();
        let name = format!(
            "{}-{}-{}",
            WORKSPACE_PREFIX,
            created_at.timestamp_millis(),
            random_suffix()
        );
        let path = std::env::temp_dir().join(name);

        tokio::fs::create_dir(&path).await?;
        self.tracked.write().await.insert(path.clone());

        tracing::debug!("Acquired workspace {}", path.display());

        Ok(Workspace { path, created_at })
    }

    /// Removes the workspace directory tree and unregisters it.
    ///
    /// Idempotent: releasing a workspace whose directory has already been
    /// removed (by a second release call or by an external sweep) succeeds.
    ///
    /// # Arguments
    /// - `workspace` - Handle returned by `acquire`
    ///
    /// # Returns
    /// - `Ok(())` - Directory removed, or already gone
    /// - `Err(AppError::IoErr)` - Directory exists but could not be removed
    pub async fn release(&self, workspace: &Workspace) -> Result<(), AppError> {
        remove_tree(&workspace.path).await?;
        self.tracked.write().await.remove(&workspace.path);

        tracing::debug!(
            "Released workspace {} after {}ms",
            workspace.path.display(),
            (Utc::now() - workspace.created_at).num_milliseconds()
        );

        Ok(())
    }

    /// Releases every still-registered workspace.
    ///
    /// Called on process shutdown so no orphaned directories survive a crash
    /// or deploy restart. Individual removal failures are logged and skipped;
    /// a half-failed sweep still removes everything it can.
    pub async fn sweep_all(&self) {
        let paths: Vec<PathBuf> = self.tracked.write().await.drain().collect();

        if paths.is_empty() {
            return;
        }

        tracing::info!("Sweeping {} leftover workspace(s)", paths.len());

        for path in paths {
            if let Err(e) = remove_tree(&path).await {
                tracing::warn!("Failed to sweep workspace {}: {}", path.display(), e);
            }
        }
    }

    /// Returns the number of currently tracked workspaces.
    ///
    /// Used in tests to verify registration state.
    #[cfg(test)]
    pub async fn tracked_count(&self) -> usize {
        self.tracked.read().await.len()
    }
}

impl Default for WorkspaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes a directory tree, treating an already-missing tree as success.
async fn remove_tree(path: &Path) -> Result<(), AppError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Generates a random alphanumeric suffix for workspace names.
fn random_suffix() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rng();

    (0..SUFFIX_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
