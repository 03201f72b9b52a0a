//! Disposable clone used to replay pushed commits
//!
//! The clone lives under a [`TempDir`]; dropping the [`Workspace`] removes
//! it, so every way out of a run cleans up.

use fs_extra::dir::CopyOptions;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::WorkspaceConfig;
use crate::error::{PushGateError, Result};
use crate::git::operations;

pub struct Workspace {
    // Held for its Drop; `root` points inside it
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Workspace {
    /// Clone `source` into a fresh temporary directory and seed it with
    /// the prebuilt artifact tree before any commit is checked out.
    pub fn create(source: &Path, config: &WorkspaceConfig) -> Result<Self> {
        which::which("git").map_err(|e| {
            PushGateError::Workspace(format!("git executable not found on PATH: {e}"))
        })?;

        let temp_dir = tempfile::Builder::new()
            .prefix("pushgate-")
            .tempdir()
            .map_err(|e| PushGateError::Workspace(format!("failed to create temp dir: {e}")))?;

        let name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "repo".into());
        let root = temp_dir.path().join(name);

        tracing::info!("Cloning {} into {}", source.display(), root.display());
        operations::clone_local(source, &root)?;
        if let Ok(head) = operations::head_commit(&root) {
            tracing::debug!("Workspace starts at {}", head);
        }

        let workspace = Workspace {
            _temp_dir: temp_dir,
            root,
        };
        workspace.seed_artifacts(source, config)?;

        Ok(workspace)
    }

    /// Working tree of the clone; every later step is rooted here
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn seed_artifacts(&self, source: &Path, config: &WorkspaceConfig) -> Result<()> {
        let from = source.join(&config.artifact_dir);
        let to = self.root.join(&config.artifact_dir);

        if !from.is_dir() {
            if config.require_artifacts {
                return Err(PushGateError::Workspace(format!(
                    "prebuilt artifact directory {} does not exist",
                    from.display()
                )));
            }
            tracing::warn!(
                "No artifacts at {}, commits will build from scratch",
                from.display()
            );
            return Ok(());
        }

        std::fs::create_dir_all(&to)?;
        let options = CopyOptions::new().content_only(true).overwrite(true);
        tracing::info!("Copying artifacts {} -> {}", from.display(), to.display());
        fs_extra::dir::copy(&from, &to, &options).map_err(|e| {
            PushGateError::Workspace(format!(
                "failed to copy artifacts from {}: {e}",
                from.display()
            ))
        })?;

        Ok(())
    }
}
