//! Git integration layer for Pushgate
//!
//! Repository discovery and working-tree inspection go through git2;
//! operations that mutate a checkout shell out to the system `git`
//! (see [`operations`]).

pub mod operations;

use git2::{Repository, Status, StatusOptions};
use std::path::{Path, PathBuf};

use crate::error::{PushGateError, Result};

/// Name of the repository metadata entry a root directory contains
const GIT_METADATA: &str = ".git";

/// Walk from `start` up to the filesystem root looking for a directory
/// that holds `.git`, returning that directory.
pub fn find_repository_root(start: &Path) -> Result<PathBuf> {
    let start = start
        .canonicalize()
        .map_err(|_| PushGateError::RepositoryNotFound(start.to_path_buf()))?;

    start
        .ancestors()
        .find(|dir| dir.join(GIT_METADATA).exists())
        .map(Path::to_path_buf)
        .ok_or(PushGateError::RepositoryNotFound(start))
}

pub struct GitRepo {
    pub repo: Repository,
}

impl GitRepo {
    /// Locate the repository enclosing `start` and open it
    pub fn locate(start: &Path) -> Result<Self> {
        let root = find_repository_root(start)?;
        match Self::open(&root) {
            Ok(repo) if repo.repo.workdir().is_some() => Ok(repo),
            Ok(_) => Err(PushGateError::RepositoryNotFound(root)),
            Err(e) => {
                tracing::debug!("{} has .git but does not open: {}", root.display(), e);
                Err(PushGateError::RepositoryNotFound(root))
            }
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(GitRepo { repo })
    }

    /// Working tree root of a non-bare repository
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("repository has no working directory").into())
    }

    /// Tracked files whose working-tree or index content differs from HEAD
    ///
    /// Untracked and ignored entries are not reported, so build output and
    /// copied artifacts never count as modifications.
    pub fn modified_tracked_files(&self) -> Result<Vec<String>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let dirty = Status::WT_MODIFIED
            | Status::WT_DELETED
            | Status::WT_RENAMED
            | Status::WT_TYPECHANGE
            | Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status().intersects(dirty))
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }
}
