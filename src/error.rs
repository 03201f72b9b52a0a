//! Failure taxonomy for the pre-push pipeline
//!
//! Every expected failure is a value carrying a [`FailureKind`], so the
//! reporter can label it without inspecting message text.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::hooks::ref_updates::CommitId;

/// Result alias used throughout the pipeline
pub type Result<T> = std::result::Result<T, PushGateError>;

/// A per-commit check, run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Test,
    Format,
    Lint,
}

impl Gate {
    /// Gates in the order they run against each commit
    pub const ORDER: [Gate; 3] = [Gate::Test, Gate::Format, Gate::Lint];
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gate::Test => "test",
            Gate::Format => "format",
            Gate::Lint => "lint",
        };
        f.write_str(name)
    }
}

/// Coarse failure category, used only for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Locate,
    Config,
    Workspace,
    Input,
    Checkout,
    Test,
    Format,
    Lint,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Locate => "locate",
            FailureKind::Config => "config",
            FailureKind::Workspace => "workspace",
            FailureKind::Input => "input",
            FailureKind::Checkout => "checkout",
            FailureKind::Test => "test",
            FailureKind::Format => "format",
            FailureKind::Lint => "lint",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PushGateError {
    #[error("no git repository found in {} or any parent directory", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to prepare workspace: {0}")]
    Workspace(String),

    #[error("malformed ref update on line {line}: {reason}")]
    Input { line: usize, reason: String },

    #[error("failed to check out {commit}: {reason}")]
    Checkout { commit: CommitId, reason: String },

    #[error("{gate} gate failed for {commit}: {reason}")]
    Gate {
        gate: Gate,
        commit: CommitId,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

impl PushGateError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PushGateError::RepositoryNotFound(_) => FailureKind::Locate,
            PushGateError::Config(_) => FailureKind::Config,
            PushGateError::Workspace(_) | PushGateError::Io(_) => FailureKind::Workspace,
            PushGateError::Input { .. } => FailureKind::Input,
            PushGateError::Checkout { .. } => FailureKind::Checkout,
            PushGateError::Gate { gate, .. } => match gate {
                Gate::Test => FailureKind::Test,
                Gate::Format => FailureKind::Format,
                Gate::Lint => FailureKind::Lint,
            },
            // Gate runs relabel their own I/O and libgit2 errors
            PushGateError::Git(_) => FailureKind::Workspace,
        }
    }

    /// Commit that was in flight when the failure happened, if any
    pub fn commit(&self) -> Option<&CommitId> {
        match self {
            PushGateError::Checkout { commit, .. } | PushGateError::Gate { commit, .. } => {
                Some(commit)
            }
            _ => None,
        }
    }
}
