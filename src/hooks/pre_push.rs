//! Pre-push hook implementation
//!
//! Replays every pushed commit inside a disposable clone and aborts the push
//! on the first commit that fails a gate.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use super::gates::GateRunner;
use super::ref_updates::RefUpdates;
use crate::cli::Output;
use crate::config::PushGateConfig;
use crate::error::Result;
use crate::git::GitRepo;
use crate::workspace::Workspace;

/// Where to look for the repository and which extra config to apply
#[derive(Debug, Clone)]
pub struct PrePushOptions {
    pub search_start: PathBuf,
    pub config: Option<PathBuf>,
}

/// Outcome of a run in which every gate passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub commits_checked: usize,
}

/// Execute the pre-push pipeline against ref updates read from `input`
///
/// `input` is read lazily, one ref update at a time, only after the
/// workspace exists. The workspace is dropped before this returns.
pub fn execute<R: BufRead>(
    options: &PrePushOptions,
    input: R,
    output: &Output,
) -> Result<Summary> {
    let repo = GitRepo::locate(&options.search_start)?;
    let repo_root = repo.workdir()?.to_path_buf();
    tracing::info!("Located repository at {}", repo_root.display());

    let config = PushGateConfig::load(&repo_root, options.config.as_deref())?;

    let workspace = Workspace::create(&repo_root, &config.workspace)?;
    output.verbose(&format!("Workspace ready at {}", workspace.root().display()));
    let summary = validate_commits(workspace.root(), config, input, output)?;

    Ok(summary)
}

fn validate_commits<R: BufRead>(
    workdir: &Path,
    config: PushGateConfig,
    input: R,
    output: &Output,
) -> Result<Summary> {
    let runner = GateRunner::new(config.gates, workdir);
    let mut commits_checked = 0;

    for update in RefUpdates::new(input) {
        let update = update?;
        output.step(&format!(
            "Checking commit {} ({})",
            update.local_sha, update.local_ref
        ));

        runner.validate(&update.local_sha)?;
        commits_checked += 1;
    }

    Ok(Summary { commits_checked })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, PushGateError};
    use crate::hooks::ref_updates::DELETED_SHA;
    use crate::test_support::{commit_file, init_repo};
    use std::fs;
    use std::io::Cursor;

    fn options(repo: &Path) -> PrePushOptions {
        let config = repo.join("gates.toml");
        fs::write(
            &config,
            r#"
[workspace]
require_artifacts = false

[gates.test]
command = "test -f src/lib.rs"

[gates.format]
command = "true"

[gates.lint]
command = "printf 'Checking\nFinished\n' >&2"
"#,
        )
        .unwrap();

        PrePushOptions {
            search_start: repo.join("src"),
            config: Some(config),
        }
    }

    #[test]
    fn test_deleted_refs_are_never_checked_out() {
        let repo = init_repo();
        let sha = commit_file(repo.path(), "src/lib.rs", "fn a() {}\n");
        let input = format!(
            "refs/heads/a {sha} refs/heads/a {DELETED_SHA}\n{DELETED_SHA} {DELETED_SHA} refs/heads/b refs/heads/b\n"
        );

        let output = Output::new(false, true);
        let summary = execute(&options(repo.path()), Cursor::new(input), &output).unwrap();
        assert_eq!(summary.commits_checked, 1);
    }

    #[test]
    fn test_first_failing_commit_stops_the_run() {
        let repo = init_repo();
        let without_lib = commit_file(repo.path(), "docs.md", "docs\n");
        let with_lib = commit_file(repo.path(), "src/lib.rs", "fn a() {}\n");
        let input = format!("a {without_lib} a x\nb {with_lib} b x\n");

        let output = Output::new(false, true);
        let err = execute(&options(repo.path()), Cursor::new(input), &output).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Test);
        assert_eq!(err.commit().unwrap().as_str(), without_lib);
    }

    #[test]
    fn test_empty_input_succeeds_with_nothing_checked() {
        let repo = init_repo();
        commit_file(repo.path(), "src/lib.rs", "fn a() {}\n");

        let output = Output::new(false, true);
        let summary = execute(&options(repo.path()), Cursor::new(""), &output).unwrap();
        assert_eq!(summary.commits_checked, 0);
    }

    #[test]
    fn test_missing_start_directory_is_a_locate_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let options = PrePushOptions {
            search_start: dir.path().join("gone"),
            config: None,
        };

        let err = execute(&options, Cursor::new(""), &Output::new(false, true)).unwrap_err();
        assert!(matches!(err, PushGateError::RepositoryNotFound(_)));
        assert_eq!(err.kind(), FailureKind::Locate);
    }
}
