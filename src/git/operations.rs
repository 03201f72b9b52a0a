use std::path::Path;
use std::process::{Command, Output};

use crate::error::{PushGateError, Result};
use crate::hooks::ref_updates::CommitId;

/// Variables git exports to hooks that would redirect a child `git`
/// away from the directory it is run in
pub const REDIRECTING_ENV: [&str; 3] = ["GIT_DIR", "GIT_WORK_TREE", "GIT_INDEX_FILE"];

/// System `git` rooted at `dir`, isolated from the invoking hook's environment
pub fn git_command(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    for var in REDIRECTING_ENV {
        cmd.env_remove(var);
    }
    cmd
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Clone a local repository by path; never touches a network remote
pub fn clone_local(source: &Path, dest: &Path) -> Result<()> {
    let parent = dest
        .parent()
        .ok_or_else(|| PushGateError::Workspace(format!("invalid clone target {}", dest.display())))?;

    tracing::debug!("git clone {} {}", source.display(), dest.display());
    let output = git_command(parent)
        .args(["clone", "--quiet", "--no-hardlinks"])
        .arg(source)
        .arg(dest)
        .output()?;

    if !output.status.success() {
        return Err(PushGateError::Workspace(format!(
            "failed to clone '{}': {}",
            source.display(),
            stderr_of(&output)
        )));
    }

    Ok(())
}

/// Point the working tree at `commit` (detached HEAD)
pub fn checkout(repo_dir: &Path, commit: &CommitId) -> Result<()> {
    tracing::debug!("git checkout {}", commit);
    let output = git_command(repo_dir)
        .args(["-c", "advice.detachedHead=false", "checkout", "--quiet"])
        .arg(commit.as_str())
        .output()?;

    if !output.status.success() {
        return Err(PushGateError::Checkout {
            commit: commit.clone(),
            reason: stderr_of(&output),
        });
    }

    tracing::info!("Checked out {}", commit);
    Ok(())
}

/// Full id of the commit HEAD points at
pub fn head_commit(repo_dir: &Path) -> Result<String> {
    let output = git_command(repo_dir).args(["rev-parse", "HEAD"]).output()?;

    if !output.status.success() {
        return Err(PushGateError::Workspace(format!(
            "could not resolve HEAD: {}",
            stderr_of(&output)
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
