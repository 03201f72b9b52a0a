//! Throwaway repositories for unit tests

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::git::operations::{git_command, head_commit};

fn git(dir: &Path, args: &[&str]) {
    let output = git_command(dir)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Write `path` and commit it, returning the new commit id
pub fn commit_file(dir: &Path, path: &str, content: &str) -> String {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
    git(dir, &["add", path]);
    git(dir, &["commit", "--quiet", "-m", &format!("update {path}")]);
    head_commit(dir).unwrap()
}

/// Repository with an ignored `target/` and one commit holding README.md
pub fn init_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    git(temp_dir.path(), &["init", "--quiet"]);
    fs::write(temp_dir.path().join(".gitignore"), "/target\n").unwrap();
    git(temp_dir.path(), &["add", ".gitignore"]);
    commit_file(temp_dir.path(), "README.md", "hello\n");
    temp_dir
}
