//! Per-commit gate sequence
//!
//! For each commit: checkout, then test, format and lint, stopping at the
//! first failure. Gate commands run through `sh -c` in the workspace.

pub mod lint;

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::{GatesConfig, LintOracle};
use crate::error::{Gate, PushGateError, Result};
use crate::git::GitRepo;
use crate::git::operations;
use crate::hooks::ref_updates::CommitId;

/// Modified paths listed in a format failure before truncating
const MAX_REPORTED_PATHS: usize = 10;

pub struct GateRunner {
    config: GatesConfig,
    workdir: PathBuf,
}

impl GateRunner {
    pub fn new(config: GatesConfig, workdir: &Path) -> Self {
        Self {
            config,
            workdir: workdir.to_path_buf(),
        }
    }

    /// Check out `commit` and run every gate against it, in order
    pub fn validate(&self, commit: &CommitId) -> Result<()> {
        operations::checkout(&self.workdir, commit)?;

        for gate in Gate::ORDER {
            tracing::info!("Running {} gate on {}", gate, commit);
            let verdict = match gate {
                Gate::Test => self.test_gate(),
                Gate::Format => self.format_gate(),
                Gate::Lint => self.lint_gate(),
            }
            .map_err(|e| PushGateError::Gate {
                gate,
                commit: commit.clone(),
                reason: format!("could not run: {e}"),
            })?;

            if let Err(reason) = verdict {
                return Err(PushGateError::Gate {
                    gate,
                    commit: commit.clone(),
                    reason,
                });
            }
        }

        Ok(())
    }

    // Gates return Ok(Err(reason)) for a failed check and Err(_) when the
    // check itself could not be carried out.

    fn test_gate(&self) -> Result<std::result::Result<(), String>> {
        let status = self.shell(&self.config.test.command).status()?;
        Ok(require_success("test command", status))
    }

    fn format_gate(&self) -> Result<std::result::Result<(), String>> {
        let status = self.shell(&self.config.format.command).status()?;
        if let Err(reason) = require_success("formatter", status) {
            return Ok(Err(reason));
        }

        let modified = GitRepo::open(&self.workdir)?.modified_tracked_files()?;
        if modified.is_empty() {
            return Ok(Ok(()));
        }

        let mut reason = format!(
            "formatter changed {} committed file(s):",
            modified.len()
        );
        for path in modified.iter().take(MAX_REPORTED_PATHS) {
            reason.push_str("\n  ");
            reason.push_str(path);
        }
        if modified.len() > MAX_REPORTED_PATHS {
            reason.push_str(&format!(
                "\n  ... and {} more",
                modified.len() - MAX_REPORTED_PATHS
            ));
        }
        Ok(Err(reason))
    }

    fn lint_gate(&self) -> Result<std::result::Result<(), String>> {
        let lint = &self.config.lint;
        let mut cmd = self.shell(&lint.command);

        match lint.oracle {
            LintOracle::LineCount => {
                let output = cmd
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::piped())
                    .output()?;
                let diagnostics = String::from_utf8_lossy(&output.stderr);
                tracing::debug!(
                    "Linter exited with {} and {} diagnostic line(s)",
                    output.status,
                    diagnostics.lines().count()
                );

                let verdict = lint::check_line_count(&diagnostics, lint.expected_lines);
                if verdict.is_err() {
                    eprint!("{diagnostics}");
                }
                Ok(verdict)
            }
            LintOracle::Json => {
                let output = cmd
                    .stdout(Stdio::piped())
                    .stderr(Stdio::inherit())
                    .output()?;
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(lint::check_json_messages(&stdout, output.status.success()))
            }
        }
    }

    fn shell(&self, command: &str) -> Command {
        tracing::debug!("sh -c '{}' in {}", command, self.workdir.display());
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(&self.workdir)
            .stdin(Stdio::null());
        // stdin carries the remaining ref updates and must not reach gate tools;
        // the GIT_* variables would point them at the repository being pushed
        for var in operations::REDIRECTING_ENV {
            cmd.env_remove(var);
        }
        cmd
    }
}

fn require_success(what: &str, status: ExitStatus) -> std::result::Result<(), String> {
    if status.success() {
        Ok(())
    } else {
        Err(format!("{what} exited with {status}"))
    }
}
