//! Command-line interface for Pushgate
//!
//! Git runs the pre-push hook as `pre-push <remote name> <remote url>` with
//! ref updates on stdin; this module maps that invocation onto the pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{SignalKind, signal};

mod output;

pub use output::Output;

use crate::hooks::pre_push::{self, PrePushOptions};

/// Pushgate - replay pushed commits in a scratch clone and gate the push on them
#[derive(Parser, Debug)]
#[command(
    name = "pushgate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Git pre-push hook that tests, format-checks and lints every pushed commit",
    long_about = "Reads git's pre-push ref updates from stdin, clones the repository into a \
                  temporary directory seeded with prebuilt artifacts, and checks out each pushed \
                  commit in turn. The push is rejected (exit code 1) at the first commit whose \
                  tests fail, whose formatting is not canonical or whose lints are not clean."
)]
pub struct Cli {
    /// Name of the remote being pushed to
    pub remote_name: Option<String>,

    /// URL of the remote being pushed to
    pub remote_url: Option<String>,

    /// Search for the repository from <DIR> instead of the executable's directory
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        tracing::debug!(
            "pre-push for remote {:?} ({:?})",
            self.remote_name,
            self.remote_url
        );

        keep_running_on_interrupt().context("Failed to register SIGINT handler")?;

        let output = Output::new(self.verbose > 0, self.quiet);
        let options = PrePushOptions {
            search_start: self.search_start()?,
            config: self.config,
        };

        let stdin = io::stdin();
        let summary = pre_push::execute(&options, stdin.lock(), &output)?;

        match summary.commits_checked {
            0 => output.info("Nothing to validate"),
            n => output.success(&format!("All {n} commit(s) passed")),
        }
        Ok(())
    }

    /// `-C` if given, else the directory git invoked the hook from, else
    /// the directory holding this executable
    fn search_start(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }

        let invoked = std::env::args_os().next();
        if let Some(dir) = invoked.and_then(|arg0| hook_dir(Path::new(&arg0))) {
            return Ok(dir);
        }

        let exe = std::env::current_exe().context("Failed to resolve executable path")?;
        let dir = exe
            .parent()
            .context("Executable path has no parent directory")?
            .to_path_buf();
        Ok(dir)
    }
}

/// Directory of the invoked path, unless it is a bare name looked up on PATH
///
/// Git runs hooks by path, and a symlinked hook keeps its own location here
/// where `current_exe` would resolve to the link target.
fn hook_dir(arg0: &Path) -> Option<PathBuf> {
    if arg0.components().count() < 2 {
        return None;
    }
    arg0.parent().map(Path::to_path_buf)
}

/// Ctrl-C from the terminal reaches the whole process group. The running
/// gate command dies and fails its gate, and the run unwinds through the
/// normal error path, which removes the workspace.
fn keep_running_on_interrupt() -> io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        while sigint.recv().await.is_some() {
            tracing::warn!("Interrupted, waiting for the running command to exit");
        }
    });
    Ok(())
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
