//! Console output for Pushgate
//!
//! Progress goes to stdout, failures to stderr. Quiet mode silences
//! everything except errors.

use console::style;

use crate::error::PushGateError;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message; shown even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a step in a process
    pub fn step(&self, step: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), step);
        }
    }

    /// Report a pipeline failure with its category
    pub fn failure(&self, err: &PushGateError) {
        eprintln!(
            "{} {} {}",
            style("✖").red().bold(),
            style(format!("[{}]", err.kind())).red().bold(),
            style(err).red()
        );
        if let Some(commit) = err.commit() {
            eprintln!("  {} {}", style("commit").dim(), commit);
        }
    }
}
