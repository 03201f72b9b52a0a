//! # Pushgate - replay pushed commits before they leave the machine
//!
//! Pushgate is a git `pre-push` hook. For every commit being pushed it
//! checks the commit out in a disposable clone of the repository and runs
//! three gates in order: the test suite, a formatter whose output must not
//! change any committed file, and a linter that must report nothing. The
//! first failure rejects the whole push with exit code 1.
//!
//! ## Quick Start
//!
//! ```bash
//! cargo install --path .
//! printf '#!/bin/sh\nexec pushgate -C "$(git rev-parse --show-toplevel)" "$@"\n' > .git/hooks/pre-push
//! chmod +x .git/hooks/pre-push
//! ```
//!
//! The clone is seeded with the repository's `target/` directory so each
//! commit builds incrementally. Gate commands and the artifact directory
//! are configurable through `pushgate.toml` in the repository root:
//!
//! ```toml
//! [workspace]
//! artifact_dir = "target"
//!
//! [gates.lint]
//! command = "cargo clippy --all-targets --message-format=json"
//! oracle = "json"
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, Output};
pub use config::PushGateConfig;
pub use error::{FailureKind, PushGateError};
