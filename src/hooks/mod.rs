//! Git hook implementations
//!
//! Only `pre-push` is provided. Git invokes it with the remote name and URL
//! as arguments and one ref update per stdin line:
//!
//! ```text
//! <local ref> <local sha> <remote ref> <remote sha>
//! ```
//!
//! Each non-deleted local sha is checked out in a disposable clone and must
//! pass, in order:
//!
//! 1. the test command (`cargo test` by default),
//! 2. the formatter (`cargo fmt`), after which no tracked file may differ
//!    from the commit,
//! 3. the linter (`cargo clippy --all-targets`), judged by its diagnostic
//!    output rather than its exit code.
//!
//! A minimal hook script:
//!
//! ```sh
//! #!/bin/sh
//! exec pushgate -C "$(git rev-parse --show-toplevel)" "$@"
//! ```

pub mod gates;
pub mod pre_push;
pub mod ref_updates;
