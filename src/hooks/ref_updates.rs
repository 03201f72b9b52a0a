//! Ref-update records as git hands them to a pre-push hook
//!
//! Each stdin line is `<local ref> <local sha> <remote ref> <remote sha>`.
//! Only the local sha is consumed; a local sha of forty zeros means the
//! ref is being deleted and there is nothing to validate.

use std::convert::Infallible;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::{PushGateError, Result};

/// Local sha git sends when a ref is being deleted
pub const DELETED_SHA: &str = "0000000000000000000000000000000000000000";

/// Commit identifier as received on stdin
///
/// Ids are taken verbatim; an id that does not resolve fails at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_deleted_sentinel(&self) -> bool {
        self.0 == DELETED_SHA
    }
}

impl FromStr for CommitId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(CommitId(s.to_string()))
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    pub local_ref: String,
    pub local_sha: CommitId,
    pub remote_ref: String,
    pub remote_sha: CommitId,
}

impl RefUpdate {
    pub fn is_delete(&self) -> bool {
        self.local_sha.is_deleted_sentinel()
    }
}

impl FromStr for RefUpdate {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let mut next = |name: &str| {
            fields
                .next()
                .map(str::to_string)
                .ok_or_else(|| format!("missing {name} field"))
        };

        let local_ref = next("local ref")?;
        let local_sha = next("local sha")?;
        let remote_ref = next("remote ref")?;
        let remote_sha = next("remote sha")?;

        Ok(RefUpdate {
            local_ref,
            local_sha: CommitId(local_sha),
            remote_ref,
            remote_sha: CommitId(remote_sha),
        })
    }
}

/// Lazy reader of ref updates that yields only the ones worth validating
///
/// One line is read per call to `next`, so input is consumed exactly once
/// and in order. Deletions and blank lines are skipped.
pub struct RefUpdates<R> {
    reader: R,
    line_number: usize,
    buf: String,
}

impl<R: BufRead> RefUpdates<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for RefUpdates<R> {
    type Item = Result<RefUpdate>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    return Some(Err(PushGateError::Input {
                        line: self.line_number + 1,
                        reason: e.to_string(),
                    }));
                }
            }
            self.line_number += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            let update = match line.parse::<RefUpdate>() {
                Ok(update) => update,
                Err(reason) => {
                    return Some(Err(PushGateError::Input {
                        line: self.line_number,
                        reason,
                    }));
                }
            };

            if update.is_delete() {
                tracing::debug!("Skipping deletion of {}", update.local_ref);
                continue;
            }

            return Some(Ok(update));
        }
    }
}
