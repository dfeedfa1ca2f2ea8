// ABOUTME: Append-only store for the authorized_keys file with provenance comments
// ABOUTME: Optionally skips key payloads that are already present verbatim

use super::files::{self, AUTHORIZED_KEYS_MODE};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name recorded in provenance comments.
pub const TOOL_NAME: &str = "ssh-config";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Skip the append when the exact payload already occurs in the file.
    Skip,
    Allow,
}

impl DuplicatePolicy {
    pub fn from_allow(allow_duplicates: bool) -> Self {
        if allow_duplicates {
            DuplicatePolicy::Allow
        } else {
            DuplicatePolicy::Skip
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub struct AuthorizedKeysStore {
    path: PathBuf,
}

impl AuthorizedKeysStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ensure_exists(&self) -> Result<()> {
        files::ensure_exists(&self.path, AUTHORIZED_KEYS_MODE)
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        files::read_bytes(&self.path)
    }

    /// Appends a blank line, a provenance comment and the raw key payload.
    /// Creates the file with 0600 first if it is missing.
    pub fn append(
        &self,
        service: &str,
        username: &str,
        keys: &[u8],
        policy: DuplicatePolicy,
    ) -> Result<AppendOutcome> {
        self.ensure_exists()?;

        if policy == DuplicatePolicy::Skip {
            let existing = self.read()?;
            if contains_bytes(&existing, keys) {
                debug!(
                    "Keys for {} user {} already present in {}",
                    service,
                    username,
                    self.path.display()
                );
                return Ok(AppendOutcome::AlreadyPresent);
            }
        }

        let mut payload = provenance_comment(service, username).into_bytes();
        payload.extend_from_slice(keys);
        files::append_bytes(&self.path, &payload)?;

        info!(
            "Added {} bytes of {} keys for {} to {}",
            keys.len(),
            service,
            username,
            self.path.display()
        );
        Ok(AppendOutcome::Appended)
    }
}

pub fn provenance_comment(service: &str, username: &str) -> String {
    format!("\n# Keys added from {service} user {username} via {TOOL_NAME}\n")
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
