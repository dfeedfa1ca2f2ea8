// ABOUTME: Line-oriented store for the SSH client config file
// ABOUTME: Appends rendered Host blocks and removes blocks by header name without parsing options

use super::files::{self, CONFIG_FILE_MODE};
use super::host::BLOCK_INDENT;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How a `Host` header is compared against the name given to `remove_host`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostMatch {
    /// `Host <name>` is a prefix of the header line, so `web` also matches `web2`.
    #[default]
    Prefix,
    /// The header names exactly `<name>`.
    Exact,
}

impl HostMatch {
    fn matches(self, line: &str, name: &str) -> bool {
        match self {
            HostMatch::Prefix => line.starts_with(&format!("Host {name}")),
            HostMatch::Exact => line
                .strip_prefix("Host ")
                .is_some_and(|rest| rest.trim_end() == name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a rendered block, creating the file (0644) if needed.
    /// Host names are not de-duplicated.
    pub fn append(&self, block: &str) -> Result<()> {
        files::ensure_exists(&self.path, CONFIG_FILE_MODE)?;
        files::append_bytes(&self.path, block.as_bytes())?;
        info!("Appended {} bytes to {}", block.len(), self.path.display());
        Ok(())
    }

    pub fn read(&self) -> Result<String> {
        files::read_to_string(&self.path)
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        files::read_bytes(&self.path)
    }

    /// Drops every block whose header matches `name` and rewrites the file.
    /// Returns how many headers matched; zero still rewrites the same content.
    pub fn remove_host(&self, name: &str, mode: HostMatch) -> Result<usize> {
        let content = self.read()?;
        let (filtered, removed) = remove_host_blocks(&content, name, mode);

        fs::write(&self.path, filtered).map_err(|e| Error::io("write", &self.path, e))?;
        debug!(
            "Rewrote {} after removing {} block(s) for '{}'",
            self.path.display(),
            removed,
            name
        );
        Ok(removed)
    }
}

/// Filters host blocks out of config text.
///
/// A matching header starts a skip window. Each following line that begins
/// with the four-space indent is dropped; the first line without it closes the
/// window and is itself checked as a possible header. Lines keep their
/// original endings.
pub fn remove_host_blocks(content: &str, name: &str, mode: HostMatch) -> (String, usize) {
    let mut output = String::with_capacity(content.len());
    let mut skipping = false;
    let mut removed = 0;

    for line in content.split_inclusive('\n') {
        if mode.matches(line, name) {
            skipping = true;
            removed += 1;
        } else if skipping && line.starts_with(BLOCK_INDENT) {
            continue;
        } else {
            skipping = false;
            output.push_str(line);
        }
    }

    (output, removed)
}
