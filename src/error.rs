// ABOUTME: Typed error taxonomy for SSH file management and remote key fetching
// ABOUTME: Every variant carries the path, URL or service/user needed for a precise message

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested key service has no URL template configured.
    #[error("invalid service specified: {service}")]
    InvalidService { service: String },

    /// Arguments that cannot be combined into a valid request.
    #[error("{0}")]
    InvalidArgumentCombination(String),

    /// Any filesystem failure: missing file, permission denied, mkdir failure.
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("failed to fetch keys from {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote answered with a non-success status.
    #[error("failed to fetch keys from {url}: HTTP {status}")]
    Remote { url: String, status: u16 },

    #[error("no keys found for {service} user {username}")]
    EmptyResult { service: String, username: String },

    #[error("failed to run editor '{program}': {detail}")]
    Editor { program: String, detail: String },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
