// ABOUTME: Tilde expansion for user-supplied SSH file paths
// ABOUTME: Carries the home directory explicitly instead of reading the environment at every call

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    home: String,
}

impl PathResolver {
    pub fn new(home: impl Into<String>) -> Self {
        Self { home: home.into() }
    }

    /// Reads `HOME` once. An unset variable yields an empty home, so `~/x`
    /// expands to `/x`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("HOME").unwrap_or_default())
    }

    /// Expands `~` and a leading `~/`; any other path is returned as-is.
    pub fn expand(&self, path: &str) -> String {
        if path == "~" {
            self.home.clone()
        } else if let Some(rest) = path.strip_prefix("~/") {
            format!("{}/{}", self.home, rest)
        } else {
            path.to_string()
        }
    }

    pub fn expand_path(&self, path: &str) -> PathBuf {
        PathBuf::from(self.expand(path))
    }
}
