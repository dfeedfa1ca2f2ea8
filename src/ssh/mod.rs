// ABOUTME: Local SSH file handling: path expansion, Host blocks, config and authorized_keys stores
// ABOUTME: Everything here works on plain text files and never parses key material

pub mod authorized_keys;
pub mod config_file;
pub mod files;
pub mod host;
pub mod paths;

pub use authorized_keys::{AppendOutcome, AuthorizedKeysStore, DuplicatePolicy};
pub use config_file::{ConfigStore, HostMatch};
pub use host::{ExtraOptions, HostEntry};
pub use paths::PathResolver;
