// ABOUTME: Tool configuration: SSH file locations, key service URL templates and policies
// ABOUTME: Loaded from TOML with per-section defaults, then passed explicitly to every component

use crate::fetch::USERNAME_PLACEHOLDER;
use crate::ssh::HostMatch;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub services: BTreeMap<String, String>,
    pub keys: KeysConfig,
    pub hosts: HostsConfig,
    pub editor: EditorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub config: String,
    pub authorized_keys: String,
    pub known_hosts: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct KeysConfig {
    pub allow_duplicates: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HostsConfig {
    pub match_mode: HostMatch,
    pub default_identity_file: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub fallback: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig::default(),
            services: default_services(),
            keys: KeysConfig::default(),
            hosts: HostsConfig::default(),
            editor: EditorConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            config: "~/.ssh/config".to_string(),
            authorized_keys: "~/.ssh/authorized_keys".to_string(),
            known_hosts: "~/.ssh/known_hosts".to_string(),
        }
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        HostsConfig {
            match_mode: HostMatch::Prefix,
            default_identity_file: "~/.ssh/id_rsa.pub".to_string(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            fallback: "vim".to_string(),
        }
    }
}

pub fn default_services() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("github".to_string(), "https://github.com/{username}.keys".to_string()),
        ("gitlab".to_string(), "https://gitlab.com/{username}.keys".to_string()),
    ])
}

impl Config {
    pub fn default_config_content() -> &'static str {
        r#"# ssh-config configuration

[paths]
# SSH file locations (a leading ~ is expanded to $HOME)
config = "~/.ssh/config"
authorized_keys = "~/.ssh/authorized_keys"
known_hosts = "~/.ssh/known_hosts"

[services]
# Key services: name = URL template, {username} is substituted
github = "https://github.com/{username}.keys"
gitlab = "https://gitlab.com/{username}.keys"

[keys]
# Append fetched keys even when the exact payload is already present
allow_duplicates = false

[hosts]
# "prefix": `remove web` also removes `Host web2`; "exact": names must match
match_mode = "prefix"
# Used when the identity file prompt is left empty
default_identity_file = "~/.ssh/id_rsa.pub"

[editor]
# Used when $EDITOR is not set
fallback = "vim"
"#
    }

    /// Parses TOML. A `[services]` table replaces the built-in services entirely.
    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Loads `path` when it exists, otherwise the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("ssh-config").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("paths.config", &self.paths.config),
            ("paths.authorized_keys", &self.paths.authorized_keys),
            ("paths.known_hosts", &self.paths.known_hosts),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{name} cannot be empty");
            }
        }

        for (service, template) in &self.services {
            if !template.contains(USERNAME_PLACEHOLDER) {
                anyhow::bail!("Service '{service}' URL must contain {USERNAME_PLACEHOLDER} placeholder");
            }
        }

        if self.editor.fallback.trim().is_empty() {
            anyhow::bail!("editor.fallback cannot be empty");
        }

        Ok(())
    }

    pub fn save_default_config(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "Configuration file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config to: {}", path.display()))?;

        Ok(())
    }
}
