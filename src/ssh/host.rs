// ABOUTME: Host entries for the SSH config file and their rendering into Host blocks
// ABOUTME: Extra options keep insertion order so the written block is reproducible

use std::fmt::Write as _;

/// Indentation that marks a line as belonging to the preceding `Host` line.
pub const BLOCK_INDENT: &str = "    ";

/// Free-form `Key Value` options appended after the fixed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraOptions {
    entries: Vec<(String, String)>,
}

impl ExtraOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an option; a repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Parses `key=value`. Input with anything other than exactly one `=` is rejected.
    pub fn parse_pair(input: &str) -> Option<(String, String)> {
        let mut parts = input.split('=');
        let key = parts.next()?;
        let value = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some((key.to_string(), value.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = ExtraOptions::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostEntry {
    pub name: String,     // Alias the user types after `ssh`
    pub hostname: String, // Address written as HostName
    pub user: String,
    pub identity_file: String,
    pub extra: ExtraOptions,
}

impl HostEntry {
    pub fn new(
        name: impl Into<String>,
        hostname: impl Into<String>,
        user: impl Into<String>,
        identity_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            user: user.into(),
            identity_file: identity_file.into(),
            extra: ExtraOptions::new(),
        }
    }

    pub fn with_extra(mut self, extra: ExtraOptions) -> Self {
        self.extra = extra;
        self
    }

    pub fn to_block(&self) -> String {
        format_host_block(
            &self.name,
            &self.hostname,
            &self.user,
            &self.identity_file,
            &self.extra,
        )
    }
}

/// Renders a `Host` block: header line, then one indented line per option,
/// each terminated by a newline.
pub fn format_host_block(
    name: &str,
    hostname: &str,
    user: &str,
    identity_file: &str,
    extra: &ExtraOptions,
) -> String {
    let mut block = format!(
        "Host {name}\n{BLOCK_INDENT}HostName {hostname}\n{BLOCK_INDENT}User {user}\n{BLOCK_INDENT}IdentityFile {identity_file}\n"
    );

    for (key, value) in extra.iter() {
        // Writing to a String cannot fail
        let _ = writeln!(block, "{BLOCK_INDENT}{key} {value}");
    }

    block
}
