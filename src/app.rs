// ABOUTME: Application layer wiring configuration, stores, fetcher and editor into user operations
// ABOUTME: Each operation writes its status messages to a caller-supplied output sink

use crate::config::Config;
use crate::editor::{self, CommandRunner, EditTarget};
use crate::fetch::KeyFetcher;
use crate::lister::{ListTarget, Lister};
use crate::prompt::{self, HostAnswers};
use crate::ssh::{
    AppendOutcome, AuthorizedKeysStore, ConfigStore, DuplicatePolicy, ExtraOptions, HostEntry,
    HostMatch, PathResolver,
};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct App {
    config: Config,
    resolver: PathResolver,
    config_store: ConfigStore,
    authorized_keys: AuthorizedKeysStore,
    known_hosts: PathBuf,
    fetcher: KeyFetcher,
}

impl App {
    pub fn new(config: Config, resolver: PathResolver) -> Self {
        let fetcher = KeyFetcher::new(config.services.clone());
        Self::with_fetcher(config, resolver, fetcher)
    }

    pub fn with_fetcher(config: Config, resolver: PathResolver, fetcher: KeyFetcher) -> Self {
        let config_store = ConfigStore::new(resolver.expand_path(&config.paths.config));
        let authorized_keys =
            AuthorizedKeysStore::new(resolver.expand_path(&config.paths.authorized_keys));
        let known_hosts = resolver.expand_path(&config.paths.known_hosts);
        debug!(
            "Using config {}, authorized_keys {}, known_hosts {}",
            config_store.path().display(),
            authorized_keys.path().display(),
            known_hosts.display()
        );

        Self {
            config,
            resolver,
            config_store,
            authorized_keys,
            known_hosts,
            fetcher,
        }
    }

    /// Completes the host details (prompting on `input` for anything missing),
    /// renders the block and appends it to the SSH config.
    ///
    /// `extra` of `None` prompts for extra options until `done`.
    pub fn add_config(
        &self,
        answers: HostAnswers,
        extra: Option<ExtraOptions>,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<HostEntry> {
        let details = prompt::complete_host_details(
            answers,
            &self.config.hosts.default_identity_file,
            input,
            out,
        )
        .context("Failed to get configuration options")?;

        let extra = match extra {
            Some(extra) => extra,
            None => prompt::read_extra_options(input, out)
                .context("Failed to get extra arguments")?,
        };

        let entry = HostEntry::new(
            details.name,
            details.address,
            details.user,
            self.resolver.expand(&details.identity_file),
        )
        .with_extra(extra);

        self.config_store
            .append(&entry.to_block())
            .context("Failed to write configuration")?;

        writeln!(out, "Configuration added successfully.")?;
        Ok(entry)
    }

    /// `allow_duplicates` of `None` uses the configured policy.
    pub fn duplicate_policy(&self, allow_duplicates: Option<bool>) -> DuplicatePolicy {
        DuplicatePolicy::from_allow(allow_duplicates.unwrap_or(self.config.keys.allow_duplicates))
    }

    pub fn add_service_keys(
        &self,
        service: &str,
        username: &str,
        policy: DuplicatePolicy,
        out: &mut dyn Write,
    ) -> Result<AppendOutcome> {
        let keys = self.fetcher.fetch(service, username)?;

        let outcome = self
            .authorized_keys
            .append(service, username, &keys, policy)
            .context("Failed to update authorized_keys")?;

        match outcome {
            AppendOutcome::Appended => {
                writeln!(out, "Successfully added {service} keys for user {username}")?
            }
            AppendOutcome::AlreadyPresent => writeln!(
                out,
                "Keys for {service} user {username} already exist in {}",
                self.authorized_keys.path().display()
            )?,
        }
        Ok(outcome)
    }

    pub fn list(&self, target: &ListTarget, out: &mut dyn Write) -> Result<()> {
        Lister::new(&self.config_store, &self.authorized_keys, &self.fetcher)
            .list(target, out)
            .map_err(|e| {
                if e.is_not_found() {
                    anyhow::Error::new(e).context("Nothing to list")
                } else {
                    e.into()
                }
            })
    }

    /// `mode` of `None` uses the configured match mode.
    pub fn remove_host(&self, name: &str, mode: Option<HostMatch>, out: &mut dyn Write) -> Result<usize> {
        let mode = mode.unwrap_or(self.config.hosts.match_mode);
        let removed = self.config_store.remove_host(name, mode)?;

        if removed == 0 {
            writeln!(out, "No host matching {name} found")?;
        } else {
            writeln!(out, "Removed host {name}")?;
        }
        Ok(removed)
    }

    pub fn path_for(&self, target: EditTarget) -> &Path {
        match target {
            EditTarget::Config => self.config_store.path(),
            EditTarget::AuthorizedKeys => self.authorized_keys.path(),
            EditTarget::KnownHosts => &self.known_hosts,
        }
    }

    /// `env_editor` is the value of `$EDITOR`, if any.
    pub fn edit(
        &self,
        target: EditTarget,
        env_editor: Option<&str>,
        runner: &dyn CommandRunner,
    ) -> Result<()> {
        let editor = editor::resolve_editor(env_editor, &self.config.editor.fallback);
        editor::open_in_editor(runner, &editor, self.path_for(target))?;
        Ok(())
    }
}
