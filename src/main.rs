// ABOUTME: Command-line entry point for managing SSH config, authorized_keys and known_hosts
// ABOUTME: Parses arguments, loads configuration and dispatches to the application layer

mod app;
mod config;
mod editor;
mod error;
mod fetch;
mod lister;
mod logging;
mod prompt;
mod ssh;
mod version;

use anyhow::Result;
use app::App;
use clap::{Args, Parser, Subcommand};
use config::Config;
use editor::{EditTarget, SystemRunner};
use lister::ListTarget;
use prompt::HostAnswers;
use ssh::{ExtraOptions, HostMatch, PathResolver};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ssh-config")]
#[command(about = "A modern SSH configuration management tool")]
#[command(long_about = "Manage ~/.ssh/config host entries, add public keys from GitHub or \
GitLab to ~/.ssh/authorized_keys, and open SSH files in your editor.")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to <config dir>/ssh-config/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SSH client config file to manage
    #[arg(long, global = true, env = "SSH_CONFIG_FILE")]
    ssh_config: Option<String>,

    /// authorized_keys file to manage
    #[arg(long, global = true, env = "SSH_AUTHORIZED_KEYS")]
    authorized_keys: Option<String>,

    /// known_hosts file opened by `edit hosts`
    #[arg(long, global = true, env = "SSH_KNOWN_HOSTS")]
    known_hosts: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new SSH configuration or keys
    #[command(subcommand)]
    Add(AddCommands),

    /// Show the SSH config, authorized_keys, or a user's keys on a service
    #[command(visible_alias = "ls")]
    List {
        /// config, keys, or a service name such as github or gitlab
        target: String,

        /// Username on the service
        username: Option<String>,
    },

    /// Remove a host block from the SSH config
    #[command(visible_alias = "rm")]
    Remove {
        /// Host name; by default any host starting with this name matches
        name: String,

        /// Only remove hosts named exactly NAME
        #[arg(long)]
        exact: bool,
    },

    /// Open config, authorized_keys (keys) or known_hosts (hosts) in $EDITOR
    #[command(visible_alias = "e")]
    Edit {
        /// config, keys or hosts
        target: Option<String>,
    },

    /// Write a commented default settings file
    InitConfig {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Print the version number
    Version,
}

#[derive(Subcommand)]
enum AddCommands {
    /// Append a Host block to the SSH config, prompting for missing values
    Config {
        /// SSH host name (alias)
        #[arg(short = 'H', long = "host")]
        host: Option<String>,

        /// IP address or DNS name
        #[arg(short = 'I', long = "ip")]
        address: Option<String>,

        /// Remote username
        #[arg(short = 'U', long)]
        user: Option<String>,

        /// Identity file path
        #[arg(short = 'K', long)]
        key: Option<String>,

        /// Extra option, repeatable; skips the interactive extra options prompt
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },

    /// Add a GitHub user's public keys to authorized_keys
    Github {
        username: String,
        #[command(flatten)]
        duplicates: DuplicateArgs,
    },

    /// Add a GitLab user's public keys to authorized_keys
    Gitlab {
        username: String,
        #[command(flatten)]
        duplicates: DuplicateArgs,
    },

    /// Add a user's public keys from any configured service
    Key {
        service: String,
        username: String,
        #[command(flatten)]
        duplicates: DuplicateArgs,
    },
}

#[derive(Args)]
struct DuplicateArgs {
    /// Append even if the fetched keys are already present
    #[arg(long, conflicts_with = "dedupe")]
    allow_duplicates: bool,

    /// Skip the append if the fetched keys are already present
    #[arg(long)]
    dedupe: bool,
}

impl DuplicateArgs {
    fn allow_duplicates(&self) -> Option<bool> {
        if self.allow_duplicates {
            Some(true)
        } else if self.dedupe {
            Some(false)
        } else {
            None
        }
    }
}

fn parse_option(input: &str) -> std::result::Result<(String, String), String> {
    ExtraOptions::parse_pair(input).ok_or_else(|| format!("invalid option '{input}': use KEY=VALUE"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!("{}", version::long_version());
        return Ok(());
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };

    if let Commands::InitConfig { force } = cli.command {
        Config::save_default_config(&config_path, force)?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::load_or_default(&config_path)?;
    apply_path_overrides(&mut config, &cli);
    config.validate()?;

    let app = App::new(config, PathResolver::from_env());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Add(AddCommands::Config {
            host,
            address,
            user,
            key,
            options,
        }) => {
            let answers = HostAnswers {
                name: host,
                address,
                user,
                identity_file: key,
            };
            let extra = if options.is_empty() {
                None
            } else {
                Some(options.into_iter().collect::<ExtraOptions>())
            };
            let stdin = io::stdin();
            let mut input = stdin.lock();
            app.add_config(answers, extra, &mut input, &mut out)?;
        }
        Commands::Add(AddCommands::Github {
            username,
            duplicates,
        }) => {
            let policy = app.duplicate_policy(duplicates.allow_duplicates());
            app.add_service_keys("github", &username, policy, &mut out)?;
        }
        Commands::Add(AddCommands::Gitlab {
            username,
            duplicates,
        }) => {
            let policy = app.duplicate_policy(duplicates.allow_duplicates());
            app.add_service_keys("gitlab", &username, policy, &mut out)?;
        }
        Commands::Add(AddCommands::Key {
            service,
            username,
            duplicates,
        }) => {
            let policy = app.duplicate_policy(duplicates.allow_duplicates());
            app.add_service_keys(&service, &username, policy, &mut out)?;
        }
        Commands::List { target, username } => {
            let target = ListTarget::parse(&target, username.as_deref())?;
            app.list(&target, &mut out)?;
        }
        Commands::Remove { name, exact } => {
            let mode = exact.then_some(HostMatch::Exact);
            app.remove_host(&name, mode, &mut out)?;
        }
        Commands::Edit { target } => {
            let target = EditTarget::parse(target.as_deref())?;
            let env_editor = std::env::var("EDITOR").ok();
            app.edit(target, env_editor.as_deref(), &SystemRunner)?;
        }
        Commands::Version | Commands::InitConfig { .. } => {}
    }

    Ok(())
}

fn apply_path_overrides(config: &mut Config, cli: &Cli) {
    if let Some(path) = &cli.ssh_config {
        config.paths.config = path.clone();
    }
    if let Some(path) = &cli.authorized_keys {
        config.paths.authorized_keys = path.clone();
    }
    if let Some(path) = &cli.known_hosts {
        config.paths.known_hosts = path.clone();
    }
}
