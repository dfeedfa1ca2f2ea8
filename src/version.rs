// ABOUTME: Version string with optional build metadata baked in at compile time
// ABOUTME: Printed by the `version` subcommand; `--version` shows the bare package version

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn build_time() -> &'static str {
    option_env!("SSH_CONFIG_BUILD_TIME").unwrap_or("unknown")
}

pub fn git_commit() -> &'static str {
    option_env!("SSH_CONFIG_GIT_COMMIT").unwrap_or("unknown")
}

pub fn long_version() -> String {
    format!(
        "ssh-config v{VERSION} (build: {}, commit: {})",
        build_time(),
        git_commit()
    )
}
