// ABOUTME: Opens one of the SSH files in the user's editor
// ABOUTME: Process spawning sits behind a CommandRunner so callers can substitute it

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Which SSH file to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Config,
    AuthorizedKeys,
    KnownHosts,
}

impl EditTarget {
    pub fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("config") => Ok(EditTarget::Config),
            Some("keys") => Ok(EditTarget::AuthorizedKeys),
            Some("hosts") => Ok(EditTarget::KnownHosts),
            Some(other) => Err(Error::InvalidArgumentCombination(format!(
                "invalid edit target '{other}': use 'config', 'keys' or 'hosts'"
            ))),
        }
    }
}

/// Runs a program to completion with the terminal attached.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// Spawns real processes, inheriting stdin/stdout/stderr.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let resolved = which::which(program).map_err(|e| Error::Editor {
            program: program.to_string(),
            detail: e.to_string(),
        })?;
        debug!("Running {} with args: {:?}", resolved.display(), args);

        let status = Command::new(&resolved)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::Editor {
                program: program.to_string(),
                detail: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Editor {
                program: program.to_string(),
                detail: format!("exited with {status}"),
            })
        }
    }
}

/// `$EDITOR` when set and non-blank, otherwise the configured fallback.
pub fn resolve_editor(env_editor: Option<&str>, fallback: &str) -> String {
    match env_editor.map(str::trim) {
        Some(editor) if !editor.is_empty() => editor.to_string(),
        _ => fallback.to_string(),
    }
}

/// Editors like `code --wait` carry their own arguments; the path goes last.
pub fn open_in_editor(runner: &dyn CommandRunner, editor: &str, path: &Path) -> Result<()> {
    let path_arg = path.to_string_lossy();
    let mut parts = editor.split_whitespace();
    let program = parts.next().ok_or_else(|| Error::Editor {
        program: editor.to_string(),
        detail: "empty editor command".to_string(),
    })?;
    let mut args: Vec<&str> = parts.collect();
    args.push(path_arg.as_ref());

    info!("Opening {} with {}", path_arg, editor);
    runner.run(program, &args)
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingRunner;
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_edit_target() {
        assert_eq!(EditTarget::parse(None).unwrap(), EditTarget::Config);
        assert_eq!(EditTarget::parse(Some("config")).unwrap(), EditTarget::Config);
        assert_eq!(EditTarget::parse(Some("keys")).unwrap(), EditTarget::AuthorizedKeys);
        assert_eq!(EditTarget::parse(Some("hosts")).unwrap(), EditTarget::KnownHosts);

        let err = EditTarget::parse(Some("invalid")).unwrap_err();
        assert!(err.to_string().contains("'config', 'keys' or 'hosts'"));
    }

    #[test]
    fn test_resolve_editor() {
        assert_eq!(resolve_editor(Some("nano"), "vim"), "nano");
        assert_eq!(resolve_editor(Some(""), "vim"), "vim");
        assert_eq!(resolve_editor(Some("   "), "vim"), "vim");
        assert_eq!(resolve_editor(None, "vim"), "vim");
    }

    #[test]
    fn test_open_in_editor_passes_path() {
        let runner = RecordingRunner::default();
        let path = PathBuf::from("/home/alice/.ssh/known_hosts");

        open_in_editor(&runner, "mock-editor", &path).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "mock-editor");
        assert_eq!(calls[0].1, vec!["/home/alice/.ssh/known_hosts".to_string()]);
    }

    #[test]
    fn test_open_in_editor_splits_editor_arguments() {
        let runner = RecordingRunner::default();

        open_in_editor(&runner, "code --wait", Path::new("/tmp/config")).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls[0].0, "code");
        assert_eq!(calls[0].1, vec!["--wait".to_string(), "/tmp/config".to_string()]);
    }

    #[test]
    fn test_open_in_editor_rejects_blank_command() {
        let runner = RecordingRunner::default();
        assert!(open_in_editor(&runner, "  ", Path::new("/tmp/config")).is_err());
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_system_runner_missing_program() {
        let err = SystemRunner
            .run("definitely-not-an-editor-4f7c2a", &["/tmp/x"])
            .unwrap_err();
        assert!(matches!(err, Error::Editor { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_status() {
        assert!(SystemRunner.run("true", &[]).is_ok());
        assert!(SystemRunner.run("false", &[]).is_err());
    }
}
