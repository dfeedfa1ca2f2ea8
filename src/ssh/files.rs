// ABOUTME: Small filesystem helpers shared by the config and authorized_keys stores
// ABOUTME: Creates files and parent directories with SSH-appropriate permissions

use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE_MODE: u32 = 0o644;
pub const AUTHORIZED_KEYS_MODE: u32 = 0o600;
pub const SSH_DIR_MODE: u32 = 0o700;

/// Makes sure `path` exists with exactly `mode`, creating the parent
/// directory (0700) and the file as needed. The mode is applied even when the
/// file already existed.
pub fn ensure_exists(path: &Path, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_private_dir(parent)?;
        }
    }

    if !path.exists() {
        debug!("Creating {} with mode {:o}", path.display(), mode);
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        options
            .open(path)
            .map_err(|e| Error::io("create", path, e))?;
    }

    set_mode(path, mode)
}

/// Appends raw bytes to an existing file.
pub fn append_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| Error::io("open", path, e))?;
    file.write_all(bytes)
        .map_err(|e| Error::io("write to", path, e))
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io("read", path, e))
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io("read", path, e))
}

fn create_private_dir(dir: &Path) -> Result<()> {
    debug!("Creating directory {}", dir.display());
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(SSH_DIR_MODE);
    }
    builder
        .create(dir)
        .map_err(|e| Error::io("create directory", dir, e))
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::io("set permissions on", path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
