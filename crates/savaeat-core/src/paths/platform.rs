//! Data directory resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SAVAEAT_DATA_DIR";

const APP_DIR_NAME: &str = "savaeat";

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `SAVAEAT_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/savaeat`)
///
/// The directory is created if missing.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = resolve_data_root(
        env::var(DATA_DIR_ENV).ok().as_deref(),
        dirs::data_local_dir().as_deref(),
    )?;
    ensure_dir(&root)?;
    Ok(root)
}

/// Pure resolution step behind `data_root`.
pub(super) fn resolve_data_root(
    override_dir: Option<&str>,
    system_data_dir: Option<&Path>,
) -> Result<PathBuf, PathError> {
    if let Some(dir) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    system_data_dir
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(PathError::NoDataDir)
}

pub(super) fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| PathError::CreateFailed {
        path: path.to_path_buf(),
        source,
    })
}
