//! Database path resolution.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::{data_root, ensure_dir};

pub const DATABASE_FILE_NAME: &str = "savaeat.db";

/// Path to the `SQLite` database file under the data root.
///
/// The `data/` subdirectory is created if it doesn't exist.
pub fn database_path() -> Result<PathBuf, PathError> {
    database_path_in(&data_root()?)
}

/// Same as `database_path`, rooted at an explicit directory.
pub fn database_path_in(root: &Path) -> Result<PathBuf, PathError> {
    let data_dir = root.join("data");
    ensure_dir(&data_dir)?;
    Ok(data_dir.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_path_in_creates_data_dir() {
        let tmp = tempdir().unwrap();
        let path = database_path_in(tmp.path()).unwrap();
        assert!(path.ends_with("data/savaeat.db"));
        assert!(tmp.path().join("data").is_dir());
    }
}
