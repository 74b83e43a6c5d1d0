use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::platform::DATA_DIR_ENV;

/// Failure to locate or create the data directory.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("no platform data directory found; set {DATA_DIR_ENV}")]
    NoDataDir,

    /// Something other than a directory sits where one is needed.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot create {}: {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
