//! Path utilities for the data directory and database file.
//!
//! Returns `PathBuf` and `PathError`; no interactive I/O.

mod database;
mod error;
mod platform;

pub use database::{DATABASE_FILE_NAME, database_path, database_path_in};
pub use error::PathError;
pub use platform::{DATA_DIR_ENV, data_root};
