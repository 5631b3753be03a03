//! Output directory handling.

use std::{
    fs::{self, DirBuilder},
    io::ErrorKind,
    path::Path,
};

use log::info;

use crate::StaticMapError;

/// Permission bits for newly created directories on Unix.
pub const DIR_MODE: u32 = 0o755;

/// Whether [`ensure_dir`] had to create the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    Existing,
}

/// Makes sure `path` exists as a directory, creating it and any missing
/// parents if needed.
///
/// # Errors
///
/// Returns [`StaticMapError::NotADirectory`] if `path` exists but is not a
/// directory, and [`StaticMapError::CreateDir`] if creation fails for any
/// reason other than the directory appearing concurrently.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<DirStatus, StaticMapError> {
    let path = path.as_ref();

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            info!(path = path.display().to_string(); "Output directory already exists");
            return Ok(DirStatus::Existing);
        }
        Ok(_) => return Err(StaticMapError::NotADirectory(path.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    info!(path = path.display().to_string(); "Output directory does not exist, creating");

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    match builder.create(path) {
        Ok(()) => Ok(DirStatus::Created),
        Err(err) if err.kind() == ErrorKind::AlreadyExists && path.is_dir() => {
            Ok(DirStatus::Existing)
        }
        Err(source) => Err(StaticMapError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}
