/*
File: cvbuild-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations used by the pipeline.
*/
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cvbuild_common::error::{CvBuildError, Result};
use tracing::{debug, error, info, warn};

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        CvBuildError::from(e)
    })
}

/// Removes a file.
pub fn remove_file(path: &Path) -> Result<()> {
    debug!("Removing file: {}", path.display());
    fs::remove_file(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove file {}: {}", path.display(), e);
        }
        CvBuildError::from(e)
    })
}

/// Removes a directory and all its contents recursively.
pub fn remove_directory_recursive(path: &Path) -> Result<()> {
    debug!("Removing directory recursively: {}", path.display());
    fs::remove_dir_all(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove dir_all {}: {}", path.display(), e);
        }
        CvBuildError::from(e)
    })
}

/// Removes `path` if present. A missing path is not an error.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => remove_directory_recursive(path),
        Ok(_) => remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CvBuildError::from(e)),
    }
}

/// Deletes `path` if it exists and creates it again, empty.
pub fn recreate_dir(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        info!("Directory {} already exists. Deleting it.", path.display());
        remove_if_exists(path)?;
    }
    create_dir_all(path)
}

/// Renames `from` to `to`. Both must live on the same filesystem.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    debug!("Renaming {} -> {}", from.display(), to.display());
    fs::rename(from, to).map_err(|e| {
        error!(
            "Failed rename {} -> {}: {}",
            from.display(),
            to.display(),
            e
        );
        CvBuildError::IoError(format!(
            "Failed to rename {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))
    })
}

/// Lists directory entries, returning basic info.
/// Skips entries that cause errors during reading.
pub fn list_directory_entries(
    dir_path: &Path,
) -> Result<Vec<(String, PathBuf, bool /* is_dir */)>> {
    debug!("Listing directory entries for: {}", dir_path.display());
    let mut entries = Vec::new();
    let read_dir = fs::read_dir(dir_path).map_err(|e| {
        error!("Failed to read directory {}: {}", dir_path.display(), e);
        CvBuildError::from(e)
    })?;
    for entry_res in read_dir {
        match entry_res {
            Ok(entry) => {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();
                match entry.file_type() {
                    Ok(file_type) => entries.push((name, path, file_type.is_dir())),
                    Err(e) => warn!("Failed to get file type for {}: {}", path.display(), e),
                }
            }
            Err(e) => warn!("Error reading entry in {}: {}", dir_path.display(), e),
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
