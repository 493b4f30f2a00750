// cvbuild-core/src/fetch.rs
//! Downloads a release tarball and unpacks it to a canonical source path.

use std::path::{Path, PathBuf};

use cvbuild_aio::{extract_archive_async, fs};
use cvbuild_common::error::{CvBuildError, Result};
use cvbuild_common::model::SourceArchive;
use cvbuild_net::Downloader;
use tracing::{debug, info, warn};

/// Downloads `archive` into `download_dir`, extracts it next to `target_dir`
/// and renames the extracted tree to `target_dir`. The tarball is removed on
/// success. Nothing is ever left half-extracted at `target_dir`: unpacking
/// happens in a staging directory that is dropped on any error.
pub async fn fetch_source(
    archive: &SourceArchive,
    target_dir: &Path,
    download_dir: &Path,
    sha256: Option<&str>,
    downloader: &dyn Downloader,
) -> Result<PathBuf> {
    let parent = target_dir.parent().ok_or_else(|| {
        CvBuildError::Config(format!(
            "Source directory {} has no parent",
            target_dir.display()
        ))
    })?;
    fs::create_dir_all(parent)?;
    fs::create_dir_all(download_dir)?;

    let tarball = download_dir.join(archive.tarball_name());
    info!("Downloading repository tarball from {}...", archive.url);
    downloader.download(&archive.url, &tarball, sha256).await?;

    info!("Extracting {}...", archive.tarball_name());
    let staging = tempfile::Builder::new()
        .prefix(".cvbuild-extract-")
        .tempdir_in(parent)?;
    extract_archive_async(&tarball, staging.path()).await?;

    let extracted_root = locate_extracted_root(staging.path(), &archive.extracted_dir_name())?;
    if target_dir.symlink_metadata().is_ok() {
        warn!(
            "Source directory {} already exists. Replacing it.",
            target_dir.display()
        );
        fs::remove_if_exists(target_dir)?;
    }
    fs::rename(&extracted_root, target_dir)?;
    info!("Repository extracted to {}", target_dir.display());

    if let Err(e) = staging.close() {
        warn!("Could not remove extraction staging directory: {}", e);
    }

    fs::remove_file(&tarball)?;
    info!("Removed tarball {}", archive.tarball_name());
    Ok(target_dir.to_path_buf())
}

/// Finds the top-level directory the tarball unpacked to. Prefers the name
/// derived from the release tag and falls back to a lone top-level directory.
fn locate_extracted_root(staging: &Path, expected_name: &str) -> Result<PathBuf> {
    let expected = staging.join(expected_name);
    if expected.is_dir() {
        return Ok(expected);
    }

    let entries = fs::list_directory_entries(staging)?;
    match entries.as_slice() {
        [(name, path, true)] => {
            debug!(
                "Archive root '{}' differs from expected '{}', using it anyway",
                name, expected_name
            );
            Ok(path.clone())
        }
        _ => Err(CvBuildError::ExtractError(format!(
            "Archive did not contain the expected top-level directory '{}' ({} entries found)",
            expected_name,
            entries.len()
        ))),
    }
}
