// cvbuild-aio/src/extract.rs
// Handles source archive extraction off the async runtime.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use cvbuild_common::error::{CvBuildError, Result};
use flate2::read::GzDecoder;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    TarGz,
    Tar,
}

fn archive_kind(archive_path: &Path) -> Result<ArchiveKind> {
    let name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(ArchiveKind::TarGz)
    } else if name.ends_with(".tar") {
        Ok(ArchiveKind::Tar)
    } else {
        Err(CvBuildError::ExtractError(format!(
            "Unsupported archive type: {}",
            archive_path.display()
        )))
    }
}

/// Extracts a tarball into `target_dir`, creating it if needed. Entries that
/// would land outside `target_dir` are skipped by `tar` itself.
pub async fn extract_archive_async(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let kind = archive_kind(archive_path)?;
    debug!(
        "Extracting archive '{}' ({:?}) to '{}'",
        archive_path.display(),
        kind,
        target_dir.display()
    );

    let archive_path = archive_path.to_path_buf();
    let target_dir = target_dir.to_path_buf();
    tokio::task::spawn_blocking(move || extract_blocking(kind, &archive_path, &target_dir))
        .await
        .map_err(|e| CvBuildError::ExtractError(format!("JoinError in TAR extraction: {e}")))?
}

fn extract_blocking(kind: ArchiveKind, archive_path: &Path, target_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(target_dir)?;
    let file = BufReader::new(File::open(archive_path)?);
    let reader: Box<dyn Read> = match kind {
        ArchiveKind::TarGz => Box::new(GzDecoder::new(file)),
        ArchiveKind::Tar => Box::new(file),
    };
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.unpack(target_dir).map_err(|e| {
        CvBuildError::ExtractError(format!(
            "Failed to unpack {}: {}",
            archive_path.display(),
            e
        ))
    })?;
    debug!("Finished extracting {}", archive_path.display());
    Ok(())
}
