// cvbuild-net/src/validation.rs
use std::fs::File;
use std::io;
use std::path::Path;

use cvbuild_common::error::{CvBuildError, Result};
use sha2::{Digest, Sha256};
use url::Url;

pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    tracing::debug!("Verifying checksum for: {}", path.display());
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let bytes_copied = io::copy(&mut file, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    tracing::debug!(
        "Calculated SHA256: {} ({} bytes read)",
        actual,
        bytes_copied
    );
    tracing::debug!("Expected SHA256:   {}", expected);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(CvBuildError::ChecksumError(format!(
            "Checksum mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        )))
    }
}

/// Runs [`verify_checksum`] on the blocking pool.
pub async fn verify_checksum_async(path: &Path, expected: &str) -> Result<()> {
    let path = path.to_path_buf();
    let expected = expected.to_string();
    tokio::task::spawn_blocking(move || verify_checksum(&path, &expected))
        .await
        .map_err(|e| CvBuildError::ChecksumError(format!("JoinError in checksum task: {e}")))?
}

/// Validates a URL, ensuring it uses the HTTPS scheme.
pub fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| CvBuildError::Config(format!("Failed to parse URL '{url_str}': {e}")))?;
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(CvBuildError::Config(format!(
            "Invalid URL scheme for '{}': Must be https, but got '{}'",
            url_str,
            url.scheme()
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn checksum_matches_case_insensitively() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let digest = "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824";
        verify_checksum(file.path(), digest).unwrap();
    }

    #[test]
    fn checksum_mismatch_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let err = verify_checksum(file.path(), "00").unwrap_err();
        assert!(matches!(err, CvBuildError::ChecksumError(_)));
    }

    #[tokio::test]
    async fn checksum_runs_off_the_async_worker() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let digest = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        verify_checksum_async(file.path(), digest).await.unwrap();
        let err = verify_checksum_async(file.path(), "00").await.unwrap_err();
        assert!(matches!(err, CvBuildError::ChecksumError(_)));
    }

    #[test]
    fn only_https_is_accepted() {
        assert!(validate_url("https://github.com/opencv/opencv").is_ok());
        assert!(validate_url("http://github.com/opencv/opencv").is_err());
        assert!(validate_url("github.com").is_err());
    }
}
