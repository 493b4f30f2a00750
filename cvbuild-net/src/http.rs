// cvbuild-net/src/http.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use cvbuild_common::error::{CvBuildError, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tokio::fs::{self, File as TokioFile};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use crate::validation::{validate_url, verify_checksum_async};
use crate::Downloader;

const DOWNLOAD_TIMEOUT_SECS: u64 = 900;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "cvbuild (Rust; OpenCV static build)";

/// Downloads over HTTPS with reqwest, streaming into a temporary file next to
/// the destination and renaming it into place once complete.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path, sha256: Option<&str>) -> Result<()> {
        validate_url(url)?;
        let temp_path = temp_download_path(dest);
        match download_and_verify(&self.client, url, &temp_path, dest, sha256).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Download failed from {}: {}", url, e);
                if fs::metadata(&temp_path).await.is_ok() {
                    if let Err(rm_err) = fs::remove_file(&temp_path).await {
                        warn!(
                            "Could not remove partial download {}: {}",
                            temp_path.display(),
                            rm_err
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| CvBuildError::HttpError(format!("Failed to build HTTP client: {e}")))
}

fn temp_download_path(final_path: &Path) -> PathBuf {
    let temp_filename = format!(
        ".{}.download",
        final_path.file_name().unwrap_or_default().to_string_lossy()
    );
    final_path.with_file_name(temp_filename)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn progress_bar(total: Option<u64>, label: String) -> ProgressBar {
    let pb = match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::with_template(
                "{msg} [{bar:30.blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
            ) {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.blue.bold} {msg} {bytes}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        }
    };
    pb.set_message(label);
    pb
}

async fn download_and_verify(
    client: &Client,
    url: &str,
    temp_path: &Path,
    final_path: &Path,
    sha256_expected: Option<&str>,
) -> Result<()> {
    debug!("Downloading {} to temporary path: {}", url, temp_path.display());
    if fs::metadata(temp_path).await.is_ok() {
        if let Err(e) = fs::remove_file(temp_path).await {
            warn!(
                "Could not remove existing temporary file {}: {}",
                temp_path.display(),
                e
            );
        }
    }

    let response = client.get(url).send().await.map_err(|e| {
        debug!("HTTP request failed for {url}: {e}");
        CvBuildError::HttpError(format!("HTTP request failed for {url}: {e}"))
    })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);

    if !status.is_success() {
        return match status {
            StatusCode::NOT_FOUND => Err(CvBuildError::DownloadError(
                file_label(final_path),
                url.to_string(),
                "Resource not found (404)".to_string(),
            )),
            StatusCode::FORBIDDEN => Err(CvBuildError::DownloadError(
                file_label(final_path),
                url.to_string(),
                "Access forbidden (403)".to_string(),
            )),
            _ => Err(CvBuildError::HttpError(format!(
                "HTTP error {status} for URL {url}"
            ))),
        };
    }

    let mut temp_file = TokioFile::create(temp_path).await.map_err(|e| {
        CvBuildError::IoError(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    let pb = progress_bar(response.content_length(), file_label(final_path));
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            pb.abandon();
            CvBuildError::HttpError(format!("Failed to read response body from {url}: {e}"))
        })?;
        temp_file.write_all(&chunk).await.map_err(|e| {
            pb.abandon();
            CvBuildError::IoError(format!(
                "Failed to write download stream to {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        pb.inc(chunk.len() as u64);
    }
    temp_file.flush().await?;
    drop(temp_file);
    pb.finish_and_clear();
    debug!("Finished writing download stream to temp file.");

    match sha256_expected {
        Some(expected) => {
            verify_checksum_async(temp_path, expected).await?;
            debug!("Checksum verified for {}", temp_path.display());
        }
        None => debug!(
            "No checksum configured for {}, skipping verification",
            final_path.display()
        ),
    }

    fs::rename(temp_path, final_path).await.map_err(|e| {
        CvBuildError::IoError(format!(
            "Failed to move temp file {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        ))
    })?;
    debug!("Moved download to final location: {}", final_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_hidden_sibling() {
        let p = temp_download_path(Path::new("/work/opencv-4.11.0.tar.gz"));
        assert_eq!(p, PathBuf::from("/work/.opencv-4.11.0.tar.gz.download"));
    }

    #[tokio::test]
    async fn plain_http_is_refused_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.tar.gz");
        let downloader = HttpDownloader::new().unwrap();
        let err = downloader
            .download("http://example.com/a.tar.gz", &dest, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CvBuildError::Config(_)));
        assert!(!dest.exists());
    }
}
