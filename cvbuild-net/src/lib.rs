// cvbuild-net/src/lib.rs
use std::path::Path;

use async_trait::async_trait;
use cvbuild_common::error::Result;

pub mod http;
pub mod validation;

pub use http::HttpDownloader;
pub use validation::{validate_url, verify_checksum, verify_checksum_async};

/// Fetches a remote file to a local path.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads `url` to `dest`, verifying `sha256` when given. On failure
    /// nothing is left at `dest`.
    async fn download(&self, url: &str, dest: &Path, sha256: Option<&str>) -> Result<()>;
}
