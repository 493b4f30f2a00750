// cvbuild-common/src/model/source.rs
use serde::Serialize;
use url::Url;

use crate::error::{CvBuildError, Result};

/// A tagged release tarball as served by GitHub's `archive/refs/tags` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceArchive {
    pub url: String,
    pub project: String,
    pub version: String,
}

impl SourceArchive {
    /// Parses `https://<host>/<owner>/<repo>/archive/refs/tags/<tag>.tar.gz`.
    pub fn from_url(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw)
            .map_err(|e| CvBuildError::Config(format!("Invalid source URL '{raw}': {e}")))?;
        if parsed.scheme() != "https" {
            return Err(CvBuildError::Config(format!(
                "Source URL must use https, got '{}' in {raw}",
                parsed.scheme()
            )));
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let archive_pos = segments.iter().position(|s| *s == "archive").ok_or_else(|| {
            CvBuildError::Config(format!("URL is not a release archive URL: {raw}"))
        })?;
        if archive_pos == 0 {
            return Err(CvBuildError::Config(format!(
                "Cannot determine project name from URL: {raw}"
            )));
        }
        let project = segments[archive_pos - 1].to_string();

        let file_name = segments.last().copied().unwrap_or_default();
        let tag = file_name
            .strip_suffix(".tar.gz")
            .or_else(|| file_name.strip_suffix(".tgz"))
            .ok_or_else(|| {
                CvBuildError::Config(format!("Source URL must point to a .tar.gz archive: {raw}"))
            })?;
        if tag.is_empty() || segments.len() <= archive_pos + 1 {
            return Err(CvBuildError::Config(format!(
                "Source URL carries no release tag: {raw}"
            )));
        }

        Ok(Self {
            url: raw.to_string(),
            project,
            version: tag.to_string(),
        })
    }

    pub fn tarball_name(&self) -> String {
        format!("{}.tar.gz", self.extracted_dir_name())
    }

    /// Name of the top-level directory inside the tarball.
    pub fn extracted_dir_name(&self) -> String {
        format!("{}-{}", self.project, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pinned_opencv_release() {
        let archive = SourceArchive::from_url(
            "https://github.com/opencv/opencv/archive/refs/tags/4.11.0.tar.gz",
        )
        .unwrap();
        assert_eq!(archive.project, "opencv");
        assert_eq!(archive.version, "4.11.0");
        assert_eq!(archive.tarball_name(), "opencv-4.11.0.tar.gz");
        assert_eq!(archive.extracted_dir_name(), "opencv-4.11.0");
    }

    #[test]
    fn keeps_tag_prefix_verbatim() {
        let archive =
            SourceArchive::from_url("https://example.com/acme/widget/archive/refs/tags/v1.2.tgz")
                .unwrap();
        assert_eq!(archive.extracted_dir_name(), "widget-v1.2");
    }

    #[test]
    fn rejects_non_archive_urls() {
        assert!(SourceArchive::from_url("ftp://github.com/a/b/archive/1.0.tar.gz").is_err());
        assert!(SourceArchive::from_url("https://github.com/a/b/releases/1.0.tar.gz").is_err());
        assert!(SourceArchive::from_url("https://github.com/a/b/archive/1.0.zip").is_err());
        assert!(SourceArchive::from_url("not a url").is_err());
    }

    #[test]
    fn plain_http_is_refused_up_front() {
        let err = SourceArchive::from_url(
            "http://github.com/opencv/opencv/archive/refs/tags/4.11.0.tar.gz",
        )
        .unwrap_err();
        assert!(err.to_string().contains("must use https"));
    }
}
