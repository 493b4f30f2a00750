use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CvBuildError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("HttpError: {0}")]
    HttpError(String),

    #[error("Checksum Error: {0}")]
    ChecksumError(String),

    #[error("Extraction Error: {0}")]
    ExtractError(String),

    #[error("Source tree missing: {0}")]
    SourceMissing(String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Failed to execute command: {0}")]
    CommandExec(String),

    #[error("Command '{program}' exited with status {}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandFailed { program: String, code: Option<i32> },
}

impl CvBuildError {
    /// Process exit code to report for this error. A failed child propagates
    /// its own status; anything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CvBuildError::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for CvBuildError {
    fn from(err: std::io::Error) -> Self {
        CvBuildError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for CvBuildError {
    fn from(err: reqwest::Error) -> Self {
        CvBuildError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for CvBuildError {
    fn from(err: serde_json::Error) -> Self {
        CvBuildError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CvBuildError>;
