// cvbuild-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::Result;
use super::model::{Preset, SourceArchive};

pub const DEFAULT_OPENCV_URL: &str =
    "https://github.com/opencv/opencv/archive/refs/tags/4.11.0.tar.gz";
const THIRD_PARTY_DIR_NAME: &str = "3rdparty";
const BINARY_DIR_NAME: &str = "binary";
const BUILD_DIR_NAME: &str = ".build";

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub source: SourceArchive,
    pub sha256: Option<String>,
    pub jobs: Option<usize>,
}

impl Config {
    /// Loads configuration from `CVB_*` environment variables, falling back to
    /// the current directory and the pinned OpenCV release.
    pub fn load() -> Result<Self> {
        debug!("Loading cvbuild configuration");
        Self::load_with(|key| env::var(key).ok())
    }

    /// Same as [`Config::load`] but with an injectable variable lookup.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let root = match non_empty("CVB_ROOT") {
            Some(dir) => absolutize(PathBuf::from(dir))?,
            None => {
                debug!("CVB_ROOT not set, using current directory as project root");
                env::current_dir()?
            }
        };
        debug!("Effective project root: {}", root.display());

        let url = non_empty("CVB_OPENCV_URL").unwrap_or_else(|| DEFAULT_OPENCV_URL.to_string());
        let source = SourceArchive::from_url(&url)?;

        let sha256 = non_empty("CVB_OPENCV_SHA256").map(|s| s.trim().to_lowercase());

        let jobs = non_empty("CVB_JOBS").and_then(|raw| match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                warn!("Ignoring invalid CVB_JOBS value '{}'", raw);
                None
            }
        });

        debug!("Configuration loaded successfully.");
        Ok(Self {
            root,
            source,
            sha256,
            jobs,
        })
    }

    /// Replaces the project root. Relative paths resolve against the current
    /// directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Result<Self> {
        self.root = absolutize(root.into())?;
        Ok(self)
    }

    pub fn with_source_url(mut self, url: &str) -> Result<Self> {
        self.source = SourceArchive::from_url(url)?;
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn third_party_dir(&self) -> PathBuf {
        self.root.join(THIRD_PARTY_DIR_NAME)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.third_party_dir().join(self.source.extracted_dir_name())
    }

    pub fn build_dir(&self) -> PathBuf {
        self.source_dir().join(BUILD_DIR_NAME)
    }

    pub fn binary_dir(&self) -> PathBuf {
        self.root.join(BINARY_DIR_NAME)
    }

    /// Directory the downloaded tarball lands in before extraction.
    pub fn download_dir(&self) -> PathBuf {
        self.root.clone()
    }

    /// Install prefix for a preset.
    pub fn output_dir(&self, preset: Preset) -> PathBuf {
        match preset {
            Preset::Universal => self
                .binary_dir()
                .join(format!("{}-macos", self.source.extracted_dir_name())),
            Preset::NeonDotprod => self
                .third_party_dir()
                .join(BINARY_DIR_NAME)
                .join(format!("{}-macos", self.source.project)),
        }
    }

    /// Job count for the parallel build step: override or logical core count.
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
