// cvbuild-core/src/pipeline.rs
//! The linear fetch → configure → build → install → cleanup sequence.

use std::path::PathBuf;

use cvbuild_aio::{fs, CommandRunner};
use cvbuild_common::config::Config;
use cvbuild_common::error::{CvBuildError, Result};
use cvbuild_common::model::{Cleanup, ConfigureOptions, Preset, SourceArchive};
use cvbuild_net::Downloader;
use tracing::{debug, info};

use crate::build::Builder;
use crate::fetch::fetch_source;

/// Whether the pipeline downloads the source tree before building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Follow the preset's default.
    #[default]
    Auto,
    Always,
    Never,
}

/// Fully resolved inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub preset: Preset,
    pub source: SourceArchive,
    pub sha256: Option<String>,
    pub third_party_dir: PathBuf,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    pub download_dir: PathBuf,
    pub fetch: bool,
    pub cleanup: Cleanup,
    pub jobs: usize,
    /// Log filesystem changes instead of making them.
    pub dry_run: bool,
}

impl BuildPlan {
    pub fn new(config: &Config, preset: Preset, fetch: FetchMode, keep_sources: bool) -> Self {
        let fetch = match fetch {
            FetchMode::Auto => preset.fetches_by_default(),
            FetchMode::Always => true,
            FetchMode::Never => false,
        };
        // A tree this run did not fetch is never deleted.
        let cleanup = if keep_sources || !fetch {
            Cleanup::BuildDir
        } else {
            preset.cleanup()
        };
        Self {
            preset,
            source: config.source.clone(),
            sha256: config.sha256.clone(),
            third_party_dir: config.third_party_dir(),
            source_dir: config.source_dir(),
            build_dir: config.build_dir(),
            output_dir: config.output_dir(preset),
            download_dir: config.download_dir(),
            fetch,
            cleanup,
            jobs: config.jobs(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn configure_options(&self) -> ConfigureOptions {
        ConfigureOptions::for_preset(self.preset, &self.output_dir)
    }
}

pub struct Pipeline<'a> {
    downloader: &'a dyn Downloader,
    runner: &'a dyn CommandRunner,
}

impl<'a> Pipeline<'a> {
    pub fn new(downloader: &'a dyn Downloader, runner: &'a dyn CommandRunner) -> Self {
        Self { downloader, runner }
    }

    /// Runs every step in order. Any failure returns immediately and leaves
    /// the filesystem as it was at that point.
    pub async fn run(&self, plan: &BuildPlan) -> Result<()> {
        info!(
            "Building {} {} with preset '{}'",
            plan.source.project, plan.source.version, plan.preset
        );
        debug!("Third party directory path is {}", plan.third_party_dir.display());
        debug!("Source directory path is {}", plan.source_dir.display());
        debug!("Output directory path is {}", plan.output_dir.display());
        debug!("Temporary build directory path is {}", plan.build_dir.display());

        if plan.dry_run {
            info!("[dry-run] Would recreate {}", plan.output_dir.display());
        } else {
            fs::recreate_dir(&plan.output_dir)?;
        }

        if plan.fetch && plan.dry_run {
            info!(
                "[dry-run] Would fetch {} into {}",
                plan.source.url,
                plan.source_dir.display()
            );
        } else if plan.fetch {
            fetch_source(
                &plan.source,
                &plan.source_dir,
                &plan.download_dir,
                plan.sha256.as_deref(),
                self.downloader,
            )
            .await?;
        } else if !plan.source_dir.join("CMakeLists.txt").is_file() {
            return Err(CvBuildError::SourceMissing(format!(
                "{} does not contain CMakeLists.txt; run with --fetch always",
                plan.source_dir.display()
            )));
        } else {
            debug!("Using existing source tree {}", plan.source_dir.display());
        }

        if plan.dry_run {
            info!("[dry-run] Would recreate {}", plan.build_dir.display());
        } else {
            fs::recreate_dir(&plan.build_dir)?;
        }

        Builder::new(self.runner, plan.jobs)
            .build(&plan.configure_options(), &plan.build_dir)
            .await?;

        self.cleanup(plan)?;
        info!("Installed into {}", plan.output_dir.display());
        Ok(())
    }

    fn cleanup(&self, plan: &BuildPlan) -> Result<()> {
        if plan.dry_run {
            let target = match plan.cleanup {
                Cleanup::BuildDir => &plan.build_dir,
                Cleanup::ThirdPartyTree => &plan.third_party_dir,
            };
            info!("[dry-run] Would remove {}", target.display());
            return Ok(());
        }
        match plan.cleanup {
            Cleanup::BuildDir => {
                info!("Removing temporary build directory {}", plan.build_dir.display());
                fs::remove_if_exists(&plan.build_dir)
            }
            Cleanup::ThirdPartyTree => {
                info!(
                    "Removing third party directory {}",
                    plan.third_party_dir.display()
                );
                fs::remove_if_exists(&plan.third_party_dir)
            }
        }
    }
}
