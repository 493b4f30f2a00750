// cvbuild/src/cli/build.rs

use clap::{Args, ValueEnum};
use cvbuild_common::error::Result;
use cvbuild_common::{Config, Preset};
use cvbuild_core::{
    BuildPlan, CommandRunner, DryRunRunner, FetchMode, HttpDownloader, Pipeline, SystemRunner,
};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FetchArg {
    /// Fetch when the preset does by default
    #[default]
    Auto,
    /// Always download a fresh source tree
    Always,
    /// Build the existing source tree
    Never,
}

impl From<FetchArg> for FetchMode {
    fn from(arg: FetchArg) -> Self {
        match arg {
            FetchArg::Auto => FetchMode::Auto,
            FetchArg::Always => FetchMode::Always,
            FetchArg::Never => FetchMode::Never,
        }
    }
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Configure preset to build with
    #[arg(long, value_enum, default_value_t = Preset::Universal)]
    pub preset: Preset,

    /// Whether to download the source tree first
    #[arg(long, value_enum, default_value_t = FetchArg::Auto)]
    pub fetch: FetchArg,

    /// Keep the fetched source tree; only the scratch build dir is removed
    #[arg(long)]
    pub keep_sources: bool,

    /// Parallel make jobs (defaults to the logical core count) [env: CVB_JOBS]
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// Expected SHA-256 of the source archive [env: CVB_OPENCV_SHA256]
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,

    /// Log the commands and filesystem changes instead of making them
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildArgs {
    #[instrument(skip(self, config), fields(preset = %self.preset))]
    pub async fn run(&self, config: &Config) -> Result<()> {
        let mut config = config.clone();
        if let Some(jobs) = self.jobs {
            config.jobs = Some(jobs as usize);
        }
        if let Some(sha) = &self.sha256 {
            config.sha256 = Some(sha.trim().to_lowercase());
        }

        let plan = BuildPlan::new(&config, self.preset, self.fetch.into(), self.keep_sources)
            .with_dry_run(self.dry_run);
        debug!("Resolved build plan: {:?}", plan);

        let downloader = HttpDownloader::new()?;
        let system = SystemRunner;
        let dry = DryRunRunner::new();
        let runner: &dyn CommandRunner = if self.dry_run { &dry } else { &system };

        Pipeline::new(&downloader, runner).run(&plan).await
    }
}
