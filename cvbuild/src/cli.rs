// cvbuild/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use cvbuild_common::error::Result;
use cvbuild_common::Config;

pub mod build;
pub mod flags;
pub mod paths;

use crate::cli::build::BuildArgs;
use crate::cli::flags::FlagsArgs;
use crate::cli::paths::PathsArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "cvbuild", bin_name = "cvbuild")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root holding `3rdparty/` and `binary/` [env: CVB_ROOT]
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Tagged source archive URL [env: CVB_OPENCV_URL]
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, configure, build and install OpenCV
    Build(BuildArgs),
    /// Print the configure arguments a preset passes to cmake
    Flags(FlagsArgs),
    /// Print the resolved directory layout
    Paths(PathsArgs),
}

impl CliArgs {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        if let Some(root) = &self.root {
            config = config.with_root(root)?;
        }
        if let Some(url) = &self.url {
            config = config.with_source_url(url)?;
        }
        Ok(config)
    }
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Build(command) => command.run(config).await,
            Self::Flags(command) => command.run(config),
            Self::Paths(command) => command.run(config),
        }
    }
}
