// cvbuild/src/cli/flags.rs
use std::path::PathBuf;

use clap::Args;
use cvbuild_common::error::Result;
use cvbuild_common::{Config, ConfigureOptions, Preset};

#[derive(Debug, Args)]
pub struct FlagsArgs {
    #[arg(long, value_enum, default_value_t = Preset::Universal)]
    pub preset: Preset,

    /// Install prefix to render (defaults to the preset's output directory)
    #[arg(long, value_name = "DIR")]
    pub prefix: Option<PathBuf>,

    /// Print only the disabled feature flags
    #[arg(long)]
    pub features_only: bool,

    /// Print a JSON array instead of one argument per line
    #[arg(long)]
    pub json: bool,
}

impl FlagsArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let prefix = self
            .prefix
            .clone()
            .unwrap_or_else(|| config.output_dir(self.preset));
        let options = ConfigureOptions::for_preset(self.preset, &prefix);
        let args = if self.features_only {
            options.feature_flags()
        } else {
            options.to_args("..")
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&args)?);
        } else {
            for arg in args {
                println!("{arg}");
            }
        }
        Ok(())
    }
}
