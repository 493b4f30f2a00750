// cvbuild/src/cli/paths.rs
use clap::Args;
use colored::Colorize;
use cvbuild_common::error::Result;
use cvbuild_common::{Config, Preset};

#[derive(Debug, Args)]
pub struct PathsArgs {
    #[arg(long, value_enum, default_value_t = Preset::Universal)]
    pub preset: Preset,
}

impl PathsArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let rows = [
            ("root", config.root().to_path_buf()),
            ("third party", config.third_party_dir()),
            ("source", config.source_dir()),
            ("build", config.build_dir()),
            ("output", config.output_dir(self.preset)),
            (
                "tarball",
                config.download_dir().join(config.source.tarball_name()),
            ),
        ];
        println!("{} {}", "Source archive:".bold(), config.source.url);
        for (label, path) in rows {
            println!("{:>12}  {}", label.blue(), path.display());
        }
        Ok(())
    }
}
