// cvbuild-core/src/build.rs
use std::path::Path;

use cvbuild_aio::{CommandRunner, Invocation};
use cvbuild_common::error::Result;
use cvbuild_common::model::ConfigureOptions;
use tracing::info;

const CMAKE: &str = "cmake";
const MAKE: &str = "make";

/// Runs configure, parallel build and install in an already prepared build
/// directory. The first failing step aborts the rest.
pub struct Builder<'a> {
    runner: &'a dyn CommandRunner,
    jobs: usize,
}

impl<'a> Builder<'a> {
    pub fn new(runner: &'a dyn CommandRunner, jobs: usize) -> Self {
        Self {
            runner,
            jobs: jobs.max(1),
        }
    }

    /// Builder using the host's logical core count.
    pub fn with_host_jobs(runner: &'a dyn CommandRunner) -> Self {
        Self::new(runner, num_cpus::get())
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn invocations(&self, options: &ConfigureOptions, build_dir: &Path) -> [Invocation; 3] {
        [
            Invocation::new(CMAKE)
                .args(options.to_args(".."))
                .current_dir(build_dir),
            Invocation::new(MAKE)
                .arg(format!("-j{}", self.jobs))
                .current_dir(build_dir),
            Invocation::new(MAKE).arg("install").current_dir(build_dir),
        ]
    }

    pub async fn build(&self, options: &ConfigureOptions, build_dir: &Path) -> Result<()> {
        let [configure, compile, install] = self.invocations(options, build_dir);

        info!("==> Running cmake configuration in {}", build_dir.display());
        self.runner.run(&configure).await?;

        info!("==> Building with {} parallel jobs", self.jobs);
        self.runner.run(&compile).await?;

        info!(
            "==> Installing into {}",
            options.install_prefix.display()
        );
        self.runner.run(&install).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use cvbuild_aio::DryRunRunner;
    use cvbuild_common::model::Preset;

    use super::*;

    #[tokio::test]
    async fn runs_configure_build_install_in_build_dir() {
        let runner = DryRunRunner::new();
        let opts = ConfigureOptions::for_preset(Preset::NeonDotprod, Path::new("/out"));
        Builder::new(&runner, 8)
            .build(&opts, Path::new("/src/.build"))
            .await
            .unwrap();

        let seen = runner.invocations();
        let programs: Vec<_> = seen
            .iter()
            .map(|i| (i.program.as_str(), i.args.last().cloned().unwrap_or_default()))
            .collect();
        assert_eq!(
            programs,
            vec![
                ("cmake", "..".to_string()),
                ("make", "-j8".to_string()),
                ("make", "install".to_string()),
            ]
        );
        assert!(seen
            .iter()
            .all(|i| i.cwd == Some(PathBuf::from("/src/.build"))));
    }

    #[test]
    fn host_jobs_match_logical_cores() {
        let runner = DryRunRunner::new();
        assert_eq!(Builder::with_host_jobs(&runner).jobs(), num_cpus::get());
        assert_eq!(Builder::new(&runner, 0).jobs(), 1);
    }
}
