// cvbuild-aio/src/process.rs
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cvbuild_common::error::{CvBuildError, Result};
use tokio::process::Command;
use tracing::{debug, error, info};

/// One external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:,+@%".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Runs external commands. Implementations must return `Ok` only when the
/// command exited with status zero.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns real processes. Stdio is inherited so the tool's own output is
/// what the user sees.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        debug!("Running command: {} (cwd: {:?})", invocation, invocation.cwd);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.kill_on_drop(true);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd.status().await.map_err(|e| {
            error!("Failed to execute {}: {}", invocation.program, e);
            CvBuildError::CommandExec(format!("{}: {}", invocation.program, e))
        })?;

        if status.success() {
            debug!("Command finished successfully: {}", invocation.program);
            Ok(())
        } else {
            error!("{} failed with status: {}", invocation.program, status);
            Err(CvBuildError::CommandFailed {
                program: invocation.program.clone(),
                code: status.code(),
            })
        }
    }
}

/// Logs each invocation instead of running it.
#[derive(Debug, Default, Clone)]
pub struct DryRunRunner {
    seen: Arc<Mutex<Vec<Invocation>>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invocations recorded so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.seen
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        match &invocation.cwd {
            Some(dir) => info!("[dry-run] (in {}) {}", dir.display(), invocation),
            None => info!("[dry-run] {}", invocation),
        }
        if let Ok(mut guard) = self.seen.lock() {
            guard.push(invocation.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_only_when_needed() {
        let inv = Invocation::new("cmake")
            .arg("-G")
            .arg("Unix Makefiles")
            .arg("-DCPU_BASELINE=")
            .arg("-DCMAKE_OSX_ARCHITECTURES=x86_64;arm64")
            .arg("..");
        assert_eq!(
            inv.to_string(),
            "cmake -G 'Unix Makefiles' -DCPU_BASELINE= '-DCMAKE_OSX_ARCHITECTURES=x86_64;arm64' .."
        );
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[tokio::test]
    async fn dry_run_records_in_order() {
        let runner = DryRunRunner::new();
        runner.run(&Invocation::new("make").arg("-j4")).await.unwrap();
        runner
            .run(&Invocation::new("make").arg("install").current_dir("/b"))
            .await
            .unwrap();
        let seen = runner.invocations();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].args, vec!["install"]);
        assert_eq!(seen[1].cwd, Some(PathBuf::from("/b")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_maps_exit_status() {
        SystemRunner
            .run(&Invocation::new("sh").args(["-c", "exit 0"]))
            .await
            .unwrap();
        let err = SystemRunner
            .run(&Invocation::new("sh").args(["-c", "exit 3"]))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn missing_program_is_an_exec_error() {
        let err = SystemRunner
            .run(&Invocation::new("cvbuild-no-such-tool-xyz"))
            .await
            .unwrap_err();
        assert!(matches!(err, CvBuildError::CommandExec(_)));
    }
}
