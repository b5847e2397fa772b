//! git command-line client

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::core::{CmdrError, CmdrResult};
use crate::vcs::Vcs;

/// Runs the `git` executable
pub struct GitCli {
    binary: String,
    envs: Vec<(String, String)>,
}

impl GitCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            envs: Vec::new(),
        }
    }

    /// Extra environment for every git invocation
    #[cfg(test)]
    pub fn with_env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.envs.push((key.to_string(), value.into()));
        self
    }

    fn resolve(&self) -> CmdrResult<PathBuf> {
        which::which(&self.binary).map_err(|_| CmdrError::GitNotFound)
    }

    async fn run(&self, cwd: Option<&Path>, subcommand: &str, args: &[&OsStr]) -> CmdrResult<()> {
        let git = self.resolve()?;

        let mut cmd = Command::new(git);
        cmd.arg(subcommand)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        debug!(
            "Running: git {} {}",
            subcommand,
            args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ")
        );
        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CmdrError::git(subcommand, stderr.trim()));
        }

        Ok(())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn clone_repo(&self, url: &str, dest: &Path) -> CmdrResult<()> {
        // `--` keeps a URL starting with `-` from being read as an option
        let args = [OsStr::new("--quiet"), OsStr::new("--"), OsStr::new(url), dest.as_os_str()];
        self.run(None, "clone", &args).await
    }

    async fn init(&self, dir: &Path) -> CmdrResult<()> {
        self.run(Some(dir), "init", &[OsStr::new("--quiet")]).await
    }

    async fn add(&self, dir: &Path, pathspec: &str) -> CmdrResult<()> {
        self.run(Some(dir), "add", &[OsStr::new("--"), OsStr::new(pathspec)]).await
    }

    async fn commit(&self, dir: &Path, message: &str) -> CmdrResult<()> {
        self.run(
            Some(dir),
            "commit",
            &[OsStr::new("--quiet"), OsStr::new("-m"), OsStr::new(message)],
        )
        .await
    }
}
