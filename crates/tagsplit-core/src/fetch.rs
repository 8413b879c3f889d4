use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::FetchError;

/// What a sync did to the local checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Pulled,
}

/// Brings a local checkout of a remote repository up to date.
pub trait SourceFetcher {
    fn sync(
        &self,
        repository: &str,
        checkout: &Path,
        branch: &str,
    ) -> Result<SyncOutcome, FetchError>;
}

impl<T: SourceFetcher + ?Sized> SourceFetcher for &T {
    fn sync(
        &self,
        repository: &str,
        checkout: &Path,
        branch: &str,
    ) -> Result<SyncOutcome, FetchError> {
        (**self).sync(repository, checkout, branch)
    }
}

/// Fetcher backed by the system `git` binary.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    git: PathBuf,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
        }
    }
}

impl GitFetcher {
    pub fn new(git: impl Into<PathBuf>) -> Self {
        Self { git: git.into() }
    }

    fn run(&self, args: &[&str], cwd: Option<&Path>) -> Result<(), FetchError> {
        let command = format!("{} {}", self.git.display(), args.join(" "));
        log::debug!("running {command}");

        let mut cmd = Command::new(&self.git);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| FetchError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(FetchError::Command {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    fn clone_fresh(&self, repository: &str, checkout: &Path, branch: &str) -> Result<(), FetchError> {
        let io_err = |source| FetchError::Io {
            path: checkout.to_path_buf(),
            source,
        };

        if checkout.exists() {
            log::warn!(
                "{} exists but is not a git checkout, removing it",
                checkout.display()
            );
            fs::remove_dir_all(checkout).map_err(io_err)?;
        }
        if let Some(parent) = checkout.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let target = checkout.to_string_lossy().to_string();
        self.run(
            &["clone", "--branch", branch, repository, target.as_str()],
            None,
        )
    }

    fn pull(&self, checkout: &Path, branch: &str) -> Result<(), FetchError> {
        self.run(&["fetch", "--all"], Some(checkout))?;
        let upstream = format!("origin/{branch}");
        self.run(&["merge", "--ff-only", upstream.as_str()], Some(checkout))
    }
}

impl SourceFetcher for GitFetcher {
    fn sync(
        &self,
        repository: &str,
        checkout: &Path,
        branch: &str,
    ) -> Result<SyncOutcome, FetchError> {
        if checkout.join(".git").exists() {
            self.pull(checkout, branch)?;
            log::info!("pulled {repository} into {}", checkout.display());
            Ok(SyncOutcome::Pulled)
        } else {
            self.clone_fresh(repository, checkout, branch)?;
            log::info!("cloned {repository} into {}", checkout.display());
            Ok(SyncOutcome::Cloned)
        }
    }
}
