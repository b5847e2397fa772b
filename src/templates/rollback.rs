//! Generate-and-rollback transaction

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::{CmdrError, CmdrResult};

/// What a guard removes on rollback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackScope {
    /// The whole target directory tree
    Directory,
    /// A single file
    File,
}

/// Owns a target path that did not exist when the guard was acquired.
///
/// Either [`commit`](Self::commit) or [`rollback`](Self::rollback) must be
/// called. A guard dropped while still armed removes the target synchronously.
#[must_use = "a guard that is neither committed nor rolled back removes its target on drop"]
#[derive(Debug)]
pub struct RollbackGuard {
    target: PathBuf,
    scope: RollbackScope,
    armed: bool,
}

impl RollbackGuard {
    /// Claim `target`, which must not exist yet
    pub fn acquire(target: impl Into<PathBuf>, scope: RollbackScope) -> CmdrResult<Self> {
        let target = target.into();
        if target.symlink_metadata().is_ok() {
            return Err(CmdrError::TargetExists(target));
        }
        Ok(Self {
            target,
            scope,
            armed: true,
        })
    }

    pub fn directory(target: impl Into<PathBuf>) -> CmdrResult<Self> {
        Self::acquire(target, RollbackScope::Directory)
    }

    pub fn file(target: impl Into<PathBuf>) -> CmdrResult<Self> {
        Self::acquire(target, RollbackScope::File)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Keep the target
    pub fn commit(mut self) {
        self.armed = false;
        debug!("committed {}", self.target.display());
    }

    /// Remove whatever exists at the target. Removal errors are returned.
    pub async fn rollback(mut self) -> CmdrResult<()> {
        self.armed = false;

        if !tokio::fs::try_exists(&self.target).await? {
            return Ok(());
        }

        debug!("rolling back {}", self.target.display());
        match self.scope {
            RollbackScope::Directory => tokio::fs::remove_dir_all(&self.target).await?,
            RollbackScope::File => tokio::fs::remove_file(&self.target).await?,
        }
        Ok(())
    }
}

impl Drop for RollbackGuard {
    fn drop(&mut self) {
        if !self.armed || self.target.symlink_metadata().is_err() {
            return;
        }

        let result = match self.scope {
            RollbackScope::Directory => std::fs::remove_dir_all(&self.target),
            RollbackScope::File => std::fs::remove_file(&self.target),
        };
        if let Err(e) = result {
            warn!("failed to remove {}: {}", self.target.display(), e);
        }
    }
}

/// Run `work` under `guard`: commit on success, otherwise remove the target
/// and return the original error.
pub async fn transact<F>(guard: RollbackGuard, work: F) -> CmdrResult<()>
where
    F: Future<Output = CmdrResult<()>>,
{
    match work.await {
        Ok(()) => {
            guard.commit();
            Ok(())
        }
        Err(err) => {
            warn!("generation of {} failed: {}", guard.target().display(), err);
            guard.rollback().await?;
            Err(err)
        }
    }
}
