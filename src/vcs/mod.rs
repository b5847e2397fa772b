//! Version control collaborator
//!
//! Materializers only talk to git through the [`Vcs`] trait so the
//! clone/init/add/commit sequence can be observed in tests.

mod git;

use std::path::Path;

use async_trait::async_trait;

use crate::core::CmdrResult;

pub use git::GitCli;

/// Version control operations used by the materializers
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Clone `url` into `dest`
    async fn clone_repo(&self, url: &str, dest: &Path) -> CmdrResult<()>;

    /// Initialize an empty repository in `dir`
    async fn init(&self, dir: &Path) -> CmdrResult<()>;

    /// Stage `pathspec` in the repository at `dir`
    async fn add(&self, dir: &Path, pathspec: &str) -> CmdrResult<()>;

    /// Create a commit in the repository at `dir`
    async fn commit(&self, dir: &Path, message: &str) -> CmdrResult<()>;
}

/// Start fresh history in `dir`: init, stage everything, single commit
pub async fn init_with_commit(vcs: &dyn Vcs, dir: &Path, message: &str) -> CmdrResult<()> {
    tracing::info!("initializing git repository in {}", dir.display());
    vcs.init(dir).await?;
    vcs.add(dir, ".").await?;
    vcs.commit(dir, message).await?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingVcs, VcsCall};
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_with_commit_order() {
        let dir = tempdir().unwrap();
        let vcs = RecordingVcs::with_fixture(&[]);

        init_with_commit(&vcs, dir.path(), "Initial commit").await.unwrap();

        assert_eq!(
            vcs.calls(),
            vec![
                VcsCall::Init(dir.path().to_path_buf()),
                VcsCall::Add(dir.path().to_path_buf(), ".".to_string()),
                VcsCall::Commit(dir.path().to_path_buf(), "Initial commit".to_string()),
            ]
        );
    }
}
