//! Remote gitignore template service

mod client;

use async_trait::async_trait;

use crate::core::CmdrResult;

pub use client::GitignoreClient;

/// Source of rendered `.gitignore` bodies
#[async_trait]
pub trait GitignoreSource: Send + Sync {
    /// Fetch the combined gitignore for the given template names
    async fn fetch(&self, templates: &[String]) -> CmdrResult<String>;
}
