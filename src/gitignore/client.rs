//! gitignore.io HTTP client

use async_trait::async_trait;

use crate::core::config::GitignoreConfig;
use crate::core::{CmdrError, CmdrResult};
use crate::gitignore::GitignoreSource;

/// Client for the gitignore generator API
pub struct GitignoreClient {
    /// HTTP client
    client: reqwest::Client,
    /// API base URL, without trailing slash
    base_url: String,
}

impl GitignoreClient {
    /// Create a new client from configuration
    pub fn new(config: &GitignoreConfig) -> CmdrResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("cmdr/{}", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL for a set of template names
    pub fn url_for(&self, templates: &[String]) -> String {
        format!("{}/{}", self.base_url, templates.join(","))
    }
}

#[async_trait]
impl GitignoreSource for GitignoreClient {
    async fn fetch(&self, templates: &[String]) -> CmdrResult<String> {
        let url = self.url_for(templates);
        tracing::debug!("fetching gitignore template from {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CmdrError::Gitignore {
                templates: templates.join(","),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
