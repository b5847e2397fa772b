//! `.gitignore` from the remote template service

use async_trait::async_trait;

use crate::core::{CmdrError, CmdrResult, GenerationRequest};
use crate::templates::rollback::{transact, RollbackGuard};
use crate::templates::{Template, TemplateKind, Toolbox};

/// Writes `<target>/.gitignore`; the target directory must already exist
pub struct GitignoreTemplate;

#[async_trait]
impl Template for GitignoreTemplate {
    fn kind(&self) -> TemplateKind {
        TemplateKind::Gitignore
    }

    async fn generate(&self, request: &GenerationRequest, tools: Toolbox<'_>) -> CmdrResult<()> {
        let file = request.target.join(".gitignore");
        let guard = RollbackGuard::file(&file)?;
        let templates = request.options.gitignore_templates();

        transact(guard, async {
            let body = tools.gitignore.fetch(&templates).await?;
            tokio::fs::write(&file, body).await?;
            tracing::info!("wrote {} ({})", file.display(), templates.join(","));
            Ok::<(), CmdrError>(())
        })
        .await
    }
}
