//! Terraform project skeleton

use async_trait::async_trait;

use crate::core::{CmdrResult, GenerationRequest};
use crate::templates::rollback::{transact, RollbackGuard};
use crate::templates::{StaticFileSet, Template, TemplateKind, Toolbox};
use crate::vcs;

const COMMIT_MESSAGE: &str = "Initial commit";

const MAIN_TF: &str = r#"terraform {
  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = "~> 4.0"
    }
  }
}

provider "aws" {
  region = "us-west-2"
}

# Add your resources here
"#;

const VARIABLES_TF: &str = r#"variable "environment" {
  description = "Environment name"
}

variable "project_name" {
  description = "Name of the project"
}
"#;

const OUTPUTS_TF: &str = r#"output "project_name" {
  value = var.project_name
}
"#;

const GITIGNORE: &str = ".terraform
*.tfstate
*.tfstate.*
.terraform.lock.hcl
";

/// AWS-provider Terraform layout
pub struct TerraformTemplate;

impl TerraformTemplate {
    pub fn render(name: &str) -> StaticFileSet {
        let mut files = StaticFileSet::new();
        files
            .add("main.tf", MAIN_TF)
            .add("variables.tf", VARIABLES_TF)
            .add("outputs.tf", OUTPUTS_TF)
            .add(".gitignore", GITIGNORE)
            .add(
                "README.md",
                format!(
                    r#"# {name}

This is a Terraform project generated using Cmdr CLI.

## Getting Started

1. Initialize Terraform:
   ```bash
   terraform init
   ```

2. Plan your changes:
   ```bash
   terraform plan
   ```

3. Apply your changes:
   ```bash
   terraform apply
   ```
"#
                ),
            );
        files
    }

    async fn populate(&self, request: &GenerationRequest, tools: Toolbox<'_>) -> CmdrResult<()> {
        Self::render(&request.name).write_to(&request.target).await?;

        if request.options.git() {
            vcs::init_with_commit(tools.vcs, &request.target, COMMIT_MESSAGE).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Template for TerraformTemplate {
    fn kind(&self) -> TemplateKind {
        TemplateKind::Terraform
    }

    async fn generate(&self, request: &GenerationRequest, tools: Toolbox<'_>) -> CmdrResult<()> {
        let guard = RollbackGuard::directory(&request.target)?;
        transact(guard, self.populate(request, tools)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CmdrError, TemplateOptions};
    use crate::gitignore::testing::StaticGitignore;
    use crate::vcs::testing::{RecordingVcs, VcsCall};
    use tempfile::tempdir;

    #[test]
    fn test_render() {
        let files = TerraformTemplate::render("infra");
        assert_eq!(files.paths().count(), 5);
        assert!(files.get("README.md").unwrap().starts_with("# infra\n"));
        assert!(files.get(".gitignore").unwrap().contains("*.tfstate\n"));
        assert!(files.get("main.tf").unwrap().contains("source  = \"hashicorp/aws\""));
        assert_eq!(TerraformTemplate::render("infra"), files);
    }

    #[tokio::test]
    async fn test_git_sequence() {
        let dir = tempdir().unwrap();
        let vcs = RecordingVcs::with_fixture(&[]);
        let gitignore = StaticGitignore::not_found();
        let tools = Toolbox { vcs: &vcs, gitignore: &gitignore };
        let request = GenerationRequest::new("infra", dir.path(), TemplateOptions::default()).unwrap();

        TerraformTemplate.generate(&request, tools).await.unwrap();

        let target = dir.path().join("infra");
        assert_eq!(
            vcs.calls(),
            vec![
                VcsCall::Init(target.clone()),
                VcsCall::Add(target.clone(), ".".to_string()),
                VcsCall::Commit(target.clone(), "Initial commit".to_string()),
            ]
        );
        assert!(target.join("main.tf").exists());
    }

    #[tokio::test]
    async fn test_without_git() {
        let dir = tempdir().unwrap();
        let vcs = RecordingVcs::with_fixture(&[]);
        let gitignore = StaticGitignore::not_found();
        let tools = Toolbox { vcs: &vcs, gitignore: &gitignore };
        let options = TemplateOptions {
            git: Some(false),
            ..Default::default()
        };
        let request = GenerationRequest::new("infra", dir.path(), options).unwrap();

        TerraformTemplate.generate(&request, tools).await.unwrap();

        assert!(vcs.calls().is_empty());
        assert!(dir.path().join("infra/outputs.tf").exists());
    }

    #[tokio::test]
    async fn test_commit_failure_rolls_back() {
        let dir = tempdir().unwrap();
        let vcs = RecordingVcs::with_fixture(&[]).fail_commit("please tell me who you are");
        let gitignore = StaticGitignore::not_found();
        let tools = Toolbox { vcs: &vcs, gitignore: &gitignore };
        let request = GenerationRequest::new("infra", dir.path(), TemplateOptions::default()).unwrap();

        let err = TerraformTemplate.generate(&request, tools).await.unwrap_err();

        assert_eq!(err.to_string(), "git commit failed: please tell me who you are");
        assert!(matches!(err, CmdrError::GitCommand { .. }));
        assert!(!dir.path().join("infra").exists());
    }
}
