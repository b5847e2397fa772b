//! Clone-based templates
//!
//! Clone a template repository, drop its history, patch the files that carry
//! the template's own name, and optionally start a fresh repository.

use async_trait::async_trait;
use tracing::info;

use crate::core::{CmdrResult, GenerationRequest};
use crate::templates::rollback::{transact, RollbackGuard};
use crate::templates::substitution::{patch_package_name, FileRewrite, Substitution};
use crate::templates::{Template, TemplateKind, Toolbox};
use crate::vcs;

pub const EXPRESS_REPOSITORY: &str = "https://github.com/parraletz/express-typescript-service-template.git";
pub const FASTAPI_REPOSITORY: &str = "https://github.com/parraletz/fastapi-template.git";
pub const GITHUB_ACTION_REPOSITORY: &str = "https://github.com/parraletz/add-reviewers-action.git";
pub const K8S_OPERATOR_REPOSITORY: &str = "https://github.com/parraletz/k8s-operator-template.git";

const CLONE_PLACEHOLDER: &str = "git clone YOUR_REPOSITORY_URL";

/// A template fetched from a git repository
pub struct CloneTemplate {
    kind: TemplateKind,
    repository: &'static str,
    commit_message: &'static str,
    /// Whether the template ships a `package.json` to rename
    package_manifest: bool,
    rewrites: fn(&str) -> CmdrResult<Vec<FileRewrite>>,
}

impl CloneTemplate {
    pub fn express() -> Self {
        Self {
            kind: TemplateKind::Express,
            repository: EXPRESS_REPOSITORY,
            commit_message: "Initial commit from express-typescript-service-template",
            package_manifest: true,
            rewrites: |name| {
                Ok(vec![FileRewrite::new(
                    "README.md",
                    vec![
                        Substitution::line("# Express.js TypeScript Service Template", format!("# {}", name))?,
                        Substitution::literal(&format!("git clone {}", EXPRESS_REPOSITORY), CLONE_PLACEHOLDER)?,
                    ],
                )])
            },
        }
    }

    pub fn fastapi() -> Self {
        Self {
            kind: TemplateKind::FastApi,
            repository: FASTAPI_REPOSITORY,
            commit_message: "Initial commit from fastapi-template",
            package_manifest: false,
            rewrites: |name| {
                Ok(vec![FileRewrite::new(
                    "README.md",
                    vec![
                        Substitution::line("# Platform API", format!("# {}", name))?,
                        Substitution::literal(&format!("git clone {}", FASTAPI_REPOSITORY), CLONE_PLACEHOLDER)?,
                    ],
                )])
            },
        }
    }

    pub fn github_action() -> Self {
        Self {
            kind: TemplateKind::GithubAction,
            repository: GITHUB_ACTION_REPOSITORY,
            commit_message: "Initial commit from add-reviewers-action template",
            package_manifest: true,
            rewrites: |name| {
                Ok(vec![
                    FileRewrite::new(
                        "action.yml",
                        vec![
                            Substitution::new(r"(?m)^name: 'add-reviewers-action'", format!("name: '{}'", name))?,
                            Substitution::new(
                                r"(?m)^description: 'GitHub Action to add reviewers'",
                                "description: 'GitHub Action generated with Cmdr CLI'",
                            )?,
                        ],
                    ),
                    FileRewrite::new(
                        "README.md",
                        vec![
                            Substitution::line("# GitHub Action: Request Reviewers", format!("# {}", name))?,
                            Substitution::literal("git clone <repository-url>", CLONE_PLACEHOLDER)?,
                            Substitution::new(r"\bnpm install\b", "pnpm install")?,
                        ],
                    ),
                ])
            },
        }
    }

    pub fn k8s_operator() -> Self {
        Self {
            kind: TemplateKind::K8sOperator,
            repository: K8S_OPERATOR_REPOSITORY,
            commit_message: "Initial commit from k8s-operator-template",
            package_manifest: true,
            rewrites: |name| {
                Ok(vec![FileRewrite::new(
                    "README.md",
                    vec![
                        Substitution::line("# Kubernetes Operator Template", format!("# {}", name))?,
                        Substitution::literal(&format!("git clone {}", K8S_OPERATOR_REPOSITORY), CLONE_PLACEHOLDER)?,
                    ],
                )])
            },
        }
    }

    /// File rewrites for a project name
    pub fn rewrites(&self, name: &str) -> CmdrResult<Vec<FileRewrite>> {
        (self.rewrites)(name)
    }

    async fn populate(&self, request: &GenerationRequest, tools: Toolbox<'_>) -> CmdrResult<()> {
        let target = &request.target;
        let repository = request.options.repository.as_deref().unwrap_or(self.repository);

        info!("cloning {} template from {}", self.kind, repository);
        tools.vcs.clone_repo(repository, target).await?;

        let history = target.join(".git");
        if tokio::fs::try_exists(&history).await? {
            tokio::fs::remove_dir_all(&history).await?;
        }

        if self.package_manifest {
            patch_package_name(target, &request.name).await?;
        }

        for rewrite in self.rewrites(&request.name)? {
            rewrite.apply(target).await?;
        }

        if request.options.git() {
            vcs::init_with_commit(tools.vcs, target, self.commit_message).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Template for CloneTemplate {
    fn kind(&self) -> TemplateKind {
        self.kind
    }

    async fn generate(&self, request: &GenerationRequest, tools: Toolbox<'_>) -> CmdrResult<()> {
        let guard = RollbackGuard::directory(&request.target)?;
        transact(guard, self.populate(request, tools)).await
    }
}
