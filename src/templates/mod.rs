//! Project templates and their materializers
//!
//! Every kind either clones a remote repository and patches a few known files,
//! or renders a fixed file set. All of them run inside a [`RollbackGuard`] so a
//! failed generation leaves nothing behind.

mod clone;
mod files;
mod gitignore;
mod kubernetes;
mod kustomize;
mod rollback;
mod substitution;
mod terraform;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use clap::ValueEnum;

use crate::core::{CmdrError, CmdrResult, GenerationRequest};
use crate::gitignore::GitignoreSource;
use crate::vcs::Vcs;

pub use clone::CloneTemplate;
pub use files::StaticFileSet;
pub use gitignore::GitignoreTemplate;
pub use kubernetes::KubernetesTemplate;
pub use kustomize::KustomizeTemplate;
pub use terraform::TerraformTemplate;

/// Selectable project archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TemplateKind {
    #[value(name = "terraform")]
    Terraform,
    #[value(name = "express")]
    Express,
    #[value(name = "fastapi")]
    FastApi,
    #[value(name = "github-action")]
    GithubAction,
    #[value(name = "k8s-operator")]
    K8sOperator,
    #[value(name = "kubernetes")]
    Kubernetes,
    #[value(name = "kubernetes-kustomize")]
    KubernetesKustomize,
    #[value(name = "gitignore")]
    Gitignore,
}

/// Where a kind's files come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Cloned from a repository, then patched
    RemoteRepository { url: &'static str },
    /// Rendered in-process
    StaticFileSet,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 8] = [
        TemplateKind::Terraform,
        TemplateKind::Express,
        TemplateKind::FastApi,
        TemplateKind::GithubAction,
        TemplateKind::K8sOperator,
        TemplateKind::Kubernetes,
        TemplateKind::KubernetesKustomize,
        TemplateKind::Gitignore,
    ];

    /// Stable identifier used on the command line and in config
    pub fn id(&self) -> &'static str {
        match self {
            TemplateKind::Terraform => "terraform",
            TemplateKind::Express => "express",
            TemplateKind::FastApi => "fastapi",
            TemplateKind::GithubAction => "github-action",
            TemplateKind::K8sOperator => "k8s-operator",
            TemplateKind::Kubernetes => "kubernetes",
            TemplateKind::KubernetesKustomize => "kubernetes-kustomize",
            TemplateKind::Gitignore => "gitignore",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.id() == id)
    }

    /// Label shown in the interactive picker
    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::Terraform => "Terraform Project",
            TemplateKind::Express => "Express.js API",
            TemplateKind::FastApi => "FastAPI Python Project",
            TemplateKind::GithubAction => "GitHub Action",
            TemplateKind::K8sOperator => "Kubernetes Operator",
            TemplateKind::Kubernetes => "Kubernetes Manifests",
            TemplateKind::KubernetesKustomize => "Kubernetes with Kustomize",
            TemplateKind::Gitignore => "Gitignore Template",
        }
    }

    pub fn source(&self) -> TemplateSource {
        match self {
            TemplateKind::Express => TemplateSource::RemoteRepository {
                url: clone::EXPRESS_REPOSITORY,
            },
            TemplateKind::FastApi => TemplateSource::RemoteRepository {
                url: clone::FASTAPI_REPOSITORY,
            },
            TemplateKind::GithubAction => TemplateSource::RemoteRepository {
                url: clone::GITHUB_ACTION_REPOSITORY,
            },
            TemplateKind::K8sOperator => TemplateSource::RemoteRepository {
                url: clone::K8S_OPERATOR_REPOSITORY,
            },
            _ => TemplateSource::StaticFileSet,
        }
    }

    pub fn is_clone_based(&self) -> bool {
        matches!(self.source(), TemplateSource::RemoteRepository { .. })
    }

    /// Kinds that take container image/port/replica options
    pub fn has_manifest_options(&self) -> bool {
        matches!(self, TemplateKind::Kubernetes | TemplateKind::KubernetesKustomize)
    }

    /// Kinds that end with a git init/add/commit
    pub fn supports_git(&self) -> bool {
        self.is_clone_based() || *self == TemplateKind::Terraform
    }

    /// Whether the target is an existing directory rather than a new one named after the project
    pub fn is_path_based(&self) -> bool {
        *self == TemplateKind::Gitignore
    }

    /// Instructions printed after a successful generation
    pub fn next_steps(&self, name: &str) -> Vec<String> {
        let mut steps = Vec::new();
        if self.is_path_based() {
            steps.push("git add .gitignore".to_string());
            return steps;
        }

        steps.push(format!("cd {}", name));
        match self {
            TemplateKind::FastApi => {
                steps.push("uv sync".to_string());
                steps.push("ENVIRONMENT=local uv run python main.py".to_string());
            }
            TemplateKind::Kubernetes => {
                steps.push("kubectl apply -f deployment.yaml".to_string());
                steps.push("kubectl apply -f service.yaml".to_string());
            }
            TemplateKind::KubernetesKustomize => {
                steps.push("kubectl apply -k overlays/development".to_string());
            }
            TemplateKind::Terraform => {
                steps.push("terraform init".to_string());
                steps.push("terraform plan".to_string());
            }
            _ => steps.push("pnpm install".to_string()),
        }
        steps
    }

    /// Extra guidance printed below the next steps
    pub fn additional_steps(&self) -> &'static [&'static str] {
        match self {
            TemplateKind::K8sOperator => &[
                "Configure your Kubernetes cluster access",
                "Update the CRD in example/example.yaml",
                "Run tests: pnpm test",
                "Build and deploy: pnpm build && kubectl apply -f deploy/",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TemplateKind {
    type Err = CmdrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(&s.to_lowercase()).ok_or_else(|| CmdrError::UnknownTemplate(s.to_string()))
    }
}

/// Collaborators a materializer may call out to
#[derive(Clone, Copy)]
pub struct Toolbox<'a> {
    pub vcs: &'a dyn Vcs,
    pub gitignore: &'a dyn GitignoreSource,
}

/// Template trait for project scaffolding
#[async_trait]
pub trait Template: Send + Sync {
    /// The kind this template materializes
    fn kind(&self) -> TemplateKind;

    /// Materialize the project, or leave nothing behind on failure
    async fn generate(&self, request: &GenerationRequest, tools: Toolbox<'_>) -> CmdrResult<()>;
}

/// Template manager
pub struct TemplateManager;

impl TemplateManager {
    /// Create a new template manager
    pub fn new() -> Self {
        Self
    }

    /// Get the materializer for a kind
    pub fn get_template(&self, kind: TemplateKind) -> Box<dyn Template> {
        match kind {
            TemplateKind::Terraform => Box::new(TerraformTemplate),
            TemplateKind::Express => Box::new(CloneTemplate::express()),
            TemplateKind::FastApi => Box::new(CloneTemplate::fastapi()),
            TemplateKind::GithubAction => Box::new(CloneTemplate::github_action()),
            TemplateKind::K8sOperator => Box::new(CloneTemplate::k8s_operator()),
            TemplateKind::Kubernetes => Box::new(KubernetesTemplate),
            TemplateKind::KubernetesKustomize => Box::new(KustomizeTemplate),
            TemplateKind::Gitignore => Box::new(GitignoreTemplate),
        }
    }

    /// List available templates
    pub fn list(&self) -> Vec<TemplateKind> {
        TemplateKind::ALL.to_vec()
    }
}

impl Default for TemplateManager {
    fn default() -> Self {
        Self::new()
    }
}
