//! Generation request passed from the prompt layer to a materializer

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::{CmdrError, CmdrResult};

/// Default container image for manifest templates
pub const DEFAULT_IMAGE: &str = "nginx:latest";

/// Default container port for manifest templates
pub const DEFAULT_PORT: u16 = 80;

/// Default replica count for plain manifests
pub const DEFAULT_REPLICAS: u32 = 1;

/// Default production replica count for the kustomize layout
pub const DEFAULT_KUSTOMIZE_REPLICAS: u32 = 3;

/// Default gitignore template
pub const DEFAULT_GITIGNORE_TEMPLATE: &str = "node";

/// Kind-specific options. Unset fields fall back to fixed defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateOptions {
    /// Container image
    pub image: Option<String>,

    /// Container port
    pub port: Option<u16>,

    /// Replica count
    pub replicas: Option<u32>,

    /// Initialize a git repository after generation
    pub git: Option<bool>,

    /// Override for the template repository of clone-based kinds
    pub repository: Option<String>,

    /// gitignore.io template names
    pub gitignore_templates: Vec<String>,
}

impl TemplateOptions {
    pub fn image(&self) -> &str {
        self.image.as_deref().unwrap_or(DEFAULT_IMAGE)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Replica count, falling back to the kind's default
    pub fn replicas_or(&self, default: u32) -> u32 {
        self.replicas.unwrap_or(default)
    }

    pub fn git(&self) -> bool {
        self.git.unwrap_or(true)
    }

    /// Template names for the gitignore service
    pub fn gitignore_templates(&self) -> Vec<String> {
        if self.gitignore_templates.is_empty() {
            vec![DEFAULT_GITIGNORE_TEMPLATE.to_string()]
        } else {
            self.gitignore_templates.clone()
        }
    }
}

/// A single materialization request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Project name, substituted into generated files
    pub name: String,

    /// Directory the project is written to
    pub target: PathBuf,

    /// Kind-specific options
    pub options: TemplateOptions,
}

impl GenerationRequest {
    /// Request for a project named `name` created under `parent`
    pub fn new(name: impl Into<String>, parent: &Path, options: TemplateOptions) -> CmdrResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        let target = parent.join(&name);
        Ok(Self { name, target, options })
    }

    /// Request whose target is an explicit path rather than derived from the name
    pub fn at_path(name: impl Into<String>, target: PathBuf, options: TemplateOptions) -> Self {
        Self {
            name: name.into(),
            target,
            options,
        }
    }
}

/// Validate a project name used as a directory name
pub fn validate_name(name: &str) -> CmdrResult<()> {
    if name.trim().is_empty() {
        return Err(CmdrError::invalid_name(name, "project name is required"));
    }
    if name.contains(std::path::is_separator) {
        return Err(CmdrError::invalid_name(name, "project name cannot contain path separators"));
    }
    if name == "." || name == ".." {
        return Err(CmdrError::invalid_name(name, "project name must name a new directory"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults() {
        let options = TemplateOptions::default();
        assert_eq!(options.image(), "nginx:latest");
        assert_eq!(options.port(), 80);
        assert_eq!(options.replicas_or(DEFAULT_REPLICAS), 1);
        assert_eq!(options.replicas_or(DEFAULT_KUSTOMIZE_REPLICAS), 3);
        assert!(options.git());
        assert_eq!(options.gitignore_templates(), vec!["node".to_string()]);
    }

    #[test]
    fn test_explicit_options_win() {
        let options = TemplateOptions {
            image: Some("ghcr.io/acme/api:1.2".to_string()),
            port: Some(8080),
            replicas: Some(4),
            git: Some(false),
            ..Default::default()
        };
        assert_eq!(options.image(), "ghcr.io/acme/api:1.2");
        assert_eq!(options.port(), 8080);
        assert_eq!(options.replicas_or(DEFAULT_KUSTOMIZE_REPLICAS), 4);
        assert!(!options.git());
    }

    #[test]
    fn test_request_target_joins_name() {
        let request = GenerationRequest::new("shop", Path::new("/work"), TemplateOptions::default()).unwrap();
        assert_eq!(request.target, PathBuf::from("/work/shop"));
    }

    #[test]
    fn test_rejects_bad_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("my-service").is_ok());
    }
}
