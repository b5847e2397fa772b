//! Configuration handling for Cmdr
//!
//! Reads `cmdr.toml` from the platform config directory (or the file named by
//! `CMDR_CONFIG`) and applies environment variable overrides.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::{CmdrError, CmdrResult};
use crate::templates::TemplateKind;

/// Default gitignore generator endpoint
pub const DEFAULT_GITIGNORE_API: &str = "https://www.toptal.com/developers/gitignore/api";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version control settings
    pub git: GitConfig,

    /// Remote gitignore service settings
    pub gitignore: GitignoreConfig,

    /// Per-kind template repository overrides, keyed by kind id
    pub repositories: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Initialize a fresh repository in generated projects
    pub init: bool,

    /// git executable to invoke
    pub binary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitignoreConfig {
    /// Base URL of the gitignore generator API
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            init: true,
            binary: "git".to_string(),
        }
    }
}

impl Default for GitignoreConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITIGNORE_API.to_string(),
            timeout: 30,
        }
    }
}

impl Config {
    /// Load configuration from the user config file and merge with defaults
    pub fn load() -> CmdrResult<Self> {
        let path = match env::var_os("CMDR_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_path(),
        };

        let config = match path {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Config::default(),
        };

        config.with_overrides(|key| env::var(key).ok())
    }

    /// Load configuration from a specific file without environment overrides
    pub fn load_from(path: &Path) -> CmdrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Location of `cmdr.toml` in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "cmdr", "cmdr").map(|dirs| dirs.config_dir().join("cmdr.toml"))
    }

    fn validate(&self) -> CmdrResult<()> {
        for kind in self.repositories.keys() {
            let known: TemplateKind = kind
                .parse()
                .map_err(|e| CmdrError::config(format!("{} in [repositories]", e)))?;
            if !known.is_clone_based() {
                return Err(CmdrError::config(format!(
                    "template kind '{}' is not clone-based and cannot take a repository",
                    kind
                )));
            }
        }

        url::Url::parse(&self.gitignore.api_url)
            .map_err(|e| CmdrError::config(format!("invalid gitignore.api_url: {}", e)))?;

        Ok(())
    }

    /// Apply environment overrides looked up through `var`, then validate the result
    fn with_overrides<F>(mut self, var: F) -> CmdrResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api) = var("CMDR_GITIGNORE_API") {
            self.gitignore.api_url = api;
        }

        if let Some(init) = var("CMDR_GIT_INIT") {
            self.git.init = !(init == "0" || init.eq_ignore_ascii_case("false"));
        }

        if let Some(binary) = var("CMDR_GIT") {
            self.git.binary = binary;
        }

        if let Some(timeout) = var("CMDR_HTTP_TIMEOUT") {
            self.gitignore.timeout = timeout
                .parse()
                .map_err(|_| CmdrError::config(format!("CMDR_HTTP_TIMEOUT must be a number of seconds, got '{}'", timeout)))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Repository override configured for a kind, if any
    pub fn repository_for(&self, kind: TemplateKind) -> Option<&str> {
        self.repositories.get(kind.id()).map(String::as_str)
    }
}
