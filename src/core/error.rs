//! Error types for Cmdr

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Cmdr operations
pub type CmdrResult<T> = Result<T, CmdrError>;

/// Main error type for Cmdr
#[derive(Error, Debug)]
pub enum CmdrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Target already exists: {0}")]
    TargetExists(PathBuf),

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("Invalid value for {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("git executable not found in PATH")]
    GitNotFound,

    #[error("git {command} failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    #[error("Failed to fetch gitignore template '{templates}': HTTP {status}")]
    Gitignore { templates: String, status: u16 },

    #[error("Expected file missing from template: {0}")]
    MissingTemplateFile(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User input error: {0}")]
    Prompt(String),

    #[error("{0}")]
    Other(String),
}

impl From<dialoguer::Error> for CmdrError {
    fn from(err: dialoguer::Error) -> Self {
        CmdrError::Prompt(err.to_string())
    }
}

impl CmdrError {
    /// Create a generic error from a string
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CmdrError::Other(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CmdrError::Config(msg.into())
    }

    /// Create an invalid project name error
    pub fn invalid_name<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        CmdrError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid option error
    pub fn invalid_option<O: Into<String>, R: Into<String>>(option: O, reason: R) -> Self {
        CmdrError::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Create a failed git command error
    pub fn git<C: Into<String>, S: Into<String>>(command: C, stderr: S) -> Self {
        CmdrError::GitCommand {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CmdrError::InvalidName { .. }
            | CmdrError::TargetExists(_)
            | CmdrError::UnknownTemplate(_)
            | CmdrError::InvalidOption { .. } => 2,
            CmdrError::GitNotFound | CmdrError::GitCommand { .. } => 3,
            CmdrError::Http(_) | CmdrError::Gitignore { .. } => 4,
            CmdrError::Config(_) | CmdrError::Toml(_) => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_error_keeps_stderr() {
        let err = CmdrError::git("clone", "fatal: repository not found");
        assert_eq!(err.to_string(), "git clone failed: fatal: repository not found");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_precondition_exit_code() {
        let err = CmdrError::TargetExists(PathBuf::from("shop"));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(CmdrError::other("boom").exit_code(), 1);
    }
}
