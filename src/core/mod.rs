//! Core module for Cmdr
//!
//! Configuration, error types and the generation request shared by the CLI
//! and the template materializers.

pub mod config;
pub mod error;
pub mod request;

pub use config::Config;
pub use error::{CmdrError, CmdrResult};
pub use request::{GenerationRequest, TemplateOptions};
