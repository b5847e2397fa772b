//! CLI command implementations

pub mod completions;
pub mod create;
pub mod list;
