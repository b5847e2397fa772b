//! CLI module for Cmdr
//!
//! Provides command-line interface using clap.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::*;

/// Cmdr - project scaffolding from templates
#[derive(Parser)]
#[command(name = "cmdr")]
#[command(author = "Cmdr Contributors")]
#[command(version)]
#[command(about = "CLI tool for generating project templates", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project from a template
    #[command(visible_alias = "c")]
    Create(create::CreateArgs),

    /// List available templates
    #[command(visible_alias = "ls")]
    List(list::ListArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_flags() {
        let cli = Cli::try_parse_from([
            "cmdr", "create", "kubernetes", "--name", "shop", "--replicas", "2", "--no-git", "--yes",
        ])
        .unwrap();

        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.kind, Some(crate::templates::TemplateKind::Kubernetes));
                assert_eq!(args.name.as_deref(), Some("shop"));
                assert_eq!(args.replicas, Some(2));
                assert!(args.no_git);
                assert!(args.yes);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_rejects_zero_replicas() {
        assert!(Cli::try_parse_from(["cmdr", "create", "kubernetes", "--replicas", "0"]).is_err());
        assert!(Cli::try_parse_from(["cmdr", "create", "kubernetes", "--port", "0"]).is_err());
    }

    #[test]
    fn test_gitignore_templates_split_on_commas() {
        let cli = Cli::try_parse_from(["cmdr", "create", "gitignore", "-t", "node,python", "-t", "vscode"]).unwrap();
        match cli.command {
            Commands::Create(args) => assert_eq!(args.templates, vec!["node", "python", "vscode"]),
            _ => panic!("expected create"),
        }
    }
}
