//! Cmdr - project scaffolding from templates
//!
//! Asks what kind of project to create, collects a few parameters and
//! materializes a ready-to-use directory, either by cloning a template
//! repository and patching it or by rendering a fixed set of files.

mod cli;
mod core;
mod gitignore;
mod templates;
mod vcs;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let json_output = cli.json;

    // Execute command
    let result = match cli.command {
        Commands::Create(args) => cli::commands::create::execute(args, json_output).await,
        Commands::List(args) => cli::commands::list::execute(args, json_output).await,
        Commands::Completions(args) => cli::commands::completions::execute(args).await,
    };

    if let Err(e) = result {
        if json_output {
            let error_json = serde_json::json!({
                "error": true,
                "message": e.to_string()
            });
            eprintln!("{}", error_json);
        } else {
            eprintln!("{} {}", console::style("error:").red().bold(), e);
        }
        std::process::exit(e.exit_code());
    }
}
