//! cmdr completions - Shell completion scripts

use std::io;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::core::CmdrResult;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub async fn execute(args: CompletionsArgs) -> CmdrResult<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "cmdr", &mut io::stdout());
    Ok(())
}
