//! cmdr list - Show available templates

use clap::Args;

use crate::cli::output;
use crate::core::CmdrResult;
use crate::templates::{TemplateManager, TemplateSource};

#[derive(Args)]
pub struct ListArgs {
    /// Only show templates cloned from a repository
    #[arg(long)]
    pub remote: bool,
}

pub async fn execute(args: ListArgs, json_output: bool) -> CmdrResult<()> {
    let kinds: Vec<_> = TemplateManager::new()
        .list()
        .into_iter()
        .filter(|k| !args.remote || k.is_clone_based())
        .collect();

    if json_output {
        let entries: Vec<_> = kinds
            .iter()
            .map(|k| {
                serde_json::json!({
                    "id": k.id(),
                    "label": k.label(),
                    "repository": match k.source() {
                        TemplateSource::RemoteRepository { url } => Some(url),
                        TemplateSource::StaticFileSet => None,
                    },
                })
            })
            .collect();
        output::json(&entries)?;
        return Ok(());
    }

    output::table_header(&[&format!("{:<22}", "TEMPLATE"), &format!("{:<28}", "DESCRIPTION"), "SOURCE"]);
    output::divider();
    for kind in kinds {
        let source = match kind.source() {
            TemplateSource::RemoteRepository { url } => url.to_string(),
            TemplateSource::StaticFileSet => "built-in".to_string(),
        };
        output::template_row(kind.id(), kind.label(), &source);
    }

    Ok(())
}
