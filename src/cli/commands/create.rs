//! cmdr create - Create projects from templates

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use dialoguer::{Input, Select};

use crate::cli::output;
use crate::core::request::{
    validate_name, DEFAULT_GITIGNORE_TEMPLATE, DEFAULT_IMAGE, DEFAULT_KUSTOMIZE_REPLICAS, DEFAULT_PORT,
    DEFAULT_REPLICAS,
};
use crate::core::{CmdrError, CmdrResult, Config, GenerationRequest, TemplateOptions};
use crate::gitignore::GitignoreClient;
use crate::templates::{TemplateKind, TemplateManager, Toolbox};
use crate::vcs::GitCli;

#[derive(Args)]
pub struct CreateArgs {
    /// Template to use
    #[arg(value_enum)]
    pub kind: Option<TemplateKind>,

    /// Project name/directory
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory to write the .gitignore into (gitignore template only)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Container image (Kubernetes templates)
    #[arg(long)]
    pub image: Option<String>,

    /// Container port (Kubernetes templates)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Replica count (Kubernetes templates)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub replicas: Option<u32>,

    /// Clone from this repository instead of the template's default
    #[arg(long)]
    pub repository: Option<String>,

    /// gitignore.io template names, comma-separated or repeated
    #[arg(short, long = "template", value_delimiter = ',')]
    pub templates: Vec<String>,

    /// Skip git initialization
    #[arg(long)]
    pub no_git: bool,

    /// Use default options (no prompts)
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn execute(args: CreateArgs, json_output: bool) -> CmdrResult<()> {
    let start_time = Instant::now();
    let config = Config::load()?;
    let cwd = env::current_dir()?;

    let kind = select_kind(&args)?;
    let request = build_request(kind, &args, &config, &cwd)?;

    if args.no_git && !kind.supports_git() && !json_output {
        output::warning(&format!("--no-git has no effect for {} templates", kind));
    }

    if !json_output {
        output::info(&format!(
            "Creating {} project '{}'...",
            console::style(kind.label()).cyan(),
            console::style(&request.name).green()
        ));
    }

    let progress = if !json_output {
        Some(output::spinner("Creating project..."))
    } else {
        None
    };

    let git = GitCli::new(config.git.binary.clone());
    let gitignore = GitignoreClient::new(&config.gitignore)?;
    let tools = Toolbox {
        vcs: &git,
        gitignore: &gitignore,
    };

    let template = TemplateManager::new().get_template(kind);
    tracing::debug!("materializing {} into {}", template.kind(), request.target.display());
    let result = template.generate(&request, tools).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    if let Err(e) = result {
        if !json_output {
            output::error("Failed to create project");
        }
        return Err(e);
    }

    let duration = start_time.elapsed();

    if json_output {
        output::json(&serde_json::json!({
            "success": true,
            "kind": kind.id(),
            "name": request.name,
            "path": request.target,
            "options": request.options,
            "files": generated_files(kind, &request.target),
            "next_steps": kind.next_steps(&request.name),
            "duration_ms": duration.as_millis()
        }))?;
    } else {
        println!();
        output::success(&format!(
            "Project created successfully! ({})",
            output::format_duration(duration.as_millis())
        ));

        if kind.is_path_based() {
            let file = request.target.join(".gitignore");
            output::info(&format!("Wrote {}", output::relative_path(&file, &cwd)));
        }

        output::next_steps(&kind.next_steps(&request.name));
        output::checklist(&format!("Additional steps for {}:", kind.label()), kind.additional_steps());
        println!();
    }

    Ok(())
}

fn select_kind(args: &CreateArgs) -> CmdrResult<TemplateKind> {
    if let Some(kind) = args.kind {
        return Ok(kind);
    }
    if args.yes {
        return Err(CmdrError::invalid_option("template", "a template must be given when using --yes"));
    }

    let kinds = TemplateManager::new().list();
    let items: Vec<&str> = kinds.iter().map(|k| k.label()).collect();
    let selection = Select::new()
        .with_prompt("What type of project do you want to create?")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(kinds[selection])
}

/// Gather the request for `kind` from flags, prompts and config
fn build_request(kind: TemplateKind, args: &CreateArgs, config: &Config, cwd: &Path) -> CmdrResult<GenerationRequest> {
    check_applicable(kind, args)?;

    if kind.is_path_based() {
        return build_gitignore_request(args, cwd);
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None if args.yes => {
            return Err(CmdrError::invalid_option("name", "a project name must be given when using --yes"));
        }
        None => prompt_name(cwd)?,
    };

    let mut options = TemplateOptions::default();

    if kind.has_manifest_options() {
        let default_replicas = if kind == TemplateKind::KubernetesKustomize {
            DEFAULT_KUSTOMIZE_REPLICAS
        } else {
            DEFAULT_REPLICAS
        };
        options.image = args.image.clone();
        options.port = args.port;
        options.replicas = args.replicas;

        if !args.yes {
            if options.image.is_none() {
                options.image = Some(
                    Input::new()
                        .with_prompt("Enter the container image")
                        .default(DEFAULT_IMAGE.to_string())
                        .interact_text()?,
                );
            }
            if options.port.is_none() {
                options.port = Some(
                    Input::new()
                        .with_prompt("Enter the container port")
                        .default(DEFAULT_PORT)
                        .validate_with(|port: &u16| if *port == 0 { Err("Port must be between 1 and 65535") } else { Ok(()) })
                        .interact_text()?,
                );
            }
            if options.replicas.is_none() {
                options.replicas = Some(
                    Input::new()
                        .with_prompt("Enter the number of replicas")
                        .default(default_replicas)
                        .validate_with(|n: &u32| if *n == 0 { Err("At least one replica is required") } else { Ok(()) })
                        .interact_text()?,
                );
            }
        }
    }

    if kind.is_clone_based() {
        options.repository = match &args.repository {
            Some(repository) => Some(repository.clone()),
            None => config.repository_for(kind).map(str::to_string),
        };
        if let Some(repository) = &options.repository {
            validate_repository(repository)?;
        }
    }

    if kind.supports_git() {
        options.git = Some(config.git.init && !args.no_git);
    }

    let request = GenerationRequest::new(name, cwd, options)?;
    if request.target.exists() {
        return Err(CmdrError::TargetExists(request.target));
    }
    Ok(request)
}

/// Reject flags the chosen kind has no use for
fn check_applicable(kind: TemplateKind, args: &CreateArgs) -> CmdrResult<()> {
    if kind.is_path_based() {
        if args.name.is_some() {
            return Err(CmdrError::invalid_option(
                "--name",
                "the gitignore template writes into --path, not a new project directory",
            ));
        }
    } else {
        if args.path.is_some() {
            return Err(CmdrError::invalid_option(
                "--path",
                format!("only the gitignore template takes a path; {} projects are created in the current directory", kind),
            ));
        }
        if !args.templates.is_empty() {
            return Err(CmdrError::invalid_option(
                "--template",
                format!("only the gitignore template takes template names, not {}", kind),
            ));
        }
    }

    if !kind.has_manifest_options() && (args.image.is_some() || args.port.is_some() || args.replicas.is_some()) {
        return Err(CmdrError::invalid_option(
            "--image/--port/--replicas",
            format!("not supported by the {} template", kind),
        ));
    }
    if !kind.is_clone_based() && args.repository.is_some() {
        return Err(CmdrError::invalid_option(
            "--repository",
            format!("the {} template is not cloned from a repository", kind),
        ));
    }

    Ok(())
}

fn build_gitignore_request(args: &CreateArgs, cwd: &Path) -> CmdrResult<GenerationRequest> {
    let templates = if !args.templates.is_empty() {
        let templates: Vec<String> = args.templates.iter().flat_map(|t| split_templates(t)).collect();
        if templates.is_empty() {
            return Err(CmdrError::invalid_option("--template", "no template names given"));
        }
        templates
    } else if args.yes {
        vec![DEFAULT_GITIGNORE_TEMPLATE.to_string()]
    } else {
        let answer: String = Input::new()
            .with_prompt("Enter the gitignore template name")
            .default(DEFAULT_GITIGNORE_TEMPLATE.to_string())
            .interact_text()?;
        split_templates(&answer)
    };

    let path = match &args.path {
        Some(path) => path.clone(),
        None if args.yes => cwd.to_path_buf(),
        None => {
            let answer: String = Input::new()
                .with_prompt("Enter the project path")
                .default(cwd.display().to_string())
                .interact_text()?;
            PathBuf::from(answer)
        }
    };
    let target = if path.is_absolute() { path } else { cwd.join(path) };

    if !target.is_dir() {
        return Err(CmdrError::invalid_option(
            "path",
            format!("{} is not a directory", target.display()),
        ));
    }
    if target.join(".gitignore").exists() {
        return Err(CmdrError::TargetExists(target.join(".gitignore")));
    }

    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project")
        .to_string();
    let options = TemplateOptions {
        gitignore_templates: templates,
        ..Default::default()
    };
    Ok(GenerationRequest::at_path(name, target, options))
}

fn prompt_name(cwd: &Path) -> CmdrResult<String> {
    let cwd = cwd.to_path_buf();
    let name: String = Input::new()
        .with_prompt("What is the name of your project?")
        .validate_with(move |input: &String| -> Result<(), String> {
            validate_name(input).map_err(|e| e.to_string())?;
            if cwd.join(input).exists() {
                return Err("Directory already exists".to_string());
            }
            Ok(())
        })
        .interact_text()?;
    Ok(name)
}

/// Split `node, python,,vscode` into template names
fn split_templates(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accept URLs, scp-style addresses (`git@host:owner/repo.git`) and local paths
fn validate_repository(repository: &str) -> CmdrResult<()> {
    if repository.starts_with('-') {
        return Err(CmdrError::invalid_option(
            "--repository",
            format!("'{}' looks like a command-line option", repository),
        ));
    }
    if url::Url::parse(repository).is_ok() {
        return Ok(());
    }
    if let Some((host, path)) = repository.split_once(':') {
        if host.contains('@') && !path.is_empty() {
            return Ok(());
        }
    }
    if Path::new(repository).exists() {
        return Ok(());
    }
    Err(CmdrError::invalid_option(
        "--repository",
        format!("'{}' is not a URL, scp-style address or existing path", repository),
    ))
}

/// Files written by the generator, relative to the project root
fn generated_files(kind: TemplateKind, target: &Path) -> Vec<String> {
    if kind.is_path_based() {
        return vec![".gitignore".to_string()];
    }

    let mut files: Vec<String> = walkdir::WalkDir::new(target)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(target)
                .ok()
                .map(|p| p.to_string_lossy().into_owned())
        })
        .collect();
    files.sort();
    files
}
