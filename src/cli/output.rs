//! Output formatting for CLI

use std::path::Path;

use console::style;
use serde::Serialize;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("ℹ").blue().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a numbered step
pub fn step(number: usize, total: usize, message: &str) {
    println!(
        "{} {}",
        style(format!("[{}/{}]", number, total)).dim(),
        message
    );
}

/// Print JSON output
pub fn json<T: Serialize>(data: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a table header
pub fn table_header(columns: &[&str]) {
    let header: Vec<String> = columns.iter().map(|c| style(*c).bold().to_string()).collect();
    println!("{}", header.join("  "));
}

/// Print a divider line
pub fn divider() {
    println!("{}", style("─".repeat(60)).dim());
}

/// Format a duration in human-readable form
pub fn format_duration(millis: u128) -> String {
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60000 {
        format!("{:.2}s", millis as f64 / 1000.0)
    } else {
        let seconds = millis / 1000;
        let minutes = seconds / 60;
        let remaining_seconds = seconds % 60;
        format!("{}m {}s", minutes, remaining_seconds)
    }
}

/// Print the commands to run once a project exists
pub fn next_steps(commands: &[String]) {
    println!();
    info("Next steps:");
    for command in commands {
        println!("  {}", style(command).cyan());
    }
}

/// Print a numbered checklist under `title`; nothing when empty
pub fn checklist(title: &str, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    println!();
    info(title);
    for (i, item) in items.iter().enumerate() {
        step(i + 1, items.len(), item);
    }
}

/// `path` relative to `base` when one can be computed
pub fn relative_path(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// One row of the template listing
pub fn template_row(id: &str, label: &str, source: &str) {
    println!("{:<22}  {:<28}  {}", style(id).cyan(), label, style(source).dim());
}

/// Create a progress spinner
pub fn spinner(message: &str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}
