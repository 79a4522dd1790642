//! Text and JSON rendering for the setup subcommands.

use mmpm_setup_lib::{DependencyPlan, PackagePlan, wheel};
use owo_colors::OwoColorize;

/// Prints a start/completion notice.
///
/// Suppressed in JSON mode so stdout stays a single parseable document.
pub fn notice(json_mode: bool, msg: &str) {
    if !json_mode {
        println!("{} {msg}", "::".green().bold());
    }
}

pub fn print_error(err: &impl std::fmt::Display) {
    eprintln!("{} {err}", "error:".red().bold());
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_dependency_plan(plan: &DependencyPlan, dry_run: bool) {
    let distro = &plan.distro;
    match &distro.version {
        Some(version) => println!(
            "Detected {} {} ({} family)",
            distro.name, version, distro.family
        ),
        None => println!("Detected {} ({} family)", distro.name, distro.family),
    }
    println!("Package manager: {}", plan.backend);
    println!(
        "{} {}",
        verb(dry_run).bold(),
        plan.command.to_string().cyan()
    );
}

pub fn print_package_plan(plan: &PackagePlan, dry_run: bool) {
    println!("Found wheel: {}", plan.wheel.display());
    println!(
        "{} {}",
        verb(dry_run).bold(),
        plan.command.to_string().cyan()
    );
}

/// Reminds the user that pip's user-local bin directory must be on PATH.
pub fn print_path_reminder() {
    let bin_dir = wheel::local_bin_dir()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "~/.local/bin".to_string());

    println!("Please ensure {bin_dir} is in your PATH");
    if !wheel::local_bin_on_path() {
        println!(
            "{} {bin_dir} is not currently on your PATH",
            "warning:".yellow().bold()
        );
    }
}

fn verb(dry_run: bool) -> &'static str {
    if dry_run { "Would run:" } else { "Running:" }
}
