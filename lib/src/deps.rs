//! The dependency-installer operation.
//!
//! Detects the host distribution, selects the matching backend, and installs
//! the pip client and `make` non-interactively. Planning is separated from
//! execution so the CLI can render or serialize the exact command first.

use serde::Serialize;
use tracing::info;

use crate::backend::PackageBackend;
use crate::distro::LinuxDistro;
use crate::error::{Result, SetupError};
use crate::runner::{self, CommandSpec, RunOptions, RunOutcome};

/// Build tool installed alongside the pip client on every family.
pub const BUILD_TOOL_PACKAGE: &str = "make";

/// Everything the dependency installer is about to do.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyPlan {
    /// The detected distribution
    pub distro: LinuxDistro,
    /// The selected package-manager backend
    pub backend: PackageBackend,
    /// Packages that will be installed
    pub packages: Vec<String>,
    /// The exact command that will run
    pub command: CommandSpec,
}

/// Builds the install plan for a detected distribution.
///
/// The package set is always the family's pip client plus `make`: exactly
/// `python-pip make` on Arch and `python3-pip make` on Debian-family and
/// unrecognized distributions.
#[must_use]
pub fn plan_dependencies(distro: &LinuxDistro) -> DependencyPlan {
    let backend = PackageBackend::for_family(distro.family);
    let packages = vec![
        backend.pip_package().to_string(),
        BUILD_TOOL_PACKAGE.to_string(),
    ];
    let refs: Vec<&str> = packages.iter().map(String::as_str).collect();
    let command = backend.install_command(&refs);

    DependencyPlan {
        distro: distro.clone(),
        backend,
        packages,
        command,
    }
}

/// Executes a dependency plan.
///
/// ## Errors
///
/// Returns [`SetupError::BackendUnavailable`] if the backend executable is
/// not on `PATH` (skipped for dry runs), or the runner's error if the
/// install command fails. The child's exit status is preserved in
/// [`SetupError::CommandFailed`].
pub fn install_dependencies(plan: &DependencyPlan, opts: &RunOptions) -> Result<RunOutcome> {
    if !opts.dry_run && plan.backend.locate().is_none() {
        return Err(SetupError::BackendUnavailable {
            backend: plan.backend.executable_name(),
        });
    }

    info!(
        distro = %plan.distro.name,
        backend = %plan.backend,
        packages = ?plan.packages,
        "installing system dependencies"
    );
    runner::run(&plan.command, opts)
}
