//! Bootstrap installer library for the mmpm command-line tool.
//!
//! Two operations are exposed: provisioning the host's system dependencies
//! (a pip client and `make`, via the distribution's package manager) and
//! installing the built `mmpm*.whl` artifact into the user-local prefix.
//! Both are planned first — the plan holds the exact command — and executed
//! second, so callers can dry-run or serialize what would happen.

use std::path::PathBuf;

pub mod backend;
pub mod deps;
pub mod distro;
pub mod error;
pub mod runner;
pub mod wheel;

pub use backend::PackageBackend;
pub use deps::{DependencyPlan, install_dependencies, plan_dependencies};
pub use distro::{LinuxDistro, LinuxFamily, detect_distro};
pub use error::{Result, SetupError};
pub use runner::{CommandSpec, RunOptions, RunOutcome};
pub use wheel::{PackagePlan, install_package, plan_package};

/// Configuration for the setup operations.
///
/// ## Examples
///
/// ```
/// use mmpm_setup_lib::SetupConfig;
/// use std::path::PathBuf;
///
/// let config = SetupConfig::new()
///     .dry_run(true)
///     .dist_dir(PathBuf::from("build/dist"));
/// ```
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Render commands without executing them.
    pub dry_run: bool,
    /// Directory holding the built wheel.
    pub dist_dir: PathBuf,
    /// Override for the os-release file used in distribution detection.
    pub os_release: Option<PathBuf>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            dist_dir: PathBuf::from(wheel::DEFAULT_DIST_DIR),
            os_release: None,
        }
    }
}

impl SetupConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render commands without executing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the directory holding the built wheel.
    #[must_use]
    pub fn dist_dir(mut self, dir: PathBuf) -> Self {
        self.dist_dir = dir;
        self
    }

    /// Override the os-release file used for distribution detection.
    #[must_use]
    pub fn os_release(mut self, path: PathBuf) -> Self {
        self.os_release = Some(path);
        self
    }

    /// Execution options derived from this configuration.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
        }
    }
}

/// Builds the dependency-installer plan for this host.
///
/// ## Errors
///
/// Propagates distribution-detection errors.
pub fn dependency_plan(config: &SetupConfig) -> Result<DependencyPlan> {
    let distro = match &config.os_release {
        Some(path) => distro::detect_distro_at(path)?,
        None => distro::detect_distro()?,
    };
    Ok(deps::plan_dependencies(&distro))
}

/// Builds the package-installer plan for the configured dist directory.
///
/// ## Errors
///
/// Propagates wheel-discovery errors.
pub fn package_plan(config: &SetupConfig) -> Result<PackagePlan> {
    wheel::plan_package(&config.dist_dir)
}
