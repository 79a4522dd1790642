//! The package-installer operation.
//!
//! Locates the single built `mmpm*.whl` artifact under a dist directory and
//! installs it into the invoking user's local prefix with `pip3 --user`.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::backend::path_dirs;
use crate::error::{Result, SetupError};
use crate::runner::{self, CommandSpec, RunOptions, RunOutcome};

/// File-name prefix the built wheel must carry.
pub const WHEEL_PREFIX: &str = "mmpm";

const WHEEL_SUFFIX: &str = ".whl";

/// Default directory holding the built artifact.
pub const DEFAULT_DIST_DIR: &str = "./dist";

/// Everything the package installer is about to do.
#[derive(Debug, Clone, Serialize)]
pub struct PackagePlan {
    /// The wheel that will be installed
    pub wheel: PathBuf,
    /// The exact command that will run
    pub command: CommandSpec,
}

/// Finds the single wheel matching `mmpm*.whl` under `dist_dir`.
///
/// ## Errors
///
/// - [`SetupError::WheelNotFound`] if the directory is missing or no wheel
///   matches
/// - [`SetupError::AmbiguousWheel`] if more than one wheel matches
pub fn find_wheel(dist_dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dist_dir).map_err(|_| SetupError::WheelNotFound {
        dir: dist_dir.to_path_buf(),
    })?;

    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(WHEEL_PREFIX)
            && name.ends_with(WHEEL_SUFFIX)
            && entry.path().is_file()
        {
            matches.push(entry.path());
        }
    }

    match matches.len() {
        0 => Err(SetupError::WheelNotFound {
            dir: dist_dir.to_path_buf(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(SetupError::AmbiguousWheel {
            dir: dist_dir.to_path_buf(),
            count,
        }),
    }
}

/// Builds the user-install command for a wheel.
#[must_use]
pub fn pip_install_command(wheel: &Path) -> CommandSpec {
    CommandSpec::new(
        "pip3",
        vec![
            "install".to_string(),
            "--user".to_string(),
            wheel.to_string_lossy().into_owned(),
        ],
    )
}

/// Builds the install plan for the wheel under `dist_dir`.
///
/// ## Errors
///
/// Propagates wheel-discovery errors from [`find_wheel`].
pub fn plan_package(dist_dir: &Path) -> Result<PackagePlan> {
    let wheel = find_wheel(dist_dir)?;
    let command = pip_install_command(&wheel);
    Ok(PackagePlan { wheel, command })
}

/// Executes a package plan.
///
/// ## Errors
///
/// Returns the runner's error if pip cannot be launched or exits non-zero;
/// the child's exit status is preserved in [`SetupError::CommandFailed`].
pub fn install_package(plan: &PackagePlan, opts: &RunOptions) -> Result<RunOutcome> {
    info!(wheel = %plan.wheel.display(), "installing mmpm wheel into the user prefix");
    runner::run(&plan.command, opts)
}

/// The user-local bin directory pip installs entry points into.
///
/// `None` when `HOME` is unset.
#[must_use]
pub fn local_bin_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("bin"))
}

/// Whether the user-local bin directory is currently on `PATH`.
#[must_use]
pub fn local_bin_on_path() -> bool {
    match local_bin_dir() {
        Some(dir) => path_dirs().iter().any(|d| *d == dir),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").expect("should write");
    }

    #[test]
    fn test_find_wheel_single_match() {
        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        touch(temp_dir.path(), "mmpm-2.0-py3-none-any.whl");

        let wheel = find_wheel(temp_dir.path()).expect("should find wheel");
        assert_eq!(
            wheel.file_name().and_then(|n| n.to_str()),
            Some("mmpm-2.0-py3-none-any.whl")
        );
    }

    #[test]
    fn test_find_wheel_ignores_other_artifacts() {
        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        touch(temp_dir.path(), "mmpm-2.0-py3-none-any.whl");
        touch(temp_dir.path(), "other-1.0-py3-none-any.whl");
        touch(temp_dir.path(), "mmpm-2.0.tar.gz");
        touch(temp_dir.path(), "notes.txt");

        let wheel = find_wheel(temp_dir.path()).expect("should find wheel");
        assert!(wheel.to_string_lossy().contains("mmpm-2.0-py3-none-any.whl"));
    }

    #[test]
    fn test_find_wheel_empty_dir_errors() {
        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        let err = find_wheel(temp_dir.path()).expect_err("should fail");
        assert!(matches!(err, SetupError::WheelNotFound { .. }));
    }

    #[test]
    fn test_find_wheel_missing_dir_errors() {
        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        let missing = temp_dir.path().join("no-dist-here");
        let err = find_wheel(&missing).expect_err("should fail");
        assert!(matches!(err, SetupError::WheelNotFound { .. }));
    }

    #[test]
    fn test_find_wheel_multiple_matches_errors() {
        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        touch(temp_dir.path(), "mmpm-1.0-py3-none-any.whl");
        touch(temp_dir.path(), "mmpm-2.0-py3-none-any.whl");

        let err = find_wheel(temp_dir.path()).expect_err("should fail");
        match err {
            SetupError::AmbiguousWheel { count, .. } => assert_eq!(count, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pip_install_command_is_user_install() {
        let wheel = Path::new("dist/mmpm-2.0-py3-none-any.whl");
        let cmd = pip_install_command(wheel);
        assert_eq!(
            cmd.to_string(),
            "pip3 install --user dist/mmpm-2.0-py3-none-any.whl"
        );
    }

    #[test]
    fn test_plan_package_dry_run() {
        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        touch(temp_dir.path(), "mmpm-2.0-py3-none-any.whl");

        let plan = plan_package(temp_dir.path()).expect("should plan");
        let outcome =
            install_package(&plan, &RunOptions::dry_run()).expect("dry run should succeed");
        assert!(!outcome.executed);
        assert!(outcome.command.starts_with("pip3 install --user"));
        assert!(outcome.command.contains("mmpm-2.0-py3-none-any.whl"));
    }

    #[test]
    fn test_plan_serializes_wheel_and_command() {
        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        touch(temp_dir.path(), "mmpm-2.0-py3-none-any.whl");

        let plan = plan_package(temp_dir.path()).expect("should plan");
        let json = serde_json::to_value(&plan).expect("serialization should succeed");
        assert_eq!(json["command"]["program"], "pip3");
        assert_eq!(json["command"]["args"][0], "install");
        assert_eq!(json["command"]["args"][1], "--user");
    }

    #[test]
    fn test_local_bin_dir_uses_home() {
        // HOME is set in any sane test environment; just check the shape.
        if let Some(dir) = local_bin_dir() {
            assert!(dir.ends_with(".local/bin"));
        }
    }
}
