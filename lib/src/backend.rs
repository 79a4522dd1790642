//! Package-manager backends.
//!
//! Each backend knows its executable, its non-interactive install syntax,
//! and the name the pip client package carries on that distribution family.
//! Adding support for another family means adding a variant here, not
//! another string-matching branch at the call sites.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::distro::LinuxFamily;
use crate::runner::CommandSpec;

/// System package managers this bootstrapper can drive.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PackageBackend {
    /// APT - Debian/Ubuntu package manager
    Apt,
    /// pacman - Arch Linux package manager
    Pacman,
    /// DNF - Fedora/RHEL package manager
    Dnf,
    /// zypper - SUSE/openSUSE package manager
    Zypper,
    /// apk - Alpine Linux package manager
    Apk,
}

impl PackageBackend {
    /// The command-line executable name for this backend.
    #[must_use]
    pub const fn executable_name(&self) -> &'static str {
        match self {
            PackageBackend::Apt => "apt",
            PackageBackend::Pacman => "pacman",
            PackageBackend::Dnf => "dnf",
            PackageBackend::Zypper => "zypper",
            PackageBackend::Apk => "apk",
        }
    }

    /// The backend for a distribution family.
    ///
    /// Unrecognized families get the Debian toolchain.
    #[must_use]
    pub const fn for_family(family: LinuxFamily) -> Self {
        match family {
            LinuxFamily::Arch => PackageBackend::Pacman,
            LinuxFamily::RedHat => PackageBackend::Dnf,
            LinuxFamily::SUSE => PackageBackend::Zypper,
            LinuxFamily::Alpine => PackageBackend::Apk,
            LinuxFamily::Debian | LinuxFamily::Other => PackageBackend::Apt,
        }
    }

    /// The distribution name of the pip client package on this family.
    #[must_use]
    pub const fn pip_package(&self) -> &'static str {
        match self {
            PackageBackend::Pacman => "python-pip",
            PackageBackend::Apk => "py3-pip",
            PackageBackend::Apt | PackageBackend::Dnf | PackageBackend::Zypper => "python3-pip",
        }
    }

    /// Builds the non-interactive install command for the given packages,
    /// including the privilege-escalation prefix.
    #[must_use]
    pub fn install_command(&self, packages: &[&str]) -> CommandSpec {
        let mut args: Vec<String> = match self {
            PackageBackend::Apt => vec!["apt", "install", "-y"],
            PackageBackend::Pacman => vec!["pacman", "-S", "--noconfirm"],
            PackageBackend::Dnf => vec!["dnf", "install", "-y"],
            PackageBackend::Zypper => vec!["zypper", "--non-interactive", "install"],
            PackageBackend::Apk => vec!["apk", "add"],
        }
        .into_iter()
        .map(String::from)
        .collect();

        args.extend(packages.iter().map(|p| (*p).to_string()));
        CommandSpec::new("sudo", args)
    }

    /// Full path of this backend's executable if it is present on `PATH`.
    #[must_use]
    pub fn locate(&self) -> Option<PathBuf> {
        command_exists_in_path(self.executable_name(), &path_dirs())
    }
}

/// Parses the `PATH` environment variable into a list of existing directories.
#[must_use]
pub fn path_dirs() -> Vec<PathBuf> {
    let Ok(path_var) = std::env::var("PATH") else {
        return Vec::new();
    };

    path_var
        .split(':')
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .filter(|p| p.is_dir())
        .collect()
}

/// Checks whether a command exists in the given `PATH` directories.
///
/// This performs a direct filesystem check (file exists and has an execute
/// bit) rather than spawning `which` for each command.
#[cfg(unix)]
#[must_use]
pub fn command_exists_in_path(cmd: &str, path_dirs: &[PathBuf]) -> Option<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    for dir in path_dirs {
        let candidate = dir.join(cmd);
        if candidate.is_file() {
            if let Ok(metadata) = candidate.metadata() {
                if metadata.permissions().mode() & 0o111 != 0 {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

#[cfg(not(unix))]
#[must_use]
pub fn command_exists_in_path(_cmd: &str, _path_dirs: &[PathBuf]) -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_backend_for_family_mapping() {
        assert_eq!(
            PackageBackend::for_family(LinuxFamily::Debian),
            PackageBackend::Apt
        );
        assert_eq!(
            PackageBackend::for_family(LinuxFamily::Arch),
            PackageBackend::Pacman
        );
        assert_eq!(
            PackageBackend::for_family(LinuxFamily::RedHat),
            PackageBackend::Dnf
        );
        assert_eq!(
            PackageBackend::for_family(LinuxFamily::SUSE),
            PackageBackend::Zypper
        );
        assert_eq!(
            PackageBackend::for_family(LinuxFamily::Alpine),
            PackageBackend::Apk
        );
    }

    #[test]
    fn test_unknown_family_falls_back_to_apt() {
        assert_eq!(
            PackageBackend::for_family(LinuxFamily::Other),
            PackageBackend::Apt
        );
    }

    #[test]
    fn test_pip_package_per_family() {
        assert_eq!(PackageBackend::Apt.pip_package(), "python3-pip");
        assert_eq!(PackageBackend::Pacman.pip_package(), "python-pip");
        assert_eq!(PackageBackend::Dnf.pip_package(), "python3-pip");
        assert_eq!(PackageBackend::Zypper.pip_package(), "python3-pip");
        assert_eq!(PackageBackend::Apk.pip_package(), "py3-pip");
    }

    #[test]
    fn test_install_command_apt() {
        let cmd = PackageBackend::Apt.install_command(&["python3-pip", "make"]);
        assert_eq!(
            cmd.to_string(),
            "sudo apt install -y python3-pip make"
        );
    }

    #[test]
    fn test_install_command_pacman() {
        let cmd = PackageBackend::Pacman.install_command(&["python-pip", "make"]);
        assert_eq!(
            cmd.to_string(),
            "sudo pacman -S --noconfirm python-pip make"
        );
    }

    #[test]
    fn test_install_command_other_backends_are_non_interactive() {
        let dnf = PackageBackend::Dnf.install_command(&["make"]).to_string();
        assert!(dnf.contains("-y"));

        let zypper = PackageBackend::Zypper.install_command(&["make"]).to_string();
        assert!(zypper.contains("--non-interactive"));

        let apk = PackageBackend::Apk.install_command(&["make"]).to_string();
        assert_eq!(apk, "sudo apk add make");
    }

    #[test]
    fn test_backend_display_is_lowercase() {
        assert_eq!(PackageBackend::Apt.to_string(), "apt");
        assert_eq!(PackageBackend::Pacman.to_string(), "pacman");
        assert_eq!(PackageBackend::Zypper.to_string(), "zypper");
    }

    #[test]
    fn test_backend_serialization_matches_display() {
        for backend in PackageBackend::iter() {
            let json = serde_json::to_string(&backend).expect("serialization should succeed");
            assert_eq!(json, format!("\"{backend}\""));
        }
    }

    #[test]
    fn test_every_backend_names_an_executable() {
        for backend in PackageBackend::iter() {
            assert!(!backend.executable_name().is_empty());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_exists_in_path_finds_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        let exe = temp_dir.path().join("fake-tool");
        std::fs::write(&exe, "#!/bin/sh\n").expect("should write");
        let mut perms = std::fs::metadata(&exe).expect("metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&exe, perms).expect("should set permissions");

        let dirs = vec![temp_dir.path().to_path_buf()];
        assert_eq!(command_exists_in_path("fake-tool", &dirs), Some(exe));
        assert!(command_exists_in_path("missing-tool", &dirs).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_exists_in_path_requires_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().expect("should create temp dir");
        let file = temp_dir.path().join("not-executable");
        std::fs::write(&file, "data").expect("should write");
        let mut perms = std::fs::metadata(&file).expect("metadata").permissions();
        perms.set_mode(0o644);
        std::fs::set_permissions(&file, perms).expect("should set permissions");

        let dirs = vec![temp_dir.path().to_path_buf()];
        assert!(command_exists_in_path("not-executable", &dirs).is_none());
    }
}
