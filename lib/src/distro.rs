//! Linux distribution detection and classification.
//!
//! Distribution information is read from `/etc/os-release` with fallbacks to
//! `/etc/lsb-release` and `/etc/system-release`, then classified into a
//! family that decides which package-manager backend provisions the host.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

const OS_RELEASE: &str = "/etc/os-release";
const LSB_RELEASE: &str = "/etc/lsb-release";
const SYSTEM_RELEASE: &str = "/etc/system-release";

/// Linux distribution family classification.
///
/// Groups distributions by their package-management lineage. Only families
/// with a corresponding [`crate::backend::PackageBackend`] are enumerated;
/// everything else is `Other` and gets the Debian toolchain by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LinuxFamily {
    /// Debian-based distributions (apt/dpkg)
    Debian,
    /// Red Hat-based distributions (dnf/rpm)
    RedHat,
    /// Arch-based distributions (pacman)
    Arch,
    /// SUSE-based distributions (zypper/rpm)
    SUSE,
    /// Alpine Linux (apk)
    Alpine,
    /// Unknown or unclassified distribution
    #[default]
    Other,
}

impl std::fmt::Display for LinuxFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinuxFamily::Debian => write!(f, "Debian"),
            LinuxFamily::RedHat => write!(f, "Red Hat"),
            LinuxFamily::Arch => write!(f, "Arch"),
            LinuxFamily::SUSE => write!(f, "SUSE"),
            LinuxFamily::Alpine => write!(f, "Alpine"),
            LinuxFamily::Other => write!(f, "Other"),
        }
    }
}

/// Linux distribution information parsed from a system release file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinuxDistro {
    /// Distribution identifier (e.g., "ubuntu", "arch")
    pub id: String,
    /// Human-readable distribution name (e.g., "Ubuntu", "Arch Linux")
    pub name: String,
    /// Distribution version (e.g., "22.04", "39")
    pub version: Option<String>,
    /// Distribution family classification
    pub family: LinuxFamily,
}

/// Infers the Linux distribution family from a distribution ID.
///
/// ## Examples
///
/// ```
/// use mmpm_setup_lib::distro::{infer_linux_family, LinuxFamily};
///
/// assert_eq!(infer_linux_family("ubuntu"), LinuxFamily::Debian);
/// assert_eq!(infer_linux_family("manjaro"), LinuxFamily::Arch);
/// assert_eq!(infer_linux_family("unknown"), LinuxFamily::Other);
/// ```
#[must_use]
pub fn infer_linux_family(distro_id: &str) -> LinuxFamily {
    const DEBIAN_DISTROS: &[&str] = &[
        "debian",
        "ubuntu",
        "mint",
        "linuxmint",
        "pop",
        "pop_os",
        "elementary",
        "kali",
        "raspbian",
        "devuan",
    ];

    const REDHAT_DISTROS: &[&str] = &[
        "fedora", "rhel", "centos", "rocky", "alma", "almalinux", "amzn",
    ];

    const ARCH_DISTROS: &[&str] = &[
        "arch",
        "archlinux",
        "manjaro",
        "endeavouros",
        "garuda",
        "artix",
    ];

    const SUSE_DISTROS: &[&str] = &[
        "opensuse",
        "suse",
        "sles",
        "opensuse-leap",
        "opensuse-tumbleweed",
    ];

    let id = distro_id.to_lowercase();
    let matches = |family: &[&str]| {
        family
            .iter()
            .any(|d| id == *d || id.starts_with(&format!("{d}-")))
    };

    if matches(DEBIAN_DISTROS) {
        LinuxFamily::Debian
    } else if matches(REDHAT_DISTROS) {
        LinuxFamily::RedHat
    } else if matches(ARCH_DISTROS) {
        LinuxFamily::Arch
    } else if matches(SUSE_DISTROS) {
        LinuxFamily::SUSE
    } else if id == "alpine" {
        LinuxFamily::Alpine
    } else {
        LinuxFamily::Other
    }
}

/// Classifies a distribution from its ID, falling back to the NAME field.
///
/// Release files without a usable `ID` still carry a descriptive `NAME`;
/// a name containing "Arch" classifies as the Arch family, and likewise for
/// the other families' flagship names.
fn classify(id: &str, name: &str) -> LinuxFamily {
    let family = infer_linux_family(id);
    if family != LinuxFamily::Other {
        return family;
    }

    let name = name.to_lowercase();
    if name.contains("arch") {
        LinuxFamily::Arch
    } else if name.contains("debian") || name.contains("ubuntu") {
        LinuxFamily::Debian
    } else if name.contains("fedora") || name.contains("red hat") || name.contains("centos") {
        LinuxFamily::RedHat
    } else if name.contains("suse") {
        LinuxFamily::SUSE
    } else if name.contains("alpine") {
        LinuxFamily::Alpine
    } else {
        LinuxFamily::Other
    }
}

/// Detects the host's Linux distribution.
///
/// Reads release information using a fallback chain:
/// 1. `/etc/os-release` (freedesktop.org standard)
/// 2. `/etc/lsb-release` (LSB standard)
/// 3. `/etc/system-release` (Red Hat legacy)
///
/// ## Errors
///
/// - [`SetupError::NotLinux`] when not running on Linux
/// - [`SetupError::DistroNotDetected`] when no release file parses
pub fn detect_distro() -> Result<LinuxDistro> {
    if std::env::consts::OS != "linux" {
        return Err(SetupError::NotLinux(std::env::consts::OS));
    }

    detect_distro_from_paths(
        Path::new(OS_RELEASE),
        Path::new(LSB_RELEASE),
        Path::new(SYSTEM_RELEASE),
    )
    .ok_or_else(|| SetupError::DistroNotDetected(PathBuf::from(OS_RELEASE)))
}

/// Detects the distribution from a specific os-release file.
///
/// Used when the release file location is overridden (tests, chroots).
pub fn detect_distro_at(os_release: &Path) -> Result<LinuxDistro> {
    fs::read_to_string(os_release)
        .ok()
        .as_deref()
        .and_then(parse_os_release_content)
        .ok_or_else(|| SetupError::DistroNotDetected(os_release.to_path_buf()))
}

/// Walks the release-file fallback chain with explicit paths.
#[must_use]
pub fn detect_distro_from_paths(
    os_release: &Path,
    lsb_release: &Path,
    system_release: &Path,
) -> Option<LinuxDistro> {
    if let Some(distro) = read_and_parse(os_release, parse_os_release_content) {
        return Some(distro);
    }
    if let Some(distro) = read_and_parse(lsb_release, parse_lsb_release_content) {
        return Some(distro);
    }
    read_and_parse(system_release, parse_system_release_content)
}

fn read_and_parse(
    path: &Path,
    parse: fn(&str) -> Option<LinuxDistro>,
) -> Option<LinuxDistro> {
    fs::read_to_string(path).ok().as_deref().and_then(parse)
}

/// Splits one `KEY=value` line, stripping surrounding quotes from the value.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key, value.trim_matches('"').trim_matches('\'')))
}

/// Parses `/etc/os-release` content.
///
/// The os-release file uses shell-compatible variable assignments:
/// ```text
/// NAME="Arch Linux"
/// ID=arch
/// ```
#[must_use]
pub fn parse_os_release_content(content: &str) -> Option<LinuxDistro> {
    let mut distro = LinuxDistro::default();

    for line in content.lines() {
        let Some((key, value)) = split_assignment(line) else {
            continue;
        };
        match key {
            "ID" => distro.id = value.to_lowercase(),
            "NAME" => distro.name = value.to_string(),
            "VERSION_ID" => distro.version = Some(value.to_string()),
            _ => {}
        }
    }

    if distro.id.is_empty() && distro.name.is_empty() {
        return None;
    }
    if distro.name.is_empty() {
        distro.name = distro.id.clone();
    }

    distro.family = classify(&distro.id, &distro.name);
    Some(distro)
}

/// Parses `/etc/lsb-release` content.
///
/// ```text
/// DISTRIB_ID=Ubuntu
/// DISTRIB_RELEASE=22.04
/// DISTRIB_DESCRIPTION="Ubuntu 22.04.3 LTS"
/// ```
#[must_use]
pub fn parse_lsb_release_content(content: &str) -> Option<LinuxDistro> {
    let mut distro = LinuxDistro::default();

    for line in content.lines() {
        let Some((key, value)) = split_assignment(line) else {
            continue;
        };
        match key {
            "DISTRIB_ID" => {
                distro.id = value.to_lowercase();
                if distro.name.is_empty() {
                    distro.name = value.to_string();
                }
            }
            "DISTRIB_RELEASE" => distro.version = Some(value.to_string()),
            "DISTRIB_DESCRIPTION" => {
                if !value.is_empty() {
                    distro.name = value.to_string();
                }
            }
            _ => {}
        }
    }

    if distro.id.is_empty() {
        return None;
    }

    distro.family = classify(&distro.id, &distro.name);
    Some(distro)
}

/// Parses `/etc/system-release` content.
///
/// A single line of the form `Name release Version (Codename)`:
/// ```text
/// CentOS Linux release 7.9.2009 (Core)
/// ```
#[must_use]
pub fn parse_system_release_content(content: &str) -> Option<LinuxDistro> {
    let line = content.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }

    let id = line
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();

    // Version is the token after the word "release"
    let version = line.to_lowercase().find("release").and_then(|pos| {
        line[pos + "release".len()..]
            .split_whitespace()
            .next()
            .map(str::to_string)
    });

    let family = classify(&id, line);

    Some(LinuxDistro {
        id,
        name: line.to_string(),
        version,
        family,
    })
}
