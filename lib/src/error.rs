use std::path::PathBuf;

/// Error types for the mmpm-setup library.
///
/// This enum encompasses all possible errors that can occur during
/// distribution detection, dependency provisioning, and wheel installation.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The host is not a Linux system.
    #[error("only Linux hosts can be provisioned (detected: {0})")]
    NotLinux(&'static str),

    /// No release file could be parsed into a distribution.
    #[error("unable to detect the Linux distribution from {0}")]
    DistroNotDetected(PathBuf),

    /// The selected package manager is not present on PATH.
    #[error("package manager `{backend}` not found on PATH")]
    BackendUnavailable { backend: &'static str },

    /// A package name or command argument failed shell-safety validation.
    #[error("invalid command argument `{arg}`: {reason}")]
    InvalidArgument { arg: String, reason: String },

    /// The external command could not be spawned at all.
    #[error("failed to launch `{program}`: {source}")]
    CommandLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external command ran and exited unsuccessfully.
    #[error("`{command}` failed with exit code {code:?}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// No wheel matching `mmpm*.whl` exists under the dist directory.
    #[error("no mmpm wheel found under {dir} (expected exactly one mmpm*.whl)")]
    WheelNotFound { dir: PathBuf },

    /// More than one wheel matched `mmpm*.whl`.
    #[error("{count} wheels match mmpm*.whl under {dir}; expected exactly one")]
    AmbiguousWheel { dir: PathBuf, count: usize },
}

impl SetupError {
    /// The process exit status a CLI should propagate for this error.
    ///
    /// A failed child process keeps its own exit code; every other failure
    /// maps to 1. A child killed by a signal has no code and also maps to 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::CommandFailed { code, .. } => code.unwrap_or(1),
            _ => 1,
        }
    }
}

/// Convenience Result type for mmpm-setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;
