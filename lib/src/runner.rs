//! Safe execution of external install commands.
//!
//! Commands are argv vectors executed directly, never through a shell, and
//! every argument is validated against shell metacharacters first. Dry-run
//! mode renders the command without spawning anything.

use serde::{Deserialize, Serialize};
use std::process::{Command, Output};
use tracing::{debug, info};

use crate::error::{Result, SetupError};

/// Characters that are not allowed in command arguments.
const SHELL_METACHARACTERS: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '[', ']', '<', '>', '"', '\'', '\\', '\n', '\r',
    '\t', '*', '?', '!', '#', '~', '^',
];

/// Validates that an argument is safe to hand to a child process.
///
/// ## Errors
///
/// Returns an error if the argument is empty or contains shell
/// metacharacters.
pub fn validate_argument(arg: &str) -> Result<()> {
    if arg.is_empty() {
        return Err(SetupError::InvalidArgument {
            arg: arg.to_string(),
            reason: "empty argument".to_string(),
        });
    }

    for c in SHELL_METACHARACTERS {
        if arg.contains(*c) {
            return Err(SetupError::InvalidArgument {
                arg: arg.to_string(),
                reason: format!("contains invalid character '{c}'"),
            });
        }
    }

    Ok(())
}

/// One external command as a program plus argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Creates a command spec from a program and its arguments.
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Options controlling command execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Render the command without executing it.
    pub dry_run: bool,
}

impl RunOptions {
    /// Options for a dry run (no execution).
    #[must_use]
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Result of one external command.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// The command that was (or would be) executed.
    pub command: String,
    /// Whether the command was actually executed (false for dry-run).
    pub executed: bool,
    /// Exit code if executed (None for dry-run or signal death).
    pub exit_code: Option<i32>,
    /// Captured stdout if executed.
    pub stdout: String,
    /// Captured stderr if executed.
    pub stderr: String,
}

impl RunOutcome {
    fn dry_run(command: String) -> Self {
        Self {
            command,
            executed: false,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn from_output(command: String, output: Output) -> Self {
        Self {
            command,
            executed: true,
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Executes a command, capturing its output.
///
/// ## Errors
///
/// Returns an error if an argument fails validation, the program cannot be
/// spawned, or the child exits unsuccessfully. A non-zero exit converts to
/// [`SetupError::CommandFailed`] carrying the child's exit code so callers
/// can propagate it as the process status.
pub fn run(spec: &CommandSpec, opts: &RunOptions) -> Result<RunOutcome> {
    validate_argument(&spec.program)?;
    for arg in &spec.args {
        validate_argument(arg)?;
    }

    let command = spec.to_string();

    if opts.dry_run {
        info!(%command, "dry run, not executing");
        return Ok(RunOutcome::dry_run(command));
    }

    info!(%command, "executing");
    let output = Command::new(&spec.program)
        .args(&spec.args)
        .output()
        .map_err(|source| SetupError::CommandLaunch {
            program: spec.program.clone(),
            source,
        })?;

    let outcome = RunOutcome::from_output(command, output);
    debug!(exit_code = ?outcome.exit_code, "command finished");

    if outcome.exit_code != Some(0) {
        return Err(SetupError::CommandFailed {
            command: outcome.command,
            code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    Ok(outcome)
}
