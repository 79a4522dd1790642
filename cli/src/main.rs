//! mmpm-setup CLI - bootstrap installer for the mmpm command-line tool.

use clap::{Parser, Subcommand};
use mmpm_setup_lib::{SetupConfig, SetupError, deps, wheel};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod output;

/// Bootstrap installer for the mmpm command-line tool
#[derive(Parser)]
#[command(name = "mmpm-setup", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the plan as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Show the commands without executing them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install mmpm's system dependencies (a pip client and make)
    Deps {
        /// Override the os-release file used for distribution detection
        #[arg(long, value_name = "PATH", hide = true)]
        os_release: Option<PathBuf>,
    },
    /// Install the built mmpm wheel into the user-local prefix
    Package {
        /// Directory holding the built mmpm*.whl artifact
        #[arg(long, value_name = "DIR", default_value = wheel::DEFAULT_DIST_DIR)]
        dist: PathBuf,
    },
}

const AFTER_HELP: &str = "\
TYPICAL FLOW:
  mmpm-setup deps       # provision the host (requires sudo)
  make                  # build the wheel into ./dist
  mmpm-setup package    # install the wheel into ~/.local

The process exits with the failed install command's status code, so both
steps compose cleanly in CI pipelines.
";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Setup(err) => err.exit_code(),
            CliError::Json(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            // ExitCode only carries a u8; anything out of range becomes 1
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1).max(1))
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Deps { os_release } => run_deps(cli, os_release.as_deref()),
        Commands::Package { dist } => run_package(cli, dist),
    }
}

fn run_deps(cli: &Cli, os_release: Option<&std::path::Path>) -> Result<(), CliError> {
    let mut config = SetupConfig::new().dry_run(cli.dry_run);
    if let Some(path) = os_release {
        config = config.os_release(path.to_path_buf());
    }

    output::notice(cli.json, "Installing mmpm dependencies");

    let plan = mmpm_setup_lib::dependency_plan(&config)?;
    tracing::debug!(backend = %plan.backend, "dependency plan ready");
    if cli.json {
        output::print_json(&plan)?;
    } else {
        output::print_dependency_plan(&plan, cli.dry_run);
    }

    let result = deps::install_dependencies(&plan, &config.run_options());

    // The completion notice prints even when the install failed; the error
    // itself goes to stderr and the child's exit status is propagated.
    output::notice(cli.json, "Finished installing mmpm dependencies");
    result.map(|_| ()).map_err(CliError::from)
}

fn run_package(cli: &Cli, dist: &std::path::Path) -> Result<(), CliError> {
    let config = SetupConfig::new()
        .dry_run(cli.dry_run)
        .dist_dir(dist.to_path_buf());

    output::notice(cli.json, "Installing mmpm");

    let plan = mmpm_setup_lib::package_plan(&config)?;
    tracing::debug!(wheel = %plan.wheel.display(), "package plan ready");
    if cli.json {
        output::print_json(&plan)?;
    } else {
        output::print_package_plan(&plan, cli.dry_run);
    }

    let result = wheel::install_package(&plan, &config.run_options());

    if !cli.json {
        output::print_path_reminder();
    }
    output::notice(cli.json, "Finished installing mmpm");
    result.map(|_| ()).map_err(CliError::from)
}

/// Initialize the tracing subscriber based on verbosity.
///
/// `RUST_LOG` takes precedence; otherwise -v raises the library's level to
/// info and -vv to debug. Logs always go to stderr so JSON output on stdout
/// stays parseable.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,mmpm_setup_lib=info".to_string(),
            _ => "debug".to_string(),
        },
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(base_filter))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
