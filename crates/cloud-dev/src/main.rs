mod commands;
mod config;
mod error;
mod providers;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clouddev_core::Operation;
use tracing_subscriber::EnvFilter;

use crate::commands::{DeploymentArgs, SecretArgs};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::{CliError, Result};

#[derive(Parser)]
#[command(name = "cloud-dev")]
#[command(version = env!("CLOUD_DEV_VERSION"))]
#[command(about = "Create, update and delete on-demand test environments", long_about = None)]
struct Cli {
    /// Workflow to run
    #[arg(value_enum)]
    operation: Operation,

    /// Company e-mail address of the environment's owner
    email: String,

    /// Name of the app being deployed
    app_name: String,

    /// Environment configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(flatten)]
    deployment: DeploymentArgs,

    #[command(flatten)]
    secrets: SecretArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let environment = config::load_environment(&cli.config)?;
    config::check_aws_credentials(|name| std::env::var(name).ok())?;

    let invocation = commands::Invocation::new(cli.operation, cli.email, cli.app_name, cli.deployment)?;
    let secrets = cli.secrets.into_secrets();
    let providers = providers::build(&environment, &secrets).map_err(|source| CliError::Operation {
        operation: cli.operation,
        source,
    })?;

    invocation.execute(&environment, providers)
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
