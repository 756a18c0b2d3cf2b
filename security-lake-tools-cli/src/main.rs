//! Security Lake Tools CLI
//!
//! Entry point for the `security-lake-tools` command-line tool.
//!
//! # Exit Codes
//!
//! - `ExitCode::Success` (0): the source is registered (or already was), or
//!   the status report was printed
//! - `ExitCode::Failure` (1): a remote step failed; the classified reason and
//!   remediation are printed to stderr
//! - `ExitCode::Usage` (2): invalid arguments, rejected before any AWS call
//!
//! See `types::ExitCode` for the enum definition.

use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;

mod commands;
mod output;
mod types;

use commands::CreateSourceArgs;
use types::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "security-lake-tools",
    author,
    version,
    disable_version_flag = true,
    about = "Provision Amazon Security Lake custom sources for OCSF event classes",
    long_about = "Creates Amazon Security Lake custom sources for OCSF event classes, \
including the AWS Glue crawler role the source depends on.\n\n\
Examples:\n  \
security-lake-tools create-source --list\n  \
security-lake-tools create-source 1001 --region us-east-1 --account-id 123456789012 \
--external-id my-external-id\n  \
security-lake-tools status --region us-east-1"
)]
struct Cli {
    /// Show progress messages (INFO level)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Show all log output, including AWS SDK details (most verbose)
    #[arg(
        short = 'd',
        long = "debug",
        global = true,
        long_help = "Enables TRACE, DEBUG, INFO, WARN and ERROR messages. \
All log output is sent to stderr. If both --debug and --verbose are specified, \
--debug takes precedence."
    )]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a Security Lake custom source for an OCSF event class
    #[command(long_about = "Registers a custom source named tnz-ocsf-<CLASS_UID> with \
Amazon Security Lake. The Glue crawler role is verified first and created when it is \
missing, unless --no-create-role or --skip-role-check is given. Re-running for a source \
that already exists succeeds without changes.")]
    CreateSource(CreateSourceArgs),

    /// Show data lakes, recent exceptions, log sources and subscribers for a region
    Status {
        /// AWS region (defaults to the profile or environment region)
        #[arg(long = "region")]
        region: Option<String>,

        /// AWS profile to use
        #[arg(long = "profile")]
        profile: Option<String>,
    },

    #[command(
        about = "Print version information.",
        short_flag = 'V',
        long_flag = "version"
    )]
    Version,
}

/// Initialize logging based on configuration
fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let log_level = if debug {
        // Debug takes precedence
        log::LevelFilter::Trace
    } else if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp_secs()
        .try_init()?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.debug) {
        eprintln!("security-lake-tools: Failed to initialize logging: {e}");
        process::exit(ExitCode::Failure.into());
    }
    debug!("Parsed arguments: {cli:?}");

    let result = match cli.command {
        Commands::CreateSource(args) => commands::create_source(&args).await,
        Commands::Status { region, profile } => {
            commands::status(region.as_deref(), profile.as_deref()).await
        }
        Commands::Version => commands::print_version_info().map(|()| ExitCode::Success),
    };

    let code = result.unwrap_or_else(|e| {
        print_cli_command_error(e);
        ExitCode::Failure
    });

    process::exit(code.into());
}

fn print_cli_command_error(e: anyhow::Error) {
    eprintln!("Error: {e}");
    let mut source = e.source();
    while let Some(err) = source {
        eprintln!("  Caused by: {err}");
        source = err.source();
    }
}
