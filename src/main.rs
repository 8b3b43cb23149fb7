//! install-cert - add a server's TLS certificate to a local trust store
//!
//! Connects to `<host>[:port]`, captures the certificate chain the server
//! presents, and lets the operator pick a certificate to add to the
//! `jssecacerts` trust store when the server is not already trusted.

use clap::error::ErrorKind;
use clap::Parser;
use console::style;
use install_cert::cli::{Cli, USAGE};
use install_cert::config;
use install_cert::enroll::{EnrollmentFlow, EnrollmentOutcome};
use install_cert::output::TerminalOperator;
use install_cert::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues => {
                println!("{}", USAGE);
                return;
            }
            _ => e.exit(),
        },
    };

    // Handle color preference
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = config::load_settings(cli.config.as_deref())?;
    cli.apply_overrides(&mut settings)?;
    let target = cli.connection_target(&settings)?;

    let mut flow = EnrollmentFlow::new(settings, target, TerminalOperator::stdin());
    match flow.run().await? {
        EnrollmentOutcome::Enrolled { alias, path, replaced } => {
            tracing::debug!(
                "Stored alias '{}' in {} (replaced existing: {})",
                alias,
                path.display(),
                replaced
            );
        }
        other => tracing::debug!("Trust store left unchanged: {:?}", other),
    }
    Ok(())
}
