//! # zmcos
//!
//! Prints the effective class of service of every Zimbra account as CSV.
//!
//! Credentials come from the local Zimbra configuration; the report goes to
//! stdout and logs go to stderr.

#![forbid(unsafe_code)]

mod cli;

use anyhow::Context;
use cli::Cli;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zmcos_core::ConnectionConfig;
use zmcos_ldap::DirectoryClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_normalized();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let connection = ConnectionConfig::load(&cli.config)
        .with_context(|| format!("failed to read {}", cli.config.display()))?;
    let config = cli
        .directory_config(connection)
        .context("invalid directory settings in localconfig")?;

    let client = DirectoryClient::new(config);
    let report = client
        .build_report(&cli.report_options())
        .await
        .context("failed to build class of service report")?;

    let mut out = BufWriter::new(io::stdout().lock());
    report
        .write_csv(&mut out)
        .context("failed to write report")?;

    info!(accounts = report.rows().len(), "Report complete");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
