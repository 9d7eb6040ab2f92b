//! CLI argument parsing.

use clap::{Arg, CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use zmcos_core::{ConnectionConfig, ReportOptions, DEFAULT_LOCALCONFIG_PATH};
use zmcos_ldap::{DirectoryConfig, DEFAULT_OPERATION_TIMEOUT_SECS};

/// zmcos - print the class of service of every Zimbra account as CSV.
#[derive(Debug, Parser)]
#[command(name = "zmcos")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show the account domain in the first column.
    #[arg(long)]
    pub domain: bool,

    /// Show the COS id instead of the COS name.
    #[arg(long)]
    pub nocosname: bool,

    /// Add a column for this account attribute (repeatable).
    #[arg(long = "add", value_name = "ATTRIBUTE")]
    pub add: Vec<String>,

    /// Zimbra local configuration holding the LDAP credentials.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOCALCONFIG_PATH)]
    pub config: PathBuf,

    /// Timeout for each directory operation, in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_OPERATION_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Verify the directory's TLS certificate.
    #[arg(long)]
    pub tls_verify: bool,

    /// CA certificate to trust when verifying the directory.
    #[arg(long, value_name = "PATH", requires = "tls_verify")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses the process arguments, accepting single-dash long flags.
    #[must_use]
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Display options for the report.
    #[must_use]
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            show_domain: self.domain,
            use_cos_id: self.nocosname,
            extra_attributes: self.add.clone(),
        }
    }

    /// Directory settings for the credentials read from localconfig.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the host or port is unusable.
    pub fn directory_config(
        &self,
        connection: ConnectionConfig,
    ) -> zmcos_core::Result<DirectoryConfig> {
        let mut config = DirectoryConfig::from_connection(connection)?
            .with_operation_timeout_secs(self.timeout)
            .with_tls_verification(self.tls_verify);
        if let Some(path) = &self.tls_ca_cert {
            config = config.with_tls_ca_cert(path.clone());
        }
        Ok(config)
    }
}

/// Rewrites `-name` and `-name=value` into `--name` forms for every long
/// flag the CLI knows, so `zmcos -domain -add displayName` keeps working.
///
/// Arguments after `--` are left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let long_flags: Vec<&str> = command
        .get_arguments()
        .filter_map(Arg::get_long)
        .chain(["help", "version"])
        .collect();

    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            if let Some(flag) = text.strip_prefix('-').filter(|rest| !rest.starts_with('-')) {
                let name = flag.split_once('=').map_or(flag, |(name, _)| name);
                if long_flags.contains(&name) {
                    return OsString::from(format!("-{text}"));
                }
            }
            arg
        })
        .collect()
}
