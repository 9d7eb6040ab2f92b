//! Configuration types for reaching the Zimbra directory.

use crate::Result;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;
use zmcos_core::ConnectionConfig;

/// Default connection timeout (seconds).
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 10;
/// Default operation timeout (seconds).
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 120;

/// Configuration for connecting to the Zimbra directory.
#[derive(Debug)]
pub struct DirectoryConfig {
    url: String,
    bind_dn: String,
    bind_password: SecretString,
    base_dn: String,
    starttls: bool,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
    connection_timeout_secs: u64,
    operation_timeout_secs: u64,
}

impl DirectoryConfig {
    /// Creates a new directory configuration.
    ///
    /// StartTLS is enabled and certificate verification disabled, which is
    /// what a stock Zimbra install with a self-signed certificate needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided URL is invalid.
    pub fn new(
        url: impl Into<String>,
        bind_dn: impl Into<String>,
        bind_password: SecretString,
    ) -> Result<Self> {
        let url_string = url.into();
        Url::parse(&url_string)?;

        Ok(Self {
            url: url_string,
            bind_dn: bind_dn.into(),
            bind_password,
            base_dn: String::new(),
            starttls: true,
            tls_verify: false,
            tls_ca_cert: None,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            operation_timeout_secs: DEFAULT_OPERATION_TIMEOUT_SECS,
        })
    }

    /// Builds the configuration from the values found in `localconfig.xml`.
    ///
    /// # Errors
    ///
    /// Returns [`zmcos_core::Error::ConfigError`] if the host is empty or the
    /// port is not a valid TCP port.
    pub fn from_connection(connection: ConnectionConfig) -> Result<Self> {
        connection.validate()?;
        let url = ldap_url(&connection.host, connection.port.trim());
        Self::new(url, connection.bind_user, connection.bind_password)
    }

    /// Returns the directory URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the bind DN.
    #[must_use]
    pub fn bind_dn(&self) -> &str {
        &self.bind_dn
    }

    /// Returns the bind password.
    #[must_use]
    pub fn bind_password(&self) -> &str {
        self.bind_password.expose_secret()
    }

    /// Returns the search base. Empty means the whole directory.
    #[must_use]
    pub fn base_dn(&self) -> &str {
        &self.base_dn
    }

    /// Returns whether the connection is upgraded with StartTLS.
    #[must_use]
    pub const fn starttls(&self) -> bool {
        self.starttls
    }

    /// Returns whether TLS certificate verification is enabled.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    /// Optional custom CA certificate path.
    #[must_use]
    pub fn tls_ca_cert(&self) -> Option<&PathBuf> {
        self.tls_ca_cert.as_ref()
    }

    /// Returns the connection timeout duration.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Returns the operation timeout duration.
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    /// Overrides the search base.
    #[must_use]
    pub fn with_base_dn(mut self, dn: impl Into<String>) -> Self {
        self.base_dn = dn.into();
        self
    }

    /// Enables or disables the StartTLS upgrade.
    #[must_use]
    pub const fn with_starttls(mut self, starttls: bool) -> Self {
        self.starttls = starttls;
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verification(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Sets the custom CA certificate path for TLS verification.
    #[must_use]
    pub fn with_tls_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Overrides the connection timeout in seconds.
    #[must_use]
    pub const fn with_connection_timeout_secs(mut self, seconds: u64) -> Self {
        self.connection_timeout_secs = seconds;
        self
    }

    /// Overrides the operation timeout in seconds.
    #[must_use]
    pub const fn with_operation_timeout_secs(mut self, seconds: u64) -> Self {
        self.operation_timeout_secs = seconds;
        self
    }
}

fn ldap_url(host: &str, port: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("ldap://[{host}]:{port}")
    } else {
        format!("ldap://{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zmcos_core::{Error, LocalConfig};

    fn connection(host: &str, port: &str) -> ConnectionConfig {
        ConnectionConfig {
            host: host.to_string(),
            port: port.to_string(),
            bind_user: "uid=zimbra,cn=admins,cn=zimbra".to_string(),
            bind_password: SecretString::from("secret".to_string()),
        }
    }

    #[test]
    fn builder_overrides() {
        let config = DirectoryConfig::new(
            "ldap://ldap.example.com:389",
            "uid=zimbra,cn=admins,cn=zimbra",
            SecretString::from("secret".to_string()),
        )
        .unwrap()
        .with_base_dn("dc=example,dc=com")
        .with_starttls(false)
        .with_tls_verification(true)
        .with_tls_ca_cert(PathBuf::from("/opt/zimbra/conf/ca/ca.pem"))
        .with_connection_timeout_secs(20)
        .with_operation_timeout_secs(30);

        assert_eq!(config.base_dn(), "dc=example,dc=com");
        assert!(!config.starttls());
        assert!(config.tls_verify());
        assert_eq!(
            config.tls_ca_cert(),
            Some(&PathBuf::from("/opt/zimbra/conf/ca/ca.pem"))
        );
        assert_eq!(config.connection_timeout(), Duration::from_secs(20));
        assert_eq!(config.operation_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn defaults_match_stock_zimbra() {
        let config = DirectoryConfig::from_connection(connection("ldap.example.com", "389"))
            .unwrap();

        assert_eq!(config.url(), "ldap://ldap.example.com:389");
        assert_eq!(config.bind_dn(), "uid=zimbra,cn=admins,cn=zimbra");
        assert_eq!(config.bind_password(), "secret");
        assert_eq!(config.base_dn(), "");
        assert!(config.starttls());
        assert!(!config.tls_verify());
        assert!(config.tls_ca_cert().is_none());
        assert_eq!(
            config.operation_timeout(),
            Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS)
        );
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let config = DirectoryConfig::from_connection(connection("::1", "389")).unwrap();
        assert_eq!(config.url(), "ldap://[::1]:389");
    }

    #[test]
    fn missing_keys_are_rejected() {
        let local = LocalConfig::parse("<localconfig></localconfig>").unwrap();
        let result = DirectoryConfig::from_connection(ConnectionConfig::from_local_config(&local));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result = DirectoryConfig::from_connection(connection("ldap.example.com", "ldap"));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let result = DirectoryConfig::new(
            "not a url",
            "uid=zimbra",
            SecretString::from("secret".to_string()),
        );
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
