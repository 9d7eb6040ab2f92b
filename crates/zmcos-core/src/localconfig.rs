//! Zimbra local configuration reader.
//!
//! `localconfig.xml` is a flat list of `<key name="..."><value>...</value></key>`
//! pairs under a `<localconfig>` root. Only the four keys needed to reach the
//! directory are interpreted; everything else is kept but ignored.

use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use validator::{Validate, ValidationError};

/// Default location of the Zimbra local configuration.
pub const DEFAULT_LOCALCONFIG_PATH: &str = "/opt/zimbra/conf/localconfig.xml";

/// Key holding the directory host name.
pub const LDAP_HOST_KEY: &str = "ldap_host";
/// Key holding the directory port.
pub const LDAP_PORT_KEY: &str = "ldap_port";
/// Key holding the bind DN.
pub const LDAP_USER_DN_KEY: &str = "zimbra_ldap_userdn";
/// Key holding the bind password.
pub const LDAP_PASSWORD_KEY: &str = "zimbra_ldap_password";

/// Parsed `localconfig.xml` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename = "localconfig")]
pub struct LocalConfig {
    #[serde(rename = "key", default)]
    keys: Vec<LocalConfigKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct LocalConfigKey {
    #[serde(rename = "@name")]
    name: String,
    #[serde(default)]
    value: String,
}

impl LocalConfig {
    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read or is not
    /// well-formed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            Error::ConfigError(format!("failed to open {}: {err}", path.display()))
        })?;
        info!(path = %path.display(), "Successfully opened Zimbra localconfig");
        Self::parse(&contents)
    }

    /// Parses a document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document is not well-formed.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = quick_xml::de::from_str(contents)?;
        debug!(keys = config.keys.len(), "parsed localconfig");
        Ok(config)
    }

    /// Returns the value stored under `name`.
    ///
    /// When a key appears more than once the last occurrence wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.keys
            .iter()
            .rev()
            .find(|key| key.name == name)
            .map(|key| key.value.as_str())
    }

    /// Number of keys in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the document holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Parameters needed to reach and bind to the Zimbra directory.
///
/// Missing keys are carried as empty strings; call [`Validate::validate`]
/// before using the values to connect.
#[derive(Debug, Validate)]
pub struct ConnectionConfig {
    /// Directory host (`ldap_host`).
    #[validate(length(min = 1, message = "ldap_host is missing or empty"))]
    pub host: String,

    /// Directory port (`ldap_port`), kept as text as found in the file.
    #[validate(custom(function = "validate_port"))]
    pub port: String,

    /// Bind DN (`zimbra_ldap_userdn`).
    pub bind_user: String,

    /// Bind password (`zimbra_ldap_password`).
    pub bind_password: SecretString,
}

impl ConnectionConfig {
    /// Loads the connection parameters from the localconfig at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = LocalConfig::load(path)?;
        info!("Getting keys for ldapsearch");
        Ok(Self::from_local_config(&config))
    }

    /// Extracts the four connection keys from a parsed document.
    #[must_use]
    pub fn from_local_config(config: &LocalConfig) -> Self {
        let value = |key: &str| config.get(key).unwrap_or_default().to_string();
        Self {
            host: value(LDAP_HOST_KEY),
            port: value(LDAP_PORT_KEY),
            bind_user: value(LDAP_USER_DN_KEY),
            bind_password: SecretString::from(value(LDAP_PASSWORD_KEY)),
        }
    }
}

fn validate_port(port: &str) -> std::result::Result<(), ValidationError> {
    match port.trim().parse::<u16>() {
        Ok(value) if value > 0 => Ok(()),
        _ => {
            let mut error = ValidationError::new("port");
            error.message = Some(Cow::from(format!(
                "ldap_port `{port}` is not a valid TCP port"
            )));
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<localconfig>
  <key name="ldap_host">
    <value>ldap.example.com</value>
  </key>
  <key name="ldap_port">
    <value>389</value>
  </key>
  <key name="zimbra_ldap_userdn">
    <value>uid=zimbra,cn=admins,cn=zimbra</value>
  </key>
  <key name="zimbra_ldap_password">
    <value>s3cr&amp;t</value>
  </key>
  <key name="zimbra_home">
    <value>/opt/zimbra</value>
  </key>
</localconfig>
"#;

    #[test]
    fn parse_extracts_connection_keys() {
        let config = LocalConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.len(), 5);

        let connection = ConnectionConfig::from_local_config(&config);
        assert_eq!(connection.host, "ldap.example.com");
        assert_eq!(connection.port, "389");
        assert_eq!(connection.bind_user, "uid=zimbra,cn=admins,cn=zimbra");
        assert_eq!(connection.bind_password.expose_secret(), "s3cr&t");
        assert!(connection.validate().is_ok());
    }

    #[test]
    fn missing_keys_become_empty_strings() {
        let config = LocalConfig::parse(
            r#"<localconfig><key name="ldap_host"><value>ldap</value></key></localconfig>"#,
        )
        .unwrap();
        let connection = ConnectionConfig::from_local_config(&config);

        assert_eq!(connection.host, "ldap");
        assert_eq!(connection.port, "");
        assert_eq!(connection.bind_user, "");
        assert_eq!(connection.bind_password.expose_secret(), "");
    }

    #[test]
    fn last_duplicate_key_wins() {
        let config = LocalConfig::parse(
            r#"<localconfig>
                <key name="ldap_port"><value>389</value></key>
                <key name="ldap_port"><value>636</value></key>
            </localconfig>"#,
        )
        .unwrap();
        assert_eq!(config.get(LDAP_PORT_KEY), Some("636"));
    }

    #[test]
    fn empty_document_is_valid() {
        let config = LocalConfig::parse("<localconfig></localconfig>").unwrap();
        assert!(config.is_empty());
        assert_eq!(config.get(LDAP_HOST_KEY), None);
    }

    #[test]
    fn malformed_document_is_config_error() {
        let result = LocalConfig::parse("<localconfig><key name=\"x\">");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = LocalConfig::load("/nonexistent/zimbra/conf/localconfig.xml");
        match result {
            Err(Error::ConfigError(message)) => assert!(message.contains("failed to open")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_empty_host_and_bad_port() {
        let connection = ConnectionConfig {
            host: String::new(),
            port: "ldap".to_string(),
            bind_user: "uid=zimbra".to_string(),
            bind_password: SecretString::from("secret".to_string()),
        };
        let errors = connection.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("host"));
        assert!(fields.contains_key("port"));
    }

    #[test]
    fn validation_rejects_port_zero() {
        assert!(validate_port("0").is_err());
        assert!(validate_port("65536").is_err());
        assert!(validate_port("389").is_ok());
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = LocalConfig::parse(SAMPLE).unwrap();
        let connection = ConnectionConfig::from_local_config(&config);
        assert!(!format!("{connection:?}").contains("s3cr&t"));
    }
}
