//! Zimbra directory access for the COS report.
//!
//! This crate connects to the Zimbra LDAP server with `ldap3`, runs the
//! class of service, domain and account searches, and feeds the entries into
//! the resolution types from `zmcos-core`.

#![deny(missing_docs)]

mod client;
mod config;
mod search;

pub use client::{DirectoryClient, LdapEntry, SearchScope};
pub use config::{
    DirectoryConfig, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_OPERATION_TIMEOUT_SECS,
};
pub use search::{
    account_attributes, ACCOUNT_FILTER, COS_ATTRIBUTES, COS_FILTER, DOMAIN_ATTRIBUTES,
    DOMAIN_FILTER,
};

/// Convenient result alias that reuses the core error type.
pub type Result<T> = zmcos_core::Result<T>;
