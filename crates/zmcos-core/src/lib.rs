//! # zmcos-core
//!
//! Core types for reporting which class of service (COS) each Zimbra account
//! ends up with.
//!
//! This crate holds everything that does not need a live directory: reading
//! the Zimbra `localconfig.xml`, the COS catalog, per-domain default COS ids,
//! the account fallback resolution and the CSV report itself.
//!
//! ## Modules
//!
//! - [`error`] - Error types shared by every zmcos crate
//! - [`localconfig`] - Zimbra local configuration reader
//! - [`catalog`] - COS id/name lookup tables
//! - [`domain`] - Domain default COS mapping
//! - [`account`] - Account records and COS resolution
//! - [`report`] - Report assembly and CSV output

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod account;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod localconfig;
pub mod report;

// Re-export commonly used types
pub use account::{AccountRecord, CosSource, ResolvedCos};
pub use catalog::ClassOfServiceCatalog;
pub use domain::DomainDefaults;
pub use error::{Error, Result};
pub use localconfig::{ConnectionConfig, LocalConfig, DEFAULT_LOCALCONFIG_PATH};
pub use report::{CosReport, ReportOptions, ReportRow};
