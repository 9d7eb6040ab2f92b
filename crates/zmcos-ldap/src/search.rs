//! The three directory searches behind the COS report.
//!
//! Each search covers the whole tree below the configured base without a size
//! limit, so the directory returns every matching entry in one response.

use crate::{
    client::{LdapEntry, LdapSession, SearchScope},
    Result,
};
use tracing::{debug, warn};
use zmcos_core::{AccountRecord, ClassOfServiceCatalog, DomainDefaults, Error};

/// Filter selecting every class of service.
pub const COS_FILTER: &str = "(&(objectClass=zimbraCOS))";
/// Attributes requested for classes of service.
pub const COS_ATTRIBUTES: &[&str] = &["zimbraId", "cn"];

/// Filter selecting domains that declare a default class of service.
pub const DOMAIN_FILTER: &str = "(&(objectClass=zimbraDomain)(zimbraDomainDefaultCOSId=*))";
/// Attributes requested for domains.
pub const DOMAIN_ATTRIBUTES: &[&str] = &["zimbraDomainName", "zimbraDomainDefaultCOSId"];

/// Filter selecting real mail accounts, leaving out system accounts and
/// calendar resources.
pub const ACCOUNT_FILTER: &str = "(&(objectClass=zimbraAccount)(mail=*)(!(|(zimbraIsSystemAccount=TRUE)(objectClass=zimbraCalendarResource))))";

const MAIL_ATTRIBUTE: &str = "mail";
const COS_ID_ATTRIBUTE: &str = "zimbraCOSId";

/// Attributes requested for accounts: `mail`, `zimbraCOSId`, then the extra
/// attributes in the order given.
#[must_use]
pub fn account_attributes(extra_attributes: &[String]) -> Vec<String> {
    [MAIL_ATTRIBUTE, COS_ID_ATTRIBUTE]
        .into_iter()
        .map(str::to_owned)
        .chain(extra_attributes.iter().cloned())
        .collect()
}

pub(crate) async fn class_of_service_catalog(
    session: &mut dyn LdapSession,
    base_dn: &str,
) -> Result<ClassOfServiceCatalog> {
    let entries = session
        .search(base_dn, SearchScope::Subtree, COS_FILTER, &owned(COS_ATTRIBUTES))
        .await
        .map_err(labelled("class of service"))?;

    let mut catalog = ClassOfServiceCatalog::new();
    for entry in &entries {
        match (entry.first("zimbraId"), entry.first("cn")) {
            (Some(id), Some(name)) => catalog.insert(id, name),
            _ => warn!(dn = %entry.dn, "class of service entry without zimbraId or cn"),
        }
    }
    debug!(count = catalog.len(), "Loaded class of service catalog");
    Ok(catalog)
}

pub(crate) async fn domain_defaults(
    session: &mut dyn LdapSession,
    base_dn: &str,
) -> Result<DomainDefaults> {
    let entries = session
        .search(
            base_dn,
            SearchScope::Subtree,
            DOMAIN_FILTER,
            &owned(DOMAIN_ATTRIBUTES),
        )
        .await
        .map_err(labelled("domains"))?;

    let mut defaults = DomainDefaults::new();
    for entry in &entries {
        let Some(domain) = entry.first("zimbraDomainName") else {
            warn!(dn = %entry.dn, "domain entry without zimbraDomainName");
            continue;
        };
        defaults.insert(domain, entry.first_or_empty("zimbraDomainDefaultCOSId"));
    }
    debug!(count = defaults.len(), "Loaded domain default classes of service");
    Ok(defaults)
}

pub(crate) async fn accounts(
    session: &mut dyn LdapSession,
    base_dn: &str,
    extra_attributes: &[String],
) -> Result<Vec<AccountRecord>> {
    let entries = session
        .search(
            base_dn,
            SearchScope::Subtree,
            ACCOUNT_FILTER,
            &account_attributes(extra_attributes),
        )
        .await
        .map_err(labelled("accounts"))?;
    debug!(count = entries.len(), "Loaded accounts");

    Ok(entries
        .iter()
        .map(|entry| account_record(entry, extra_attributes))
        .collect())
}

fn account_record(entry: &LdapEntry, extra_attributes: &[String]) -> AccountRecord {
    AccountRecord::builder(entry.first_or_empty(MAIL_ATTRIBUTE))
        .explicit_cos_id(entry.first_or_empty(COS_ID_ATTRIBUTE))
        .extra_values(
            extra_attributes
                .iter()
                .map(|attribute| entry.first_or_empty(attribute)),
        )
        .build()
}

fn owned(attributes: &[&str]) -> Vec<String> {
    attributes.iter().map(|name| (*name).to_owned()).collect()
}

/// Names the failing search so the error says which query broke.
fn labelled(query: &'static str) -> impl Fn(Error) -> Error {
    move |err| match err {
        Error::SearchError { message, .. } => Error::search(query, message),
        other => other,
    }
}
