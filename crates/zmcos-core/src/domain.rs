//! Per-domain default class of service.

use std::collections::HashMap;

/// Maps a domain name to the COS id set in its `zimbraDomainDefaultCOSId`.
///
/// Only domains that declare a default are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainDefaults {
    by_domain: HashMap<String, String>,
}

impl DomainDefaults {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the default COS id of a domain.
    pub fn insert(&mut self, domain: impl Into<String>, cos_id: impl Into<String>) {
        self.by_domain.insert(domain.into(), cos_id.into());
    }

    /// Default COS id of `domain`; empty values are treated as absent.
    #[must_use]
    pub fn cos_id_for(&self, domain: &str) -> Option<&str> {
        self.by_domain
            .get(domain)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Number of domains with a default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_domain.len()
    }

    /// Returns true if no domain declares a default.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_domain.is_empty()
    }
}

impl<D, C> FromIterator<(D, C)> for DomainDefaults
where
    D: Into<String>,
    C: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (D, C)>>(iter: T) -> Self {
        let mut defaults = Self::new();
        for (domain, cos_id) in iter {
            defaults.insert(domain, cos_id);
        }
        defaults
    }
}
