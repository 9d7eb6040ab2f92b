//! Account records and class of service resolution.

use crate::{catalog::ClassOfServiceCatalog, domain::DomainDefaults};

/// One account returned by the account search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    mail: String,
    explicit_cos_id: Option<String>,
    extra_values: Vec<String>,
}

/// Where a resolved COS id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CosSource {
    /// The account's own `zimbraCOSId`.
    Explicit,
    /// The `zimbraDomainDefaultCOSId` of the account's domain.
    DomainDefault,
    /// The COS named `default`.
    GlobalDefault,
    /// Nothing matched; the id is empty.
    Unresolved,
}

/// Effective COS of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCos {
    /// COS id, empty when [`CosSource::Unresolved`].
    pub id: String,
    /// Step of the fallback chain that produced the id.
    pub source: CosSource,
}

impl ResolvedCos {
    /// Value shown in the COS column: the id itself, or its catalog name
    /// (empty when the id is not in the catalog).
    #[must_use]
    pub fn display<'a>(
        &'a self,
        catalog: &'a ClassOfServiceCatalog,
        use_cos_id: bool,
    ) -> &'a str {
        if use_cos_id {
            &self.id
        } else {
            catalog.name_of(&self.id).unwrap_or_default()
        }
    }
}

impl AccountRecord {
    /// Creates a new builder for the account with the given mail address.
    #[must_use]
    pub fn builder(mail: impl Into<String>) -> AccountRecordBuilder {
        AccountRecordBuilder {
            mail: mail.into(),
            explicit_cos_id: None,
            extra_values: Vec::new(),
        }
    }

    /// Primary mail address.
    #[must_use]
    pub fn mail(&self) -> &str {
        &self.mail
    }

    /// Domain part of the mail address.
    ///
    /// Returns `None` unless the address contains exactly one `@`.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        split_mail(&self.mail).map(|(_, domain)| domain)
    }

    /// COS id set directly on the account, if any.
    #[must_use]
    pub fn explicit_cos_id(&self) -> Option<&str> {
        self.explicit_cos_id.as_deref()
    }

    /// Values of the extra attributes, in requested order.
    #[must_use]
    pub fn extra_values(&self) -> &[String] {
        &self.extra_values
    }

    /// Resolves the effective COS id.
    ///
    /// Order: explicit id, then the domain default, then the id of the COS
    /// named `default`, otherwise an empty id.
    #[must_use]
    pub fn resolve_cos(
        &self,
        defaults: &DomainDefaults,
        catalog: &ClassOfServiceCatalog,
    ) -> ResolvedCos {
        if let Some(id) = self.explicit_cos_id() {
            return ResolvedCos {
                id: id.to_string(),
                source: CosSource::Explicit,
            };
        }

        if let Some(id) = self.domain().and_then(|domain| defaults.cos_id_for(domain)) {
            return ResolvedCos {
                id: id.to_string(),
                source: CosSource::DomainDefault,
            };
        }

        match catalog.default_id() {
            Some(id) => ResolvedCos {
                id: id.to_string(),
                source: CosSource::GlobalDefault,
            },
            None => ResolvedCos {
                id: String::new(),
                source: CosSource::Unresolved,
            },
        }
    }
}

/// Builder for [`AccountRecord`].
#[derive(Debug)]
pub struct AccountRecordBuilder {
    mail: String,
    explicit_cos_id: Option<String>,
    extra_values: Vec<String>,
}

impl AccountRecordBuilder {
    /// Sets the account's own COS id. Empty ids are ignored.
    #[must_use]
    pub fn explicit_cos_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.explicit_cos_id = (!id.is_empty()).then_some(id);
        self
    }

    /// Appends the value of the next extra attribute.
    #[must_use]
    pub fn extra_value(mut self, value: impl Into<String>) -> Self {
        self.extra_values.push(value.into());
        self
    }

    /// Appends several extra attribute values.
    #[must_use]
    pub fn extra_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Builds the [`AccountRecord`].
    #[must_use]
    pub fn build(self) -> AccountRecord {
        AccountRecord {
            mail: self.mail,
            explicit_cos_id: self.explicit_cos_id,
            extra_values: self.extra_values,
        }
    }
}

/// Splits an address into local part and domain when it has exactly one `@`.
#[must_use]
pub fn split_mail(mail: &str) -> Option<(&str, &str)> {
    let (local, domain) = mail.split_once('@')?;
    if domain.contains('@') {
        return None;
    }
    Some((local, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ClassOfServiceCatalog {
        [("c1", "Standard"), ("c2", "default")].into_iter().collect()
    }

    fn defaults() -> DomainDefaults {
        [("example.com", "c1")].into_iter().collect()
    }

    #[test]
    fn explicit_id_wins() {
        let account = AccountRecord::builder("c@example.com")
            .explicit_cos_id("c2")
            .build();
        let resolved = account.resolve_cos(&defaults(), &catalog());

        assert_eq!(resolved.id, "c2");
        assert_eq!(resolved.source, CosSource::Explicit);
    }

    #[test]
    fn explicit_id_not_in_catalog_still_wins() {
        let account = AccountRecord::builder("c@example.com")
            .explicit_cos_id("gone")
            .build();
        let resolved = account.resolve_cos(&defaults(), &catalog());

        assert_eq!(resolved.id, "gone");
        assert_eq!(resolved.display(&catalog(), false), "");
        assert_eq!(resolved.display(&catalog(), true), "gone");
    }

    #[test]
    fn domain_default_applies_without_explicit_id() {
        let account = AccountRecord::builder("a@example.com")
            .explicit_cos_id("")
            .build();
        let resolved = account.resolve_cos(&defaults(), &catalog());

        assert_eq!(resolved.id, "c1");
        assert_eq!(resolved.source, CosSource::DomainDefault);
        assert_eq!(resolved.display(&catalog(), false), "Standard");
        assert_eq!(resolved.display(&catalog(), true), "c1");
    }

    #[test]
    fn global_default_for_unknown_domain() {
        let account = AccountRecord::builder("b@other.org").build();
        let resolved = account.resolve_cos(&defaults(), &catalog());

        assert_eq!(resolved.id, "c2");
        assert_eq!(resolved.source, CosSource::GlobalDefault);
        assert_eq!(resolved.display(&catalog(), false), "default");
    }

    #[test]
    fn unresolved_without_default_cos() {
        let catalog: ClassOfServiceCatalog = [("c1", "Standard")].into_iter().collect();
        let account = AccountRecord::builder("b@other.org").build();
        let resolved = account.resolve_cos(&defaults(), &catalog);

        assert_eq!(resolved.id, "");
        assert_eq!(resolved.source, CosSource::Unresolved);
        assert_eq!(resolved.display(&catalog, false), "");
        assert_eq!(resolved.display(&catalog, true), "");
    }

    #[test]
    fn domain_requires_exactly_one_at() {
        assert_eq!(
            AccountRecord::builder("a@example.com").build().domain(),
            Some("example.com")
        );
        assert_eq!(AccountRecord::builder("postmaster").build().domain(), None);
        assert_eq!(AccountRecord::builder("a@b@c").build().domain(), None);
        assert_eq!(split_mail("@example.com"), Some(("", "example.com")));
    }

    #[test]
    fn builder_keeps_extra_value_order() {
        let account = AccountRecord::builder("a@example.com")
            .extra_value("Alice")
            .extra_values(["", "active"])
            .build();
        assert_eq!(account.extra_values(), ["Alice", "", "active"]);
        assert_eq!(account.explicit_cos_id(), None);
        assert_eq!(account.mail(), "a@example.com");
    }
}
