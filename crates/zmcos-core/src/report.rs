//! Report assembly and CSV output.
//!
//! The whole report is resolved in memory first; nothing is written until
//! every account has been processed. Each field is terminated by a comma,
//! including the last one on a line, which downstream tooling relies on.

use crate::{
    account::AccountRecord, catalog::ClassOfServiceCatalog, domain::DomainDefaults, Result,
};
use std::borrow::Cow;
use std::io::Write;
use tracing::{debug, warn};

/// Header of the optional domain column.
pub const DOMAIN_COLUMN: &str = "domain";
/// Header of the mail column.
pub const EMAIL_COLUMN: &str = "email";
/// Header of the class of service column.
pub const COS_COLUMN: &str = "COS";

/// Display choices for the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Prepend a `domain` column.
    pub show_domain: bool,
    /// Show the COS id instead of its name.
    pub use_cos_id: bool,
    /// Extra account attributes, one column each, in this order.
    pub extra_attributes: Vec<String>,
}

impl ReportOptions {
    /// Creates options with every flag off and no extra attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the domain column.
    #[must_use]
    pub const fn with_domain_column(mut self, show: bool) -> Self {
        self.show_domain = show;
        self
    }

    /// Shows COS ids instead of names.
    #[must_use]
    pub const fn with_cos_id(mut self, use_id: bool) -> Self {
        self.use_cos_id = use_id;
        self
    }

    /// Appends an extra attribute column.
    #[must_use]
    pub fn with_extra_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.extra_attributes.push(attribute.into());
        self
    }

    /// Column names, in output order.
    #[must_use]
    pub fn header(&self) -> Vec<&str> {
        let mut header = Vec::with_capacity(self.column_count());
        if self.show_domain {
            header.push(DOMAIN_COLUMN);
        }
        header.push(EMAIL_COLUMN);
        header.push(COS_COLUMN);
        header.extend(self.extra_attributes.iter().map(String::as_str));
        header
    }

    /// Number of columns in every line of the report.
    #[must_use]
    pub fn column_count(&self) -> usize {
        2 + self.extra_attributes.len() + usize::from(self.show_domain)
    }
}

/// One resolved account line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Domain part of the address.
    pub domain: String,
    /// Account mail address.
    pub mail: String,
    /// COS name or id, depending on the options.
    pub cos: String,
    /// Extra attribute values, one per requested attribute.
    pub extra: Vec<String>,
}

impl ReportRow {
    fn fields(&self, show_domain: bool) -> Vec<&str> {
        let mut fields = Vec::with_capacity(3 + self.extra.len());
        if show_domain {
            fields.push(self.domain.as_str());
        }
        fields.push(self.mail.as_str());
        fields.push(self.cos.as_str());
        fields.extend(self.extra.iter().map(String::as_str));
        fields
    }
}

/// Fully resolved COS report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosReport {
    options: ReportOptions,
    rows: Vec<ReportRow>,
    skipped: usize,
}

impl CosReport {
    /// Resolves every account, keeping directory order.
    ///
    /// Accounts whose mail address does not contain exactly one `@` are
    /// skipped and counted in [`CosReport::skipped`].
    #[must_use]
    pub fn build<I>(
        catalog: &ClassOfServiceCatalog,
        defaults: &DomainDefaults,
        accounts: I,
        options: &ReportOptions,
    ) -> Self
    where
        I: IntoIterator<Item = AccountRecord>,
    {
        let extra_columns = options.extra_attributes.len();
        let mut rows = Vec::new();
        let mut skipped = 0;

        for account in accounts {
            let Some(domain) = account.domain() else {
                warn!(mail = account.mail(), "skipping account with malformed mail address");
                skipped += 1;
                continue;
            };

            let resolved = account.resolve_cos(defaults, catalog);
            debug!(
                mail = account.mail(),
                cos_id = %resolved.id,
                source = ?resolved.source,
                "resolved class of service"
            );

            let mut extra = account.extra_values().to_vec();
            extra.resize(extra_columns, String::new());

            rows.push(ReportRow {
                domain: domain.to_string(),
                mail: account.mail().to_string(),
                cos: resolved.display(catalog, options.use_cos_id).to_string(),
                extra,
            });
        }

        Self {
            options: options.clone(),
            rows,
            skipped,
        }
    }

    /// Column names, in output order.
    #[must_use]
    pub fn header(&self) -> Vec<&str> {
        self.options.header()
    }

    /// Resolved account lines.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Field values of every line, in output order.
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows
            .iter()
            .map(|row| row.fields(self.options.show_domain))
    }

    /// Number of accounts left out because of a malformed address.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Writes the header and every row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutputError`] if the writer fails.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<()> {
        write_line(out, &self.header())?;
        for record in self.records() {
            write_line(out, &record)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn write_line<W: Write>(out: &mut W, fields: &[&str]) -> Result<()> {
    for field in fields {
        write!(out, "{},", escape_field(field))?;
    }
    writeln!(out)?;
    Ok(())
}

/// Quotes a field only when it would otherwise break the column layout.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
