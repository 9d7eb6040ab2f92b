//! Class of service catalog.

use std::collections::HashMap;
use tracing::debug;

/// Name of the COS every account falls back to when nothing else applies.
pub const DEFAULT_COS_NAME: &str = "default";

/// Lookup tables built from the `zimbraCOS` entries of the directory.
///
/// Each entry contributes one id and one name. A repeated id or name replaces
/// the earlier mapping (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassOfServiceCatalog {
    id_to_name: HashMap<String, String>,
    name_to_id: HashMap<String, String>,
}

impl ClassOfServiceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a COS entry.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();

        if let Some(previous) = self.id_to_name.insert(id.clone(), name.clone()) {
            debug!(%id, %previous, %name, "COS id seen twice, keeping last name");
        }
        if let Some(previous) = self.name_to_id.insert(name.clone(), id.clone()) {
            debug!(%name, %previous, %id, "COS name seen twice, keeping last id");
        }
    }

    /// Returns the COS name for an id.
    #[must_use]
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    /// Returns the COS id for a name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    /// Id of the COS named [`DEFAULT_COS_NAME`], if the directory has one.
    #[must_use]
    pub fn default_id(&self) -> Option<&str> {
        self.id_of(DEFAULT_COS_NAME)
    }

    /// Number of distinct COS ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// Returns true if no COS has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}

impl<I, N> FromIterator<(I, N)> for ClassOfServiceCatalog
where
    I: Into<String>,
    N: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, N)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (id, name) in iter {
            catalog.insert(id, name);
        }
        catalog
    }
}
