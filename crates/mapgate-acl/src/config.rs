//! Policy files.
//!
//! Access policies can be declared per operation in TOML and loaded once at
//! startup:
//!
//! ```toml
//! [operations.dataSource.read]
//! data_source = "id"
//!
//! [operations.updateMapLayer.write]
//! map = "mapId"
//! data_source = "dataSourceId"
//! ```
//!
//! Entry order within a table is evaluation order.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::policy::AccessPolicy;
use crate::{Error, Result};

/// Access policies keyed by operation name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    #[serde(default)]
    operations: BTreeMap<String, AccessPolicy>,
}

impl PolicyFile {
    /// Create an empty policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse policies from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Load policies from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let policies = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        tracing::info!(
            path = %path.display(),
            operations = policies.len(),
            "loaded access policies"
        );
        Ok(policies)
    }

    /// Attach `policy` to `operation`, builder style.
    pub fn with(mut self, operation: impl Into<String>, policy: AccessPolicy) -> Self {
        self.operations.insert(operation.into(), policy);
        self
    }

    /// Policy declared for `operation`.
    pub fn policy(&self, operation: &str) -> Option<&AccessPolicy> {
        self.operations.get(operation)
    }

    /// Operation names with a declared policy.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Number of guarded operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no operation is guarded.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
