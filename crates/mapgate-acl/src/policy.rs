//! Declarative access policies.
//!
//! An [`AccessPolicy`] is attached to exactly one operation when the
//! operation is registered and is never mutated afterwards. It names, per
//! access type, which operation argument carries which resource's id:
//!
//! ```text
//! AccessPolicy
//! ├── write: ArgumentMap   (checked first)
//! │     └── [(Map, "mapId"), (DataSource, "dataSourceId")]
//! └── read:  ArgumentMap   (checked only if write passed)
//!       └── [(Organisation, "organisationId")]
//! ```
//!
//! Entry order inside an [`ArgumentMap`] is evaluation order.

use std::fmt;

use mapgate_core::ResourceKind;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

// ============================================================================
// ArgumentMap
// ============================================================================

/// Ordered association from resource kind to the argument carrying its id.
///
/// Each kind appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMap {
    entries: Vec<(ResourceKind, String)>,
}

impl ArgumentMap {
    /// Create an empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    ///
    /// A repeated kind replaces the earlier argument name in place.
    pub fn with(mut self, kind: ResourceKind, argument: impl Into<String>) -> Self {
        let argument = argument.into();
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = argument,
            None => self.entries.push((kind, argument)),
        }
        self
    }

    /// Append an entry, rejecting a kind that is already present.
    pub fn insert(&mut self, kind: ResourceKind, argument: impl Into<String>) -> Result<()> {
        if self.contains(kind) {
            return Err(Error::DuplicateKind { kind });
        }
        self.entries.push((kind, argument.into()));
        Ok(())
    }

    /// Whether `kind` has an entry.
    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.entries.iter().any(|(k, _)| *k == kind)
    }

    /// Argument name registered for `kind`.
    pub fn get(&self, kind: ResourceKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, arg)| arg.as_str())
    }

    /// Entries in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &str)> {
        self.entries.iter().map(|(k, arg)| (*k, arg.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ArgumentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, argument) in &self.entries {
            map.serialize_entry(kind.as_str(), argument)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ArgumentMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ArgumentMapVisitor;

        impl<'de> Visitor<'de> for ArgumentMapVisitor {
            type Value = ArgumentMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of resource kind to argument name")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<ArgumentMap, A::Error> {
                let mut map = ArgumentMap::new();
                while let Some((key, argument)) = access.next_entry::<String, String>()? {
                    let kind = key.parse::<ResourceKind>().map_err(serde::de::Error::custom)?;
                    map.insert(kind, argument)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ArgumentMapVisitor)
    }
}

// ============================================================================
// AccessPolicy
// ============================================================================

/// Read and write requirements of one guarded operation.
///
/// Both halves are optional; a policy with neither always allows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read: Option<ArgumentMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    write: Option<ArgumentMap>,
}

impl AccessPolicy {
    /// Create a policy from optional read and write maps.
    pub fn new(read: Option<ArgumentMap>, write: Option<ArgumentMap>) -> Self {
        Self { read, write }
    }

    /// Set the read requirements.
    pub fn with_read(mut self, read: ArgumentMap) -> Self {
        self.read = Some(read);
        self
    }

    /// Set the write requirements.
    pub fn with_write(mut self, write: ArgumentMap) -> Self {
        self.write = Some(write);
        self
    }

    /// Read requirements, if any.
    pub fn read(&self) -> Option<&ArgumentMap> {
        self.read.as_ref()
    }

    /// Write requirements, if any.
    pub fn write(&self) -> Option<&ArgumentMap> {
        self.write.as_ref()
    }

    /// Every argument name the policy reads, write entries first.
    pub fn argument_names(&self) -> impl Iterator<Item = &str> {
        self.write
            .iter()
            .chain(self.read.iter())
            .flat_map(|map| map.iter().map(|(_, arg)| arg))
    }
}
