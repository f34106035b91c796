//! Identifiers, resource records, and the access vocabulary.
//!
//! Resource records are owned by the persistence layer; this crate only
//! reads them. Identifiers are opaque strings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a string.
            pub fn new<S: Into<String>>(id: S) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id! {
    /// Identifier of a guarded resource (data source, map or organisation),
    /// as carried by an operation argument.
    ResourceId
}

string_id! {
    /// Identifier of an authenticated user.
    UserId
}

string_id! {
    /// Identifier of an organisation.
    OrganisationId
}

impl From<ResourceId> for OrganisationId {
    fn from(id: ResourceId) -> Self {
        Self(id.0)
    }
}

// ============================================================================
// Resource records
// ============================================================================

/// A data source. The only resource kind that may be shared publicly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    /// Data source id.
    pub id: ResourceId,
    /// Owning organisation.
    pub organisation_id: OrganisationId,
    /// Whether anyone may read this data source.
    #[serde(default)]
    pub public: bool,
}

/// A map, always private to its organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    /// Map id.
    pub id: ResourceId,
    /// Owning organisation.
    pub organisation_id: OrganisationId,
}

/// An organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    /// Organisation id.
    pub id: OrganisationId,
}

/// Evidence that a user belongs to an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// The organisation.
    pub organisation_id: OrganisationId,
    /// The member.
    pub user_id: UserId,
}

// ============================================================================
// AccessType
// ============================================================================

/// The kind of access requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Read access.
    Read,
    /// Write access.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

// ============================================================================
// ResourceKind
// ============================================================================

/// The closed set of resource kinds an access policy can guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A [`DataSource`].
    DataSource,
    /// A [`Map`].
    Map,
    /// An [`Organisation`].
    Organisation,
}

impl ResourceKind {
    /// Every resource kind.
    pub const ALL: [ResourceKind; 3] = [Self::DataSource, Self::Map, Self::Organisation];

    /// The snake_case name used in policy files and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataSource => "data_source",
            Self::Map => "map",
            Self::Organisation => "organisation",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = Error;

    /// Accepts the snake_case names as well as the schema spellings
    /// (`DataSource`, `Map`, `Organisation`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "data_source" | "DataSource" => Ok(Self::DataSource),
            "map" | "Map" => Ok(Self::Map),
            "organisation" | "Organisation" => Ok(Self::Organisation),
            other => Err(Error::config(format!("unknown resource kind '{other}'"))),
        }
    }
}
