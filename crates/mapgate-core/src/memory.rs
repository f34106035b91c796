//! In-process repository.
//!
//! [`MemoryRepository`] keeps every record in `tokio::sync::RwLock`-guarded
//! maps. Embedding hosts use it for fixtures and local development; the
//! authorization tests run against it.
//!
//! # Usage
//!
//! ```rust
//! use mapgate_core::{DataSource, MemoryRepository, Repository, ResourceId};
//!
//! # tokio_test::block_on(async {
//! let repo = MemoryRepository::new();
//! repo.insert_data_source(DataSource {
//!     id: "ds1".into(),
//!     organisation_id: "org1".into(),
//!     public: false,
//! })
//! .await;
//! repo.add_member("org1", "u1").await;
//!
//! let found = repo.find_data_source_by_id(&ResourceId::new("ds1")).await.unwrap();
//! assert!(found.is_some());
//! # });
//! ```

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repository::Repository;
use crate::types::{
    DataSource, Map, Membership, Organisation, OrganisationId, ResourceId, UserId,
};
use crate::{Error, Result};

/// Repository backed by in-memory maps.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    data_sources: RwLock<HashMap<ResourceId, DataSource>>,
    maps: RwLock<HashMap<ResourceId, Map>>,
    organisations: RwLock<HashMap<OrganisationId, Organisation>>,
    memberships: RwLock<HashSet<Membership>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a data source.
    pub async fn insert_data_source(&self, data_source: DataSource) {
        self.data_sources
            .write()
            .await
            .insert(data_source.id.clone(), data_source);
    }

    /// Insert or replace a map.
    pub async fn insert_map(&self, map: Map) {
        self.maps.write().await.insert(map.id.clone(), map);
    }

    /// Insert or replace an organisation.
    pub async fn insert_organisation(&self, organisation: Organisation) {
        self.organisations
            .write()
            .await
            .insert(organisation.id.clone(), organisation);
    }

    /// Make `user_id` a member of `organisation_id`.
    pub async fn add_member(
        &self,
        organisation_id: impl Into<OrganisationId>,
        user_id: impl Into<UserId>,
    ) {
        let membership = Membership {
            organisation_id: organisation_id.into(),
            user_id: user_id.into(),
        };
        log::debug!(
            "Adding member '{}' to organisation '{}'",
            membership.user_id,
            membership.organisation_id
        );
        self.memberships.write().await.insert(membership);
    }

    /// Remove a membership. Returns whether it existed.
    pub async fn remove_member(
        &self,
        organisation_id: impl Into<OrganisationId>,
        user_id: impl Into<UserId>,
    ) -> bool {
        let membership = Membership {
            organisation_id: organisation_id.into(),
            user_id: user_id.into(),
        };
        self.memberships.write().await.remove(&membership)
    }

    /// Look up an organisation by id.
    pub async fn organisation(&self, id: &OrganisationId) -> Option<Organisation> {
        self.organisations.read().await.get(id).cloned()
    }
}

/// Blank ids are malformed, the same way a non-UUID would be for a SQL store.
fn validate(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_id(id));
    }
    Ok(())
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_data_source_by_id(&self, id: &ResourceId) -> Result<Option<DataSource>> {
        validate(id.as_str())?;
        Ok(self.data_sources.read().await.get(id).cloned())
    }

    async fn find_map_by_id(&self, id: &ResourceId) -> Result<Option<Map>> {
        validate(id.as_str())?;
        Ok(self.maps.read().await.get(id).cloned())
    }

    async fn find_organisation_user(
        &self,
        organisation_id: &OrganisationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>> {
        validate(organisation_id.as_str())?;
        validate(user_id.as_str())?;
        let membership = Membership {
            organisation_id: organisation_id.clone(),
            user_id: user_id.clone(),
        };
        Ok(self.memberships.read().await.get(&membership).cloned())
    }
}
