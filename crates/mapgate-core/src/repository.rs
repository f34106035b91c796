//! Repository lookup trait.
//!
//! Guards never touch storage directly; they read through a [`Repository`].
//! Persistence layers implement this trait (SQL, HTTP, in-memory, ...).
//!
//! `Ok(None)` means "not found". `Err` means the lookup itself failed;
//! callers treat the two very differently (see `mapgate-acl`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::types::{DataSource, Map, Membership, OrganisationId, ResourceId, UserId};

/// Read-only lookups against the resource store.
///
/// # Example
///
/// ```rust,ignore
/// struct PgRepository { pool: PgPool }
///
/// #[async_trait]
/// impl Repository for PgRepository {
///     async fn find_data_source_by_id(&self, id: &ResourceId) -> Result<Option<DataSource>> {
///         /* SELECT ... FROM data_source WHERE id = $1 */
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait Repository: Send + Sync {
    /// Find a data source by id.
    async fn find_data_source_by_id(&self, id: &ResourceId) -> Result<Option<DataSource>>;

    /// Find a map by id.
    async fn find_map_by_id(&self, id: &ResourceId) -> Result<Option<Map>>;

    /// Find the membership of `user_id` in `organisation_id`, if any.
    async fn find_organisation_user(
        &self,
        organisation_id: &OrganisationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>>;
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    async fn find_data_source_by_id(&self, id: &ResourceId) -> Result<Option<DataSource>> {
        (**self).find_data_source_by_id(id).await
    }

    async fn find_map_by_id(&self, id: &ResourceId) -> Result<Option<Map>> {
        (**self).find_map_by_id(id).await
    }

    async fn find_organisation_user(
        &self,
        organisation_id: &OrganisationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>> {
        (**self).find_organisation_user(organisation_id, user_id).await
    }
}
