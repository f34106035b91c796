//! Resource ownership guards.
//!
//! One guard per [`ResourceKind`](mapgate_core::ResourceKind). Every guard
//! answers "may `requester` access resource `id` with `access`?" by reading
//! through a [`Repository`]:
//!
//! | Guard | Read | Write |
//! |-------|------|-------|
//! | [`data_source_guard`] | public, or member of owning org | member of owning org |
//! | [`map_guard`] | member of owning org | member of owning org |
//! | [`organisation_guard`] | member | member |
//!
//! Missing inputs and missing resources yield `Ok(false)`. Lookup failures
//! yield `Err`; the evaluator is the one place that turns those into a deny.

use mapgate_core::{AccessType, OrganisationId, Repository, ResourceId, UserId};

use crate::Result;

/// Data sources are the only kind with a public-read carve-out.
pub async fn data_source_guard<R: Repository + ?Sized>(
    repository: &R,
    id: Option<&ResourceId>,
    requester: Option<&UserId>,
    access: AccessType,
) -> Result<bool> {
    let Some(id) = id else {
        return Ok(false);
    };
    let Some(data_source) = repository.find_data_source_by_id(id).await? else {
        return Ok(false);
    };
    if access == AccessType::Read && data_source.public {
        return Ok(true);
    }
    let Some(user_id) = requester else {
        return Ok(false);
    };
    let membership = repository
        .find_organisation_user(&data_source.organisation_id, user_id)
        .await?;
    Ok(membership.is_some())
}

/// Maps are private to their organisation; `access` does not matter.
pub async fn map_guard<R: Repository + ?Sized>(
    repository: &R,
    id: Option<&ResourceId>,
    requester: Option<&UserId>,
    _access: AccessType,
) -> Result<bool> {
    let (Some(id), Some(user_id)) = (id, requester) else {
        return Ok(false);
    };
    let Some(map) = repository.find_map_by_id(id).await? else {
        return Ok(false);
    };
    let membership = repository
        .find_organisation_user(&map.organisation_id, user_id)
        .await?;
    Ok(membership.is_some())
}

/// Membership of the organisation itself; `access` does not matter.
pub async fn organisation_guard<R: Repository + ?Sized>(
    repository: &R,
    id: Option<&ResourceId>,
    requester: Option<&UserId>,
    _access: AccessType,
) -> Result<bool> {
    let (Some(id), Some(user_id)) = (id, requester) else {
        return Ok(false);
    };
    let organisation_id = OrganisationId::new(id.as_str());
    let membership = repository
        .find_organisation_user(&organisation_id, user_id)
        .await?;
    Ok(membership.is_some())
}
