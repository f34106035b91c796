//! Routing argument checks to guards.
//!
//! The dispatch table is an exhaustive `match` over
//! [`ResourceKind`](mapgate_core::ResourceKind): adding a kind without a guard
//! does not compile.

use mapgate_core::{AccessType, Repository, ResourceId, ResourceKind, UserId};

use crate::Result;
use crate::arguments::Arguments;
use crate::guard::{data_source_guard, map_guard, organisation_guard};
use crate::policy::ArgumentMap;

/// Run the guard registered for `kind`.
pub async fn check_guard<R: Repository + ?Sized>(
    kind: ResourceKind,
    repository: &R,
    id: Option<&ResourceId>,
    requester: Option<&UserId>,
    access: AccessType,
) -> Result<bool> {
    match kind {
        ResourceKind::DataSource => data_source_guard(repository, id, requester, access).await,
        ResourceKind::Map => map_guard(repository, id, requester, access).await,
        ResourceKind::Organisation => organisation_guard(repository, id, requester, access).await,
    }
}

/// Check every entry of `map` in declared order, stopping at the first denial.
///
/// Entries after a denial are never looked at, so their guards never touch
/// the repository. An empty map passes.
pub async fn check_argument_map<R: Repository + ?Sized>(
    repository: &R,
    map: &ArgumentMap,
    args: &Arguments,
    requester: Option<&UserId>,
    access: AccessType,
) -> Result<bool> {
    for (kind, argument) in map.iter() {
        let id = args.id(argument)?;
        if !check_guard(kind, repository, id.as_ref(), requester, access).await? {
            tracing::debug!(kind = %kind, argument, access = %access, "argument check denied");
            return Ok(false);
        }
    }
    Ok(true)
}
