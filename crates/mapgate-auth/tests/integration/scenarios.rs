//! End-to-end authorization scenarios.

use mapgate_auth::{Arguments, FieldError, Requester};
use mapgate_core::{AccessType, ResourceId, UserId};
use mapgate_acl::guard::data_source_guard;

use crate::common::{CapturedEvents, TestHarness};

fn ds(id: &str) -> Arguments {
    Arguments::new().with("id", id)
}

#[tokio::test]
async fn test_private_data_source_read_requires_membership() {
    let harness = TestHarness::new().await;
    let repo = harness.repository.as_ref();
    let id = ResourceId::new("ds1");

    let read = AccessType::Read;
    assert!(data_source_guard(repo, Some(&id), Some(&UserId::new("u1")), read).await.unwrap());
    assert!(!data_source_guard(repo, Some(&id), Some(&UserId::new("u2")), read).await.unwrap());
    assert!(!data_source_guard(repo, Some(&id), None, read).await.unwrap());

    let registry = harness.registry();
    assert!(registry.resolve("dataSource", ds("ds1"), Requester::user("u1")).await.is_ok());
    assert_eq!(
        registry.resolve("dataSource", ds("ds1"), Requester::user("u2")).await,
        Err(FieldError::Unauthorized)
    );
    assert_eq!(
        registry.resolve("dataSource", ds("ds1"), Requester::anonymous()).await,
        Err(FieldError::Unauthorized)
    );
}

#[tokio::test]
async fn test_public_data_source_read_but_not_write() {
    let harness = TestHarness::new().await;
    let repo = harness.repository.as_ref();
    let id = ResourceId::new("ds2");

    assert!(data_source_guard(repo, Some(&id), None, AccessType::Read).await.unwrap());
    assert!(
        !data_source_guard(repo, Some(&id), Some(&UserId::new("u2")), AccessType::Write)
            .await
            .unwrap()
    );

    let registry = harness.registry();
    assert!(registry.resolve("dataSource", ds("ds2"), Requester::anonymous()).await.is_ok());
    assert_eq!(
        registry.resolve("updateDataSource", ds("ds2"), Requester::user("u2")).await,
        Err(FieldError::Unauthorized)
    );
    assert!(registry.resolve("updateDataSource", ds("ds2"), Requester::user("u1")).await.is_ok());
}

#[tokio::test]
async fn test_failed_write_check_skips_read_check() {
    let harness = TestHarness::new().await;
    let registry = harness.registry();

    let result = registry
        .resolve("updateDataSource", ds("ds1"), Requester::user("u2"))
        .await;
    assert_eq!(result, Err(FieldError::Unauthorized));

    // Only the write check ran: one data source lookup, one membership lookup
    assert_eq!(harness.repository.data_source_lookups(), 1);
    assert_eq!(harness.repository.membership_lookups(), 1);
}

#[tokio::test]
async fn test_missing_map_argument_denies() {
    let harness = TestHarness::new().await;
    let registry = harness.registry();

    let result = registry
        .resolve("map", Arguments::new(), Requester::user("u1"))
        .await;
    assert_eq!(result, Err(FieldError::Unauthorized));

    let value = registry
        .resolve("map", Arguments::new().with("mapId", "m1"), Requester::user("u1"))
        .await
        .unwrap();
    assert_eq!(value["field"], "map");
}

#[tokio::test]
async fn test_repository_fault_denies_and_logs_once() {
    let events = CapturedEvents::default();
    let _guard = events.install();

    let harness = TestHarness::failing().await;
    let registry = harness.registry();

    let result = registry
        .resolve(
            "organisation",
            Arguments::new().with("orgId", "org1"),
            Requester::user("u1"),
        )
        .await;
    assert_eq!(result, Err(FieldError::Unauthorized));

    let faults = events.named("auth_error");
    assert_eq!(faults.len(), 1);
    assert!(
        faults[0]
            .iter()
            .any(|(k, v)| k == "error" && v.contains("database unavailable"))
    );
}

#[tokio::test]
async fn test_unguarded_field_ignores_requester() {
    let harness = TestHarness::new().await;
    let registry = harness.registry();

    let value = registry
        .resolve("version", Arguments::new(), Requester::anonymous())
        .await
        .unwrap();
    assert_eq!(value["field"], "version");
    assert_eq!(harness.repository.data_source_lookups(), 0);
    assert_eq!(harness.repository.membership_lookups(), 0);
}

#[tokio::test]
async fn test_organisation_read_for_member_only() {
    let harness = TestHarness::new().await;
    let registry = harness.registry();
    let args = Arguments::new().with("orgId", "org1");

    assert!(registry.resolve("organisation", args.clone(), Requester::user("u1")).await.is_ok());
    assert_eq!(
        registry.resolve("organisation", args, Requester::user("u2")).await,
        Err(FieldError::Unauthorized)
    );
}

#[tokio::test]
async fn test_concurrent_requests_share_registry() {
    let harness = TestHarness::new().await;
    let registry = std::sync::Arc::new(harness.registry());

    let mut handles = Vec::new();
    for (user, expect_ok) in [("u1", true), ("u2", false), ("u1", true), ("u3", false)] {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let result = registry
                .resolve("dataSource", ds("ds1"), Requester::user(user))
                .await;
            (result.is_ok(), expect_ok)
        }));
    }

    for handle in handles {
        let (ok, expected) = handle.await.unwrap();
        assert_eq!(ok, expected);
    }
}
