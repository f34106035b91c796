//! Startup-time validation of policy attachment.

use std::io::Write;

use mapgate_auth::{Error, FieldDef, OperationRegistry, PolicyFile};

use crate::common::{echo, TestHarness, POLICIES};

#[tokio::test]
async fn test_registry_from_policy_file_on_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(POLICIES.as_bytes()).unwrap();

    let harness = TestHarness::new().await;
    let policies = PolicyFile::from_path(file.path()).unwrap();
    assert_eq!(policies.len(), 4);

    let registry = OperationRegistry::builder(harness.evaluator())
        .policies(policies)
        .field(FieldDef::nullable("dataSource").with_argument("id"), echo())
        .unwrap()
        .field(FieldDef::nullable("updateDataSource").with_argument("id"), echo())
        .unwrap()
        .field(FieldDef::nullable("map").with_argument("mapId"), echo())
        .unwrap()
        .field(FieldDef::nullable("organisation").with_argument("orgId"), echo())
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(registry.len(), 4);
    assert!(registry.field_names().iter().all(|name| registry.is_guarded(name)));
}

#[tokio::test]
async fn test_policy_on_non_nullable_field_aborts_startup() {
    let harness = TestHarness::new().await;
    let result = OperationRegistry::builder(harness.evaluator())
        .policies(PolicyFile::from_toml_str("[operations.map.read]\nmap = \"mapId\"\n").unwrap())
        .field(FieldDef::non_null("map").with_argument("mapId"), echo())
        .unwrap()
        .build();

    let err = result.unwrap_err();
    assert!(matches!(err, Error::NonNullableField { ref field } if field == "map"));
    // No request was ever evaluated
    assert_eq!(harness.repository.membership_lookups(), 0);
}

#[tokio::test]
async fn test_policy_naming_undeclared_argument_aborts_startup() {
    let harness = TestHarness::new().await;
    let result = OperationRegistry::builder(harness.evaluator())
        .policies(PolicyFile::from_toml_str("[operations.map.read]\nmap = \"id\"\n").unwrap())
        .field(FieldDef::nullable("map").with_argument("mapId"), echo())
        .unwrap()
        .build();
    assert!(matches!(result, Err(Error::UnknownArgument { .. })));
}

#[tokio::test]
async fn test_policy_for_unregistered_field_aborts_startup() {
    let harness = TestHarness::new().await;
    let result = OperationRegistry::builder(harness.evaluator())
        .policies(PolicyFile::from_toml_str(POLICIES).unwrap())
        .field(FieldDef::nullable("dataSource").with_argument("id"), echo())
        .unwrap()
        .build();
    assert!(matches!(result, Err(Error::UnknownField { .. })));
}

#[test]
fn test_malformed_policy_file_is_a_configuration_error() {
    let err = PolicyFile::from_toml_str("[operations.map.read]\nmap = 42\n").unwrap_err();
    let err: Error = err.into();
    assert!(matches!(err, Error::Acl(_)));
}
