//! Common test utilities and harness for mapgate-auth integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mapgate_auth::{
    Evaluator, FieldDef, FieldError, FieldRequest, FieldService, OperationRegistry, PolicyFile,
};
use mapgate_core::{
    DataSource, Map, Membership, MemoryRepository, OrganisationId, Repository, ResourceId,
    Result, UserId,
};
use serde_json::json;
use tower::util::BoxCloneSyncService;

/// Policies for the fields registered by [`TestHarness::registry`].
pub const POLICIES: &str = r#"
[operations.dataSource]
read = { data_source = "id" }

[operations.updateDataSource]
read = { data_source = "id" }
write = { data_source = "id" }

[operations.map.read]
map = "mapId"

[operations.organisation.read]
organisation = "orgId"
"#;

/// Repository that counts lookups and can be switched into failure mode.
pub struct InstrumentedRepository {
    inner: MemoryRepository,
    pub data_source_lookups: AtomicUsize,
    pub map_lookups: AtomicUsize,
    pub membership_lookups: AtomicUsize,
    failing: bool,
}

impl InstrumentedRepository {
    pub fn data_source_lookups(&self) -> usize {
        self.data_source_lookups.load(Ordering::SeqCst)
    }

    pub fn membership_lookups(&self) -> usize {
        self.membership_lookups.load(Ordering::SeqCst)
    }

    fn fault(&self) -> Result<()> {
        if self.failing {
            return Err(mapgate_core::Error::repository("database unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for InstrumentedRepository {
    async fn find_data_source_by_id(&self, id: &ResourceId) -> Result<Option<DataSource>> {
        self.data_source_lookups.fetch_add(1, Ordering::SeqCst);
        self.fault()?;
        self.inner.find_data_source_by_id(id).await
    }

    async fn find_map_by_id(&self, id: &ResourceId) -> Result<Option<Map>> {
        self.map_lookups.fetch_add(1, Ordering::SeqCst);
        self.fault()?;
        self.inner.find_map_by_id(id).await
    }

    async fn find_organisation_user(
        &self,
        organisation_id: &OrganisationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>> {
        self.membership_lookups.fetch_add(1, Ordering::SeqCst);
        self.fault()?;
        self.inner.find_organisation_user(organisation_id, user_id).await
    }
}

/// Test harness for integration tests.
///
/// Seeds: `ds1` (org1, private), `ds2` (org1, public), `m1` (org1);
/// `u1` is a member of org1, `u2` is not.
pub struct TestHarness {
    pub repository: Arc<InstrumentedRepository>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    /// A harness whose repository fails every lookup.
    pub async fn failing() -> Self {
        Self::build(true).await
    }

    async fn build(failing: bool) -> Self {
        let inner = MemoryRepository::new();
        inner
            .insert_data_source(DataSource {
                id: "ds1".into(),
                organisation_id: "org1".into(),
                public: false,
            })
            .await;
        inner
            .insert_data_source(DataSource {
                id: "ds2".into(),
                organisation_id: "org1".into(),
                public: true,
            })
            .await;
        inner
            .insert_map(Map {
                id: "m1".into(),
                organisation_id: "org1".into(),
            })
            .await;
        inner.add_member("org1", "u1").await;

        Self {
            repository: Arc::new(InstrumentedRepository {
                inner,
                data_source_lookups: AtomicUsize::new(0),
                map_lookups: AtomicUsize::new(0),
                membership_lookups: AtomicUsize::new(0),
                failing,
            }),
        }
    }

    pub fn evaluator(&self) -> Evaluator<InstrumentedRepository> {
        Evaluator::new(self.repository.clone())
    }

    /// Registry with the four guarded fields from [`POLICIES`] plus an unguarded `version`.
    pub fn registry(&self) -> OperationRegistry {
        OperationRegistry::builder(self.evaluator())
            .policies(PolicyFile::from_toml_str(POLICIES).unwrap())
            .field(FieldDef::nullable("dataSource").with_argument("id"), echo())
            .unwrap()
            .field(FieldDef::nullable("updateDataSource").with_argument("id"), echo())
            .unwrap()
            .field(FieldDef::nullable("map").with_argument("mapId"), echo())
            .unwrap()
            .field(FieldDef::nullable("organisation").with_argument("orgId"), echo())
            .unwrap()
            .field(FieldDef::non_null("version"), echo())
            .unwrap()
            .build()
            .unwrap()
    }
}

/// Resolver that echoes the field name and its arguments.
pub fn echo() -> FieldService {
    BoxCloneSyncService::new(tower::service_fn(|req: FieldRequest| async move {
        Ok::<_, FieldError>(json!({ "field": req.field, "argCount": req.args.len() }))
    }))
}

/// Collects tracing events emitted on the current thread.
#[derive(Clone, Default)]
pub struct CapturedEvents {
    events: Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

impl CapturedEvents {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        use tracing_subscriber::layer::SubscriberExt;
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    /// Events whose `event` field equals `name`.
    pub fn named(&self, name: &str) -> Vec<Vec<(String, String)>> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|fields| fields.iter().any(|(k, v)| k == "event" && v == name))
            .cloned()
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CapturedEvents {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(visitor.0);
    }
}
