//! Operation registry.
//!
//! Fields are registered once at startup together with their resolvers.
//! Access policies come from a [`PolicyFile`] and are attached to the
//! matching fields when the registry is built; any policy that cannot be
//! attached aborts the build.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = OperationRegistry::builder(evaluator)
//!     .policies(PolicyFile::from_path("policies.toml")?)
//!     .field(FieldDef::nullable("dataSource").with_argument("id"), data_source_resolver)?
//!     .field(FieldDef::non_null("version"), version_resolver)?
//!     .build()?;
//!
//! let value = registry
//!     .resolve("dataSource", Arguments::new().with("id", "ds1"), requester)
//!     .await?;
//! ```

use std::collections::HashMap;

use mapgate_acl::{Arguments, Evaluator, PolicyFile};
use mapgate_core::Repository;
use serde_json::Value;
use tower::util::BoxCloneSyncService;
use tower::{Layer, Service, ServiceExt};

use crate::error::{Error, FieldError, Result};
use crate::interceptor::{AuthorizeLayer, FieldDef, FieldRequest};
use crate::requester::Requester;

/// Type-erased field resolver.
pub type FieldService = BoxCloneSyncService<FieldRequest, Value, FieldError>;

#[derive(Clone)]
struct Operation {
    guarded: bool,
    service: FieldService,
}

/// Builder for [`OperationRegistry`].
pub struct OperationRegistryBuilder<R: ?Sized> {
    evaluator: Evaluator<R>,
    policies: PolicyFile,
    fields: Vec<(FieldDef, FieldService)>,
}

impl<R: Repository + ?Sized + 'static> OperationRegistryBuilder<R> {
    /// Use `policies` for the fields registered on this builder.
    pub fn policies(mut self, policies: PolicyFile) -> Self {
        self.policies = policies;
        self
    }

    /// Register a field and its resolver.
    pub fn field<S>(mut self, def: FieldDef, resolver: S) -> Result<Self>
    where
        S: Service<FieldRequest, Response = Value, Error = FieldError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        if self.fields.iter().any(|(d, _)| d.name() == def.name()) {
            return Err(Error::DuplicateField {
                field: def.name().to_string(),
            });
        }
        self.fields.push((def, BoxCloneSyncService::new(resolver)));
        Ok(self)
    }

    /// Attach policies and freeze the registry.
    pub fn build(self) -> Result<OperationRegistry> {
        if let Some(field) = self
            .policies
            .operations()
            .find(|name| !self.fields.iter().any(|(d, _)| d.name() == *name))
        {
            return Err(Error::UnknownField {
                field: field.to_string(),
            });
        }

        let mut operations = HashMap::with_capacity(self.fields.len());
        for (def, resolver) in self.fields {
            let policy = self.policies.policy(def.name()).cloned();
            let layer = AuthorizeLayer::attach(&def, policy, self.evaluator.clone())?;
            let guarded = layer.is_guarded();
            let service = BoxCloneSyncService::new(layer.layer(resolver));
            operations.insert(def.name().to_string(), Operation { guarded, service });
        }

        let guarded = operations.values().filter(|op| op.guarded).count();
        log::info!(
            "Registered {} fields ({guarded} guarded)",
            operations.len()
        );

        Ok(OperationRegistry { operations })
    }
}

/// Fields and their (possibly guarded) resolvers, built once at startup.
#[derive(Clone)]
pub struct OperationRegistry {
    operations: HashMap<String, Operation>,
}

impl OperationRegistry {
    /// Start building a registry whose guards evaluate through `evaluator`.
    pub fn builder<R: Repository + ?Sized + 'static>(
        evaluator: Evaluator<R>,
    ) -> OperationRegistryBuilder<R> {
        OperationRegistryBuilder {
            evaluator,
            policies: PolicyFile::new(),
            fields: Vec::new(),
        }
    }

    /// Resolve field `name` for `requester`.
    pub async fn resolve(
        &self,
        name: &str,
        args: Arguments,
        requester: Requester,
    ) -> std::result::Result<Value, FieldError> {
        let operation = self
            .operations
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        operation
            .service
            .clone()
            .oneshot(FieldRequest::new(name, args, requester))
            .await
    }

    /// Registered field names, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether `name` is registered with an access policy.
    pub fn is_guarded(&self, name: &str) -> bool {
        self.operations.get(name).is_some_and(|op| op.guarded)
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no field is registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("fields", &self.field_names())
            .finish()
    }
}
