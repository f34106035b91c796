//! Tower field-authorization middleware.
//!
//! `AuthorizeLayer` and `AuthorizeService` wrap a field resolver with its
//! access policy. Policies are attached once, when the field is registered;
//! attaching one to a field that cannot return null is rejected on the spot.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use mapgate_acl::{AccessPolicy, Arguments, Evaluator};
use mapgate_core::Repository;
use tower::{Layer, Service};

use crate::error::{Error, Result, Unauthorized};
use crate::requester::Requester;

/// Declared shape of a field: its name, argument names, and result nullability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    arguments: Vec<String>,
    nullable: bool,
}

impl FieldDef {
    /// A field whose result may be null.
    pub fn nullable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            nullable: true,
        }
    }

    /// A field whose result is never null.
    pub fn non_null(name: impl Into<String>) -> Self {
        Self {
            nullable: false,
            ..Self::nullable(name)
        }
    }

    /// Declare an argument.
    pub fn with_argument(mut self, name: impl Into<String>) -> Self {
        self.arguments.push(name.into());
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared argument names.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Whether the result may be null.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn has_argument(&self, name: &str) -> bool {
        self.arguments.iter().any(|a| a == name)
    }
}

/// One call of a field resolver.
#[derive(Debug, Clone)]
pub struct FieldRequest {
    /// Field being resolved.
    pub field: String,
    /// Resolved argument values.
    pub args: Arguments,
    /// Who is asking.
    pub requester: Requester,
}

impl FieldRequest {
    /// Create a request.
    pub fn new(field: impl Into<String>, args: Arguments, requester: Requester) -> Self {
        Self {
            field: field.into(),
            args,
            requester,
        }
    }
}

/// Tower `Layer` that guards a field resolver with its access policy.
pub struct AuthorizeLayer<R: ?Sized> {
    field: Arc<str>,
    policy: Option<Arc<AccessPolicy>>,
    evaluator: Evaluator<R>,
}

impl<R: ?Sized> Clone for AuthorizeLayer<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            policy: self.policy.clone(),
            evaluator: self.evaluator.clone(),
        }
    }
}

impl<R: Repository + ?Sized> AuthorizeLayer<R> {
    /// Attach `policy` (if any) to `field`.
    ///
    /// Fails if the field's result is non-nullable, or if the policy reads an
    /// argument the field does not declare.
    pub fn attach(
        field: &FieldDef,
        policy: Option<AccessPolicy>,
        evaluator: Evaluator<R>,
    ) -> Result<Self> {
        if let Some(policy) = &policy {
            if !field.is_nullable() {
                return Err(Error::NonNullableField {
                    field: field.name().to_string(),
                });
            }
            if let Some(argument) = policy.argument_names().find(|a| !field.has_argument(a)) {
                return Err(Error::UnknownArgument {
                    field: field.name().to_string(),
                    argument: argument.to_string(),
                });
            }
        }

        Ok(Self {
            field: Arc::from(field.name()),
            policy: policy.map(Arc::new),
            evaluator,
        })
    }

    /// Whether a policy is attached.
    pub fn is_guarded(&self) -> bool {
        self.policy.is_some()
    }
}

impl<R: ?Sized, S> Layer<S> for AuthorizeLayer<R> {
    type Service = AuthorizeService<R, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthorizeService {
            inner,
            field: self.field.clone(),
            policy: self.policy.clone(),
            evaluator: self.evaluator.clone(),
        }
    }
}

/// Tower `Service` that evaluates a field's access policy before resolving it.
///
/// On allow, the inner resolver's result or error is returned unchanged.
/// On deny, the inner resolver is not called and `S::Error::from(Unauthorized)`
/// is returned.
pub struct AuthorizeService<R: ?Sized, S> {
    inner: S,
    field: Arc<str>,
    policy: Option<Arc<AccessPolicy>>,
    evaluator: Evaluator<R>,
}

impl<R: ?Sized, S: Clone> Clone for AuthorizeService<R, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            field: self.field.clone(),
            policy: self.policy.clone(),
            evaluator: self.evaluator.clone(),
        }
    }
}

impl<R, S> Service<FieldRequest> for AuthorizeService<R, S>
where
    R: Repository + ?Sized + 'static,
    S: Service<FieldRequest> + Clone + Send + 'static,
    S::Error: From<Unauthorized>,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = std::result::Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: FieldRequest) -> Self::Future {
        // Unguarded fields go straight through
        let Some(policy) = self.policy.clone() else {
            return Box::pin(self.inner.call(req));
        };

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let evaluator = self.evaluator.clone();
        let field = self.field.clone();

        Box::pin(async move {
            let allowed = evaluator
                .evaluate(&policy, &req.args, req.requester.user_id())
                .await;
            if allowed {
                inner.call(req).await
            } else {
                log::debug!("Denied access to field '{field}'");
                Err(Unauthorized.into())
            }
        })
    }
}
