//! Auth-specific error types.

/// Configuration errors detected while attaching policies to fields.
///
/// All of these are fatal: a registry that produces one must not serve
/// requests.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A policy is attached to a field whose result cannot be null.
    #[error("field '{field}' has an access policy but a non-nullable result")]
    NonNullableField { field: String },

    /// A policy names an argument the field does not declare.
    #[error("access policy for field '{field}' refers to unknown argument '{argument}'")]
    UnknownArgument { field: String, argument: String },

    /// A policy is declared for a field that was never registered.
    #[error("access policy declared for unknown field '{field}'")]
    UnknownField { field: String },

    /// The same field was registered twice.
    #[error("field '{field}' is already registered")]
    DuplicateField { field: String },

    /// Policy loading failed.
    #[error("ACL error: {0}")]
    Acl(#[from] mapgate_acl::Error),
}

/// Result type alias for mapgate-auth operations
pub type Result<T> = std::result::Result<T, Error>;

/// The single denial signal raised in place of a guarded field's result.
///
/// Deliberately carries no detail: callers cannot tell a missing resource
/// from a forbidden one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unauthorized")]
pub struct Unauthorized;

/// Errors surfaced when resolving a field through the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FieldError {
    /// Access was denied.
    #[error("Unauthorized")]
    Unauthorized,

    /// No field with this name is registered.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The field's own resolver failed.
    #[error("{0}")]
    Resolver(String),
}

impl FieldError {
    /// Creates a resolver error.
    pub fn resolver(message: impl Into<String>) -> Self {
        FieldError::Resolver(message.into())
    }

    /// Whether this is an authorization denial.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FieldError::Unauthorized)
    }
}

impl From<Unauthorized> for FieldError {
    fn from(_: Unauthorized) -> Self {
        FieldError::Unauthorized
    }
}
