//! Field-level authorization for Mapgate.
//!
//! Provides:
//! - [`Requester`] — who is asking, read from request extensions
//! - [`AuthorizeLayer`] / [`AuthorizeService`] — Tower middleware that guards a field resolver
//! - [`OperationRegistry`] — fields, resolvers and policies assembled once at startup
//! - [`Error`] — configuration errors that must stop startup
//! - [`Unauthorized`] / [`FieldError`] — what a denied caller sees
//!
//! Authentication happens elsewhere; this crate only consumes its result.

mod error;
mod interceptor;
mod registry;
mod requester;

pub use error::{Error, FieldError, Result, Unauthorized};
pub use interceptor::{AuthorizeLayer, AuthorizeService, FieldDef, FieldRequest};
pub use registry::{FieldService, OperationRegistry, OperationRegistryBuilder};
pub use requester::{requester_from_parts, user_from_parts, AuthenticatedUser, Requester};

// Re-exported so hosts can build policies without a direct mapgate-acl dependency
pub use mapgate_acl::{AccessPolicy, ArgumentMap, Arguments, Evaluator, PolicyFile};
