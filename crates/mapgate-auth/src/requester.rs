//! Requester identity and extraction helpers.

use mapgate_core::UserId;

/// An authenticated user identity, as established by the authentication layer.
///
/// Stored in HTTP request extensions by whatever middleware validated the
/// caller's credentials. This crate only reads it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The user's unique id (the token's `sub` claim).
    pub subject: UserId,
    /// The user's email address.
    pub email: String,
}

/// Who is asking: an authenticated user, or nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requester(Option<UserId>);

impl Requester {
    /// An unauthenticated requester.
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// An authenticated requester.
    pub fn user(id: impl Into<UserId>) -> Self {
        Self(Some(id.into()))
    }

    /// The requester's user id, if authenticated.
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }

    /// Whether a user is present.
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl From<Option<UserId>> for Requester {
    fn from(id: Option<UserId>) -> Self {
        Self(id)
    }
}

impl From<&AuthenticatedUser> for Requester {
    fn from(user: &AuthenticatedUser) -> Self {
        Self(Some(user.subject.clone()))
    }
}

/// Extract the `AuthenticatedUser` from HTTP request `Parts`, if present.
pub fn user_from_parts(parts: &http::request::Parts) -> Option<&AuthenticatedUser> {
    parts.extensions.get::<AuthenticatedUser>()
}

/// Build the [`Requester`] for a request.
///
/// Returns an anonymous requester if no authenticated user is present.
pub fn requester_from_parts(parts: &http::request::Parts) -> Requester {
    user_from_parts(parts)
        .map(Requester::from)
        .unwrap_or_default()
}
