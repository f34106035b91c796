//! Access policy evaluation.
//!
//! [`Evaluator::evaluate`] is the single point where faults become denials:
//!
//! ```text
//! evaluate(policy, args, requester)
//!   ├── write map present? → check_argument_map(Write) ── false ──→ deny
//!   ├── read map present?  → check_argument_map(Read)  ── false ──→ deny
//!   └── allow
//!
//! any Err or panic below → log `auth_error` → deny
//! ```
//!
//! Checks run sequentially within one evaluation. Separate evaluations share
//! nothing but the read-only repository and may run concurrently. Dropping
//! the returned future cancels any in-flight lookup.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use mapgate_core::{AccessType, Repository, UserId};

use crate::arguments::Arguments;
use crate::dispatch::check_argument_map;
use crate::policy::AccessPolicy;
use crate::{Error, Result};

/// Evaluates access policies against a shared repository.
pub struct Evaluator<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for Evaluator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ?Sized> std::fmt::Debug for Evaluator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator").finish_non_exhaustive()
    }
}

impl<R: Repository + ?Sized> Evaluator<R> {
    /// Create an evaluator reading through `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// The repository guards read through.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Decide whether `requester` may run an operation guarded by `policy`.
    ///
    /// Never fails: a fault anywhere below (argument lookup, guard,
    /// repository, even a panic) is logged as `auth_error` and denied.
    pub async fn evaluate(
        &self,
        policy: &AccessPolicy,
        args: &Arguments,
        requester: Option<&UserId>,
    ) -> bool {
        let outcome = AssertUnwindSafe(self.try_evaluate(policy, args, requester))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(Error::Panicked {
                    message: panic_message(payload.as_ref()),
                })
            });

        match outcome {
            Ok(allowed) => allowed,
            Err(error) => {
                tracing::error!(event = "auth_error", error = %error, "authorization check failed");
                false
            }
        }
    }

    /// Like [`evaluate`](Self::evaluate), but returns faults instead of
    /// denying. Nothing is logged.
    pub async fn try_evaluate(
        &self,
        policy: &AccessPolicy,
        args: &Arguments,
        requester: Option<&UserId>,
    ) -> Result<bool> {
        let repository = self.repository.as_ref();

        if let Some(write) = policy.write() {
            if !check_argument_map(repository, write, args, requester, AccessType::Write).await? {
                return Ok(false);
            }
        }

        if let Some(read) = policy.read() {
            if !check_argument_map(repository, read, args, requester, AccessType::Read).await? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
