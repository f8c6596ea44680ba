//! Permission policies.
//!
//! Every handler names the policy that guards it. A policy answers two
//! questions: may this caller perform this kind of request at all, and may
//! the caller perform it on this particular record. The record-level question
//! is only asked once the record has been loaded.

use crate::domain::Post;
use crate::error::DomainError;

/// Whether a request only reads or may change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    /// GET, HEAD and OPTIONS are safe; every other method writes.
    pub fn from_method(method: &str) -> Self {
        match method {
            "GET" | "HEAD" | "OPTIONS" => Access::Read,
            _ => Access::Write,
        }
    }
}

/// A record with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Post {
    fn owner_id(&self) -> i64 {
        self.author.id
    }
}

/// Access rule evaluated before handler logic.
///
/// `caller` is the authenticated user id, `None` for anonymous requests.
pub trait Permission: Send + Sync {
    fn has_permission(&self, _access: Access, _caller: Option<i64>) -> bool {
        true
    }

    fn has_object_permission(
        &self,
        _access: Access,
        _caller: Option<i64>,
        _object: &dyn Owned,
    ) -> bool {
        true
    }
}

/// Anyone may do anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAny;

impl Permission for AllowAny {}

/// Only authenticated callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAuthenticated;

impl Permission for IsAuthenticated {
    fn has_permission(&self, _access: Access, caller: Option<i64>) -> bool {
        caller.is_some()
    }
}

/// Anyone may read; writing requires authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAuthenticatedOrReadOnly;

impl Permission for IsAuthenticatedOrReadOnly {
    fn has_permission(&self, access: Access, caller: Option<i64>) -> bool {
        access == Access::Read || caller.is_some()
    }
}

/// Anyone may read; only the owner may write.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorOrReadOnly;

impl Permission for AuthorOrReadOnly {
    fn has_object_permission(&self, access: Access, caller: Option<i64>, object: &dyn Owned) -> bool {
        access == Access::Read || caller == Some(object.owner_id())
    }
}

/// Request-level check.
pub fn check(policy: &dyn Permission, access: Access, caller: Option<i64>) -> Result<(), DomainError> {
    if policy.has_permission(access, caller) {
        Ok(())
    } else {
        Err(denied(caller))
    }
}

/// Record-level check, run after the record was found.
pub fn check_object(
    policy: &dyn Permission,
    access: Access,
    caller: Option<i64>,
    object: &dyn Owned,
) -> Result<(), DomainError> {
    if policy.has_object_permission(access, caller, object) {
        Ok(())
    } else {
        Err(denied(caller))
    }
}

// Anonymous callers are asked to authenticate; known callers are refused.
fn denied(caller: Option<i64>) -> DomainError {
    match caller {
        None => DomainError::Unauthenticated,
        Some(_) => DomainError::Forbidden,
    }
}
