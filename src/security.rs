//! Admin access checks in front of every order manager route.

use axum::http::{HeaderMap, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminResource {
    Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    View,
    Create,
    Update,
    Delete,
}

pub trait AccessGuard: Send + Sync {
    fn is_granted(&self, headers: &HeaderMap, resource: AdminResource, access: AccessMode) -> bool;
}

/// Grants everything to requests carrying `Authorization: Bearer <token>`.
///
/// Without a configured token nothing is granted.
#[derive(Debug, Clone, Default)]
pub struct TokenAccessGuard {
    token: Option<String>,
}

impl TokenAccessGuard {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|token| !token.is_empty()),
        }
    }
}

impl AccessGuard for TokenAccessGuard {
    fn is_granted(&self, headers: &HeaderMap, _resource: AdminResource, _access: AccessMode) -> bool {
        let Some(expected) = self.token.as_deref() else {
            return false;
        };
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token.trim() == expected)
    }
}
