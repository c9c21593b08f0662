//! Caller identity.
//!
//! Authentication happens upstream in the persistence/auth service; requests
//! arrive with an `x-user-id` header already validated there. A missing
//! header means the caller is an anonymous guest.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller's identity, as asserted by the upstream auth layer.
#[derive(Clone, Debug, Default)]
pub struct UserIdentity {
    pub user_id: Option<String>,
}

impl UserIdentity {
    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }
}

impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(UserIdentity { user_id })
    }
}
