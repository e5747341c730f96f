//! Caller identity extractor.
//!
//! Identity resolution lives in the excluded identity provider; by the time
//! a request reaches this core the gateway has already authenticated it and
//! forwards the caller as `x-user-id` / `x-user-role` headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use runnerhub_core::error::AppError;
use runnerhub_core::types::UserId;

use crate::error::ApiError;

/// Role forwarded by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    /// A regular (freemium) user.
    User,
    /// A platform administrator.
    Admin,
}

/// Extracted caller identity available in handlers.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity {
    /// The calling user.
    pub user_id: UserId,
    /// The caller's role.
    pub role: CallerRole,
}

impl CallerIdentity {
    /// Errors unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role != CallerRole::Admin {
            return Err(AppError::authorization("Administrator role required").into());
        }
        Ok(())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_header = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authorization("Missing x-user-id header"))?;

        let user_id: UserId = user_header
            .parse()
            .map_err(|_| AppError::validation("x-user-id is not a valid UUID"))?;

        let role = match parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
        {
            Some("admin") => CallerRole::Admin,
            _ => CallerRole::User,
        };

        Ok(CallerIdentity { user_id, role })
    }
}
