//! Authenticated-user extractor
//!
//! Handlers that require authentication take an `AuthUser` parameter; the
//! identity is always an explicit argument, never ambient request state.
//! Accepts either `Authorization: Bearer <jwt>` or the session cookie.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::{self, Claims, SESSION_COOKIE};
use crate::error::ApiError;

/// The acting employee, resolved from a validated session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { id: claims.sub, email: claims.email }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Already validated earlier in this request
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(parts)
            .or_else(|| auth::cookie_value(&parts.headers, SESSION_COOKIE))
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = auth::validate_jwt(&token).map_err(|e| {
            tracing::debug!("Session token rejected: {}", e);
            ApiError::unauthorized("Invalid or expired session")
        })?;

        let user = AuthUser::from(claims);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
