//! External provider sign-in handlers. The provider handshake itself lives
//! in `crate::auth::oauth`; these handlers only drive the redirect dance and
//! turn a provider profile into a local session.

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{self, oauth};
use crate::database::models::Employee;
use crate::database::Database;
use crate::error::ApiError;

use super::session_response;

const STATE_COOKIE: &str = "oauth_state";

/// GET /auth/oauth/:provider - redirect the browser to the provider
pub async fn oauth_start(Path(provider): Path<String>) -> Result<Response, ApiError> {
    let state = Uuid::new_v4().simple().to_string();
    let url = oauth::authorize_redirect(&provider, &state)?;

    let state_cookie = AppendHeaders([(
        header::SET_COOKIE,
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=600", STATE_COOKIE, state),
    )]);

    Ok((state_cookie, Redirect::to(&url)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /signin-google
pub async fn google_callback(
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    callback("google", &headers, query).await
}

/// GET /signin-facebook
pub async fn facebook_callback(
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    callback("facebook", &headers, query).await
}

async fn callback(
    provider: &str,
    headers: &HeaderMap,
    query: CallbackQuery,
) -> Result<Response, ApiError> {
    if let Some(err) = query.error {
        tracing::info!("{} sign-in declined: {}", provider, err);
        return Err(ApiError::unauthorized("External sign-in was cancelled"));
    }

    // The state round-trip is the callback's own forgery check
    let expected_state = auth::cookie_value(headers, STATE_COOKIE);
    if expected_state.is_none() || expected_state != query.state {
        return Err(ApiError::forbidden("Sign-in state mismatch"));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::bad_request("Missing authorization code"))?;

    let external = oauth::exchange_code(provider, &code).await?;

    let pool = Database::pool().await?;
    let employee = match Employee::find_by_email(&pool, &external.email).await? {
        Some(existing) => existing,
        None => {
            let created = Employee::insert_external(
                &pool,
                &external.email,
                external.name.as_deref(),
                provider,
            )
            .await?;
            tracing::info!("Created employee {} via {}", created.id, provider);
            created
        }
    };

    session_response(StatusCode::OK, &employee)
}
