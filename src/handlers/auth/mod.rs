mod login;
mod oauth;
mod register;
mod session;

pub use login::login;
pub use oauth::{facebook_callback, google_callback, oauth_start};
pub use register::register;
pub use session::{delete_account, logout, whoami};

use axum::{
    http::{header, HeaderName, StatusCode},
    response::{AppendHeaders, IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{self, Claims, CSRF_COOKIE, SESSION_COOKIE};
use crate::config;
use crate::database::models::Employee;
use crate::error::ApiError;

/// Issue a session for an authenticated employee: JWT in the body for API
/// clients, plus the HTTP-only session cookie and readable anti-forgery
/// cookie for browsers.
pub(crate) fn session_response(
    status: StatusCode,
    employee: &Employee,
) -> Result<Response, ApiError> {
    let claims = Claims::new(employee.id, employee.email.clone());
    let token = auth::generate_jwt(&claims)?;
    let csrf_token = Uuid::new_v4().simple().to_string();
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token),
        ),
        (header::SET_COOKIE, format!("{}={}; Path=/; SameSite=Lax", CSRF_COOKIE, csrf_token)),
    ]);

    let body = json!({
        "success": true,
        "data": {
            "token": token,
            "expires_in": expires_in,
            "employee": employee
        }
    });

    Ok((status, cookies, Json(body)).into_response())
}

/// Expire both session cookies
pub(crate) fn clear_session_cookies() -> AppendHeaders<[(HeaderName, String); 2]> {
    AppendHeaders([
        (header::SET_COOKIE, format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)),
        (header::SET_COOKIE, format!("{}=; Path=/; Max-Age=0", CSRF_COOKIE)),
    ])
}
