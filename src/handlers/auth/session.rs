use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::auth::AuthUser;
use crate::database::models::Employee;
use crate::database::Database;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

use super::clear_session_cookies;

/// GET /api/auth/whoami - the authenticated employee's profile
pub async fn whoami(user: AuthUser) -> ApiResult<Employee> {
    let pool = Database::pool().await?;
    let employee = Employee::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;
    Ok(ApiResponse::success(employee))
}

/// DELETE /api/auth/session - logout; the JWT itself simply expires, the
/// cookies are cleared here
pub async fn logout(user: AuthUser) -> Response {
    tracing::info!("Employee {} logged out", user.id);
    (clear_session_cookies(), Json(json!({ "success": true, "data": null }))).into_response()
}

/// DELETE /api/auth/account - delete the account; all owned shifts,
/// availabilities, pay stubs and punches go with it through the FK cascade
pub async fn delete_account(user: AuthUser) -> Result<Response, ApiError> {
    let pool = Database::pool().await?;
    let rows = Employee::delete(&pool, user.id).await?;
    if rows == 0 {
        return Err(ApiError::not_found("Account not found"));
    }

    tracing::info!("Employee {} deleted their account", user.id);
    Ok((clear_session_cookies(), Json(json!({ "success": true, "data": null }))).into_response())
}
