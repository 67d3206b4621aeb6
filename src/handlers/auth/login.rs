use axum::{http::StatusCode, response::Response, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::password;
use crate::config;
use crate::database::models::Employee;
use crate::database::Database;
use crate::error::ApiError;

use super::session_response;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - verify credentials and issue a session
///
/// Failed attempts count toward the configured lockout; a success resets the
/// counter. Every rejection uses the same message so the endpoint doesn't
/// reveal which accounts exist.
pub async fn login(Json(req): Json<LoginRequest>) -> Result<Response, ApiError> {
    let pool = Database::pool().await?;
    let security = &config::config().security;

    let Some(employee) = Employee::find_by_email(&pool, &req.email).await? else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    if employee.is_locked(Utc::now()) {
        tracing::warn!("Login attempt on locked account {}", employee.id);
        return Err(ApiError::forbidden(
            "Account temporarily locked after repeated failed logins",
        ));
    }

    // Accounts created through an external provider have no password
    let Some(hash) = employee.password_hash.as_deref() else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    if !password::verify_password(&req.password, hash)? {
        Employee::record_failed_login(
            &pool,
            employee.id,
            security.max_failed_logins,
            security.lockout_minutes,
        )
        .await?;
        tracing::info!("Failed login for employee {}", employee.id);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    Employee::reset_login_state(&pool, employee.id).await?;
    tracing::info!("Employee {} logged in", employee.id);
    session_response(StatusCode::OK, &employee)
}
