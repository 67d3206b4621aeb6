use axum::{http::StatusCode, response::Response, Json};
use serde::Deserialize;
use std::collections::HashMap;

use crate::auth::password;
use crate::config;
use crate::database::models::Employee;
use crate::database::Database;
use crate::error::ApiError;

use super::session_response;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
}

/// POST /auth/register - create a password-based account and sign it in
pub async fn register(Json(req): Json<RegisterRequest>) -> Result<Response, ApiError> {
    let (email, plaintext) = validate(&req)?;

    let pool = Database::pool().await?;
    if Employee::find_by_email(&pool, email).await?.is_some() {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let hash = password::hash_password(plaintext)?;
    let employee =
        Employee::insert_local(&pool, email, req.display_name.as_deref(), &hash).await?;

    tracing::info!("Registered employee {} ({})", employee.id, employee.email);
    session_response(StatusCode::CREATED, &employee)
}

fn validate(req: &RegisterRequest) -> Result<(&str, &str), ApiError> {
    let mut errors = HashMap::new();
    let min_len = config::config().security.min_password_length;

    let email = req.email.as_deref().unwrap_or("").trim();
    if email.is_empty() {
        errors.insert("email".to_string(), "This field is required".to_string());
    } else if !email.contains('@') {
        errors.insert("email".to_string(), "Not a valid email address".to_string());
    }

    let password = req.password.as_deref().unwrap_or("");
    if password.is_empty() {
        errors.insert("password".to_string(), "This field is required".to_string());
    } else if password.len() < min_len {
        errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", min_len),
        );
    }

    if !errors.is_empty() {
        return Err(ApiError::validation_error("Invalid registration", Some(errors)));
    }

    match (req.email.as_deref(), req.password.as_deref()) {
        (Some(email), Some(password)) => Ok((email.trim(), password)),
        _ => Err(ApiError::validation_error("Invalid registration", None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>, password: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.map(String::from),
            password: password.map(String::from),
            display_name: None,
        }
    }

    #[test]
    fn accepts_reasonable_credentials() {
        assert!(validate(&request(Some("worker@example.com"), Some("long-enough"))).is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        let err = validate(&request(None, None)).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_email_and_short_password() {
        let err = validate(&request(Some("not-an-email"), Some("abc"))).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
