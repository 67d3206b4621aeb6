//! CRUD handlers for shifts. Listings and details are public; everything
//! that mutates requires a session and passes the ownership guard.

use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::auth::ownership::ensure_owner;
use crate::auth::AuthUser;
use crate::database::models::{Shift, ShiftInput};
use crate::database::{Database, Repository};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

const TABLE: &str = "shifts";

async fn repo() -> Result<Repository<Shift>, ApiError> {
    Ok(Repository::new(TABLE, Database::pool().await?))
}

/// GET /api/shifts - public listing of all shifts
pub async fn list() -> ApiResult<Vec<Shift>> {
    Ok(ApiResponse::success(repo().await?.list_all().await?))
}

/// GET /api/shifts/:id - public single-record view
pub async fn details(Path(id): Path<i32>) -> ApiResult<Shift> {
    Ok(ApiResponse::success(repo().await?.find_404(id).await?))
}

/// GET /api/shifts/new - blank form payload for an authenticated employee
pub async fn new_form(_user: AuthUser) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "start_time": null,
        "end_time": null,
        "is_swap_requested": false,
        "is_given_away": false,
        "is_absent": false
    })))
}

/// POST /api/shifts - create, stamping the session's employee id as owner
pub async fn create(user: AuthUser, Json(input): Json<ShiftInput>) -> ApiResult<Shift> {
    input.validate()?;
    let pool = Database::pool().await?;
    let shift = Shift::insert(&pool, user.id, &input).await?;
    tracing::info!("Employee {} created shift {}", user.id, shift.id);
    Ok(ApiResponse::created(shift))
}

/// GET /api/shifts/:id/edit - pre-filled form payload, owner only
pub async fn edit_form(user: AuthUser, Path(id): Path<i32>) -> ApiResult<Shift> {
    let shift = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &shift)?;
    Ok(ApiResponse::success(shift))
}

/// PUT /api/shifts/:id - update, owner only
pub async fn update(
    user: AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<ShiftInput>,
) -> ApiResult<Shift> {
    if input.id.is_some_and(|payload_id| payload_id != id) {
        return Err(ApiError::not_found("Record not found"));
    }

    let repo = repo().await?;
    let existing = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &existing)?;
    input.validate()?;

    let pool = Database::pool().await?;
    let rows = Shift::update(&pool, id, &input).await?;
    if rows == 0 {
        // The row we just read is gone or stopped matching; removed means
        // not-found, anything else is fatal
        return if repo.exists(id).await? {
            Err(ApiError::internal_server_error("Concurrent modification detected"))
        } else {
            Err(ApiError::not_found("Record not found"))
        };
    }

    Ok(ApiResponse::success(repo.find_404(id).await?))
}

/// GET /api/shifts/:id/delete - confirmation payload, owner only
pub async fn delete_confirm(user: AuthUser, Path(id): Path<i32>) -> ApiResult<Shift> {
    let shift = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &shift)?;
    Ok(ApiResponse::success(shift))
}

/// DELETE /api/shifts/:id - remove, owner only; a second delete is 404
pub async fn destroy(user: AuthUser, Path(id): Path<i32>) -> ApiResult<()> {
    let repo = repo().await?;
    let shift = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &shift)?;

    let rows = repo.delete(id).await?;
    if rows == 0 {
        return Err(ApiError::not_found("Record not found"));
    }

    tracing::info!("Employee {} deleted shift {}", user.id, id);
    Ok(ApiResponse::no_content())
}
