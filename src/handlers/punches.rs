//! CRUD handlers for time-clock punches

use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::auth::ownership::ensure_owner;
use crate::auth::AuthUser;
use crate::database::models::{Punch, PunchInput};
use crate::database::{Database, Repository};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

const TABLE: &str = "punches";

async fn repo() -> Result<Repository<Punch>, ApiError> {
    Ok(Repository::new(TABLE, Database::pool().await?))
}

/// GET /api/punches
pub async fn list() -> ApiResult<Vec<Punch>> {
    Ok(ApiResponse::success(repo().await?.list_all().await?))
}

/// GET /api/punches/:id
pub async fn details(Path(id): Path<i32>) -> ApiResult<Punch> {
    Ok(ApiResponse::success(repo().await?.find_404(id).await?))
}

/// GET /api/punches/new
pub async fn new_form(_user: AuthUser) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "punch_in_time": null,
        "punch_out_time": null
    })))
}

/// POST /api/punches
pub async fn create(user: AuthUser, Json(input): Json<PunchInput>) -> ApiResult<Punch> {
    input.validate()?;
    let pool = Database::pool().await?;
    let punch = Punch::insert(&pool, user.id, &input).await?;
    tracing::info!("Employee {} punched in (punch {})", user.id, punch.id);
    Ok(ApiResponse::created(punch))
}

/// GET /api/punches/:id/edit
pub async fn edit_form(user: AuthUser, Path(id): Path<i32>) -> ApiResult<Punch> {
    let punch = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &punch)?;
    Ok(ApiResponse::success(punch))
}

/// PUT /api/punches/:id
pub async fn update(
    user: AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<PunchInput>,
) -> ApiResult<Punch> {
    if input.id.is_some_and(|payload_id| payload_id != id) {
        return Err(ApiError::not_found("Record not found"));
    }

    let repo = repo().await?;
    let existing = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &existing)?;
    input.validate()?;

    let pool = Database::pool().await?;
    let rows = Punch::update(&pool, id, &input).await?;
    if rows == 0 {
        return if repo.exists(id).await? {
            Err(ApiError::internal_server_error("Concurrent modification detected"))
        } else {
            Err(ApiError::not_found("Record not found"))
        };
    }

    Ok(ApiResponse::success(repo.find_404(id).await?))
}

/// GET /api/punches/:id/delete
pub async fn delete_confirm(user: AuthUser, Path(id): Path<i32>) -> ApiResult<Punch> {
    let punch = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &punch)?;
    Ok(ApiResponse::success(punch))
}

/// DELETE /api/punches/:id
pub async fn destroy(user: AuthUser, Path(id): Path<i32>) -> ApiResult<()> {
    let repo = repo().await?;
    let punch = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &punch)?;

    let rows = repo.delete(id).await?;
    if rows == 0 {
        return Err(ApiError::not_found("Record not found"));
    }

    tracing::info!("Employee {} deleted punch {}", user.id, id);
    Ok(ApiResponse::no_content())
}
