//! CRUD handlers for weekly availability windows

use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::auth::ownership::ensure_owner;
use crate::auth::AuthUser;
use crate::database::models::{Availability, AvailabilityInput};
use crate::database::{Database, Repository};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

const TABLE: &str = "availabilities";

async fn repo() -> Result<Repository<Availability>, ApiError> {
    Ok(Repository::new(TABLE, Database::pool().await?))
}

/// GET /api/availabilities
pub async fn list() -> ApiResult<Vec<Availability>> {
    Ok(ApiResponse::success(repo().await?.list_all().await?))
}

/// GET /api/availabilities/:id
pub async fn details(Path(id): Path<i32>) -> ApiResult<Availability> {
    Ok(ApiResponse::success(repo().await?.find_404(id).await?))
}

/// GET /api/availabilities/new
pub async fn new_form(_user: AuthUser) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "day": null,
        "start_availability": null,
        "end_availability": null
    })))
}

/// POST /api/availabilities
pub async fn create(
    user: AuthUser,
    Json(input): Json<AvailabilityInput>,
) -> ApiResult<Availability> {
    input.validate()?;
    let pool = Database::pool().await?;
    let availability = Availability::insert(&pool, user.id, &input).await?;
    tracing::info!("Employee {} created availability {}", user.id, availability.id);
    Ok(ApiResponse::created(availability))
}

/// GET /api/availabilities/:id/edit
pub async fn edit_form(user: AuthUser, Path(id): Path<i32>) -> ApiResult<Availability> {
    let availability = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &availability)?;
    Ok(ApiResponse::success(availability))
}

/// PUT /api/availabilities/:id
pub async fn update(
    user: AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<AvailabilityInput>,
) -> ApiResult<Availability> {
    if input.id.is_some_and(|payload_id| payload_id != id) {
        return Err(ApiError::not_found("Record not found"));
    }

    let repo = repo().await?;
    let existing = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &existing)?;
    input.validate()?;

    let pool = Database::pool().await?;
    let rows = Availability::update(&pool, id, &input).await?;
    if rows == 0 {
        return if repo.exists(id).await? {
            Err(ApiError::internal_server_error("Concurrent modification detected"))
        } else {
            Err(ApiError::not_found("Record not found"))
        };
    }

    Ok(ApiResponse::success(repo.find_404(id).await?))
}

/// GET /api/availabilities/:id/delete
pub async fn delete_confirm(user: AuthUser, Path(id): Path<i32>) -> ApiResult<Availability> {
    let availability = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &availability)?;
    Ok(ApiResponse::success(availability))
}

/// DELETE /api/availabilities/:id
pub async fn destroy(user: AuthUser, Path(id): Path<i32>) -> ApiResult<()> {
    let repo = repo().await?;
    let availability = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &availability)?;

    let rows = repo.delete(id).await?;
    if rows == 0 {
        return Err(ApiError::not_found("Record not found"));
    }

    tracing::info!("Employee {} deleted availability {}", user.id, id);
    Ok(ApiResponse::no_content())
}
