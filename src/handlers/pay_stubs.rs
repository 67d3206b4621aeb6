//! CRUD handlers for pay stubs. Responses always carry the derived
//! total_pay; the figure is never stored.

use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::auth::ownership::ensure_owner;
use crate::auth::AuthUser;
use crate::database::models::{PayStub, PayStubInput};
use crate::database::{Database, Repository};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

const TABLE: &str = "pay_stubs";

async fn repo() -> Result<Repository<PayStub>, ApiError> {
    Ok(Repository::new(TABLE, Database::pool().await?))
}

/// GET /api/pay_stubs
pub async fn list() -> ApiResult<Vec<PayStub>> {
    Ok(ApiResponse::success(repo().await?.list_all().await?))
}

/// GET /api/pay_stubs/:id
pub async fn details(Path(id): Path<i32>) -> ApiResult<PayStub> {
    Ok(ApiResponse::success(repo().await?.find_404(id).await?))
}

/// GET /api/pay_stubs/new
pub async fn new_form(_user: AuthUser) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "hours_worked": null,
        "hourly_rate": null,
        "pay_date": null
    })))
}

/// POST /api/pay_stubs
pub async fn create(user: AuthUser, Json(input): Json<PayStubInput>) -> ApiResult<PayStub> {
    input.validate()?;
    let pool = Database::pool().await?;
    let pay_stub = PayStub::insert(&pool, user.id, &input).await?;
    tracing::info!("Employee {} created pay stub {}", user.id, pay_stub.id);
    Ok(ApiResponse::created(pay_stub))
}

/// GET /api/pay_stubs/:id/edit
pub async fn edit_form(user: AuthUser, Path(id): Path<i32>) -> ApiResult<PayStub> {
    let pay_stub = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &pay_stub)?;
    Ok(ApiResponse::success(pay_stub))
}

/// PUT /api/pay_stubs/:id
pub async fn update(
    user: AuthUser,
    Path(id): Path<i32>,
    Json(input): Json<PayStubInput>,
) -> ApiResult<PayStub> {
    if input.id.is_some_and(|payload_id| payload_id != id) {
        return Err(ApiError::not_found("Record not found"));
    }

    let repo = repo().await?;
    let existing = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &existing)?;
    input.validate()?;

    let pool = Database::pool().await?;
    let rows = PayStub::update(&pool, id, &input).await?;
    if rows == 0 {
        return if repo.exists(id).await? {
            Err(ApiError::internal_server_error("Concurrent modification detected"))
        } else {
            Err(ApiError::not_found("Record not found"))
        };
    }

    Ok(ApiResponse::success(repo.find_404(id).await?))
}

/// GET /api/pay_stubs/:id/delete
pub async fn delete_confirm(user: AuthUser, Path(id): Path<i32>) -> ApiResult<PayStub> {
    let pay_stub = repo().await?.find_404(id).await?;
    ensure_owner(Some(user.id), &pay_stub)?;
    Ok(ApiResponse::success(pay_stub))
}

/// DELETE /api/pay_stubs/:id
pub async fn destroy(user: AuthUser, Path(id): Path<i32>) -> ApiResult<()> {
    let repo = repo().await?;
    let pay_stub = repo.find_404(id).await?;
    ensure_owner(Some(user.id), &pay_stub)?;

    let rows = repo.delete(id).await?;
    if rows == 0 {
        return Err(ApiError::not_found("Record not found"));
    }

    tracing::info!("Employee {} deleted pay stub {}", user.id, id);
    Ok(ApiResponse::no_content())
}
