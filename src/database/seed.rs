use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::password;
use crate::config::{self, Environment};
use crate::database::manager::DatabaseError;
use crate::database::models::{Shift, ShiftInput};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "password123";

/// Best-effort demo data seeding for local development. Failures are logged
/// and the process keeps starting; a broken seed must never take the
/// service down.
pub async fn run() {
    if !matches!(config::config().environment, Environment::Development) {
        return;
    }
    if std::env::var("SEED_DEMO_DATA").as_deref() != Ok("true") {
        return;
    }

    match seed_demo().await {
        Ok(Some(id)) => info!("Seeded demo employee {} ({})", DEMO_EMAIL, id),
        Ok(None) => debug!("Demo employee already present, seeding skipped"),
        Err(e) => warn!("Demo seeding failed, continuing startup: {}", e),
    }
}

async fn seed_demo() -> Result<Option<Uuid>, DatabaseError> {
    let pool = crate::database::Database::pool().await?;

    let hash = password::hash_password(DEMO_PASSWORD)
        .map_err(|e| DatabaseError::QueryError(format!("hashing demo password: {}", e)))?;

    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO employees (email, display_name, password_hash)
        VALUES ($1, 'Demo Employee', $2)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(DEMO_EMAIL)
    .bind(&hash)
    .fetch_optional(&pool)
    .await?;

    let Some((employee_id,)) = inserted else {
        return Ok(None);
    };

    seed_schedule(&pool, employee_id).await?;
    Ok(Some(employee_id))
}

async fn seed_schedule(pool: &PgPool, employee_id: Uuid) -> Result<(), DatabaseError> {
    let start = Utc::now() + Duration::days(1);
    let shift = ShiftInput {
        start_time: Some(start),
        end_time: Some(start + Duration::hours(8)),
        ..Default::default()
    };
    Shift::insert(pool, employee_id, &shift).await?;

    sqlx::query(
        r#"
        INSERT INTO availabilities (employee_id, day, start_availability, end_availability)
        VALUES ($1, 'monday', '09:00', '17:00')
        "#,
    )
    .bind(employee_id)
    .execute(pool)
    .await?;

    Ok(())
}
