use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::ownership::Owned;
use crate::database::manager::DatabaseError;
use crate::database::models::require;
use crate::error::ApiError;

/// Day of the week an employee is available. Stored as the `day_of_week`
/// Postgres enum; serde membership checking rejects anything else at the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "day_of_week", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// A recurring weekly availability window
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Availability {
    pub id: i32,
    pub employee_id: Uuid,
    pub day: DayOfWeek,
    pub start_availability: NaiveTime,
    pub end_availability: NaiveTime,
}

impl Owned for Availability {
    fn owner_id(&self) -> Uuid {
        self.employee_id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityInput {
    pub id: Option<i32>,
    pub day: Option<DayOfWeek>,
    pub start_availability: Option<NaiveTime>,
    pub end_availability: Option<NaiveTime>,
}

impl AvailabilityInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require(&mut errors, "day", &self.day);
        require(&mut errors, "start_availability", &self.start_availability);
        require(&mut errors, "end_availability", &self.end_availability);

        if let (Some(start), Some(end)) = (self.start_availability, self.end_availability) {
            if end <= start {
                errors.insert(
                    "end_availability".to_string(),
                    "End of availability must be after its start".to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid availability", Some(errors)))
        }
    }
}

impl Availability {
    pub async fn insert(
        pool: &PgPool,
        owner_id: Uuid,
        input: &AvailabilityInput,
    ) -> Result<Availability, DatabaseError> {
        let availability = sqlx::query_as::<_, Availability>(
            r#"
            INSERT INTO availabilities (employee_id, day, start_availability, end_availability)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(input.day)
        .bind(input.start_availability)
        .bind(input.end_availability)
        .fetch_one(pool)
        .await?;
        Ok(availability)
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        input: &AvailabilityInput,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE availabilities
            SET day = $1, start_availability = $2, end_availability = $3
            WHERE id = $4
            "#,
        )
        .bind(input.day)
        .bind(input.start_availability)
        .bind(input.end_availability)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
