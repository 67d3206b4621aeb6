use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::ownership::Owned;
use crate::database::manager::DatabaseError;
use crate::database::models::require;
use crate::error::ApiError;

/// A time-clock punch. An open punch has no punch-out time yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Punch {
    pub id: i32,
    pub employee_id: Uuid,
    pub punch_in_time: DateTime<Utc>,
    pub punch_out_time: Option<DateTime<Utc>>,
}

impl Owned for Punch {
    fn owner_id(&self) -> Uuid {
        self.employee_id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PunchInput {
    pub id: Option<i32>,
    pub punch_in_time: Option<DateTime<Utc>>,
    pub punch_out_time: Option<DateTime<Utc>>,
}

impl PunchInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require(&mut errors, "punch_in_time", &self.punch_in_time);

        if let (Some(punch_in), Some(punch_out)) = (self.punch_in_time, self.punch_out_time) {
            if punch_out <= punch_in {
                errors.insert(
                    "punch_out_time".to_string(),
                    "Punch-out must be after punch-in".to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid punch", Some(errors)))
        }
    }
}

impl Punch {
    pub async fn insert(
        pool: &PgPool,
        owner_id: Uuid,
        input: &PunchInput,
    ) -> Result<Punch, DatabaseError> {
        let punch = sqlx::query_as::<_, Punch>(
            r#"
            INSERT INTO punches (employee_id, punch_in_time, punch_out_time)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(input.punch_in_time)
        .bind(input.punch_out_time)
        .fetch_one(pool)
        .await?;
        Ok(punch)
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        input: &PunchInput,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE punches
            SET punch_in_time = $1, punch_out_time = $2
            WHERE id = $3
            "#,
        )
        .bind(input.punch_in_time)
        .bind(input.punch_out_time)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn open_punch_is_valid() {
        let input = PunchInput {
            punch_in_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            punch_out_time: None,
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn punch_out_before_punch_in_rejected() {
        let input = PunchInput {
            punch_in_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap()),
            punch_out_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }
}
