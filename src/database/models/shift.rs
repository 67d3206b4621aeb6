use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::ownership::Owned;
use crate::database::manager::DatabaseError;
use crate::database::models::require;
use crate::error::ApiError;

/// A scheduled work shift owned by one employee
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shift {
    pub id: i32,
    pub employee_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_swap_requested: bool,
    pub is_given_away: bool,
    pub is_absent: bool,
}

impl Owned for Shift {
    fn owner_id(&self) -> Uuid {
        self.employee_id
    }
}

/// Form payload for creating or editing a shift. The owner is never taken
/// from the payload; handlers stamp it from the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftInput {
    pub id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_swap_requested: bool,
    #[serde(default)]
    pub is_given_away: bool,
    #[serde(default)]
    pub is_absent: bool,
}

impl ShiftInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require(&mut errors, "start_time", &self.start_time);
        require(&mut errors, "end_time", &self.end_time);

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                errors.insert(
                    "end_time".to_string(),
                    "End time must be after start time".to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid shift", Some(errors)))
        }
    }
}

impl Shift {
    pub async fn insert(
        pool: &PgPool,
        owner_id: Uuid,
        input: &ShiftInput,
    ) -> Result<Shift, DatabaseError> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            INSERT INTO shifts
                (employee_id, start_time, end_time, is_swap_requested, is_given_away, is_absent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.is_swap_requested)
        .bind(input.is_given_away)
        .bind(input.is_absent)
        .fetch_one(pool)
        .await?;
        Ok(shift)
    }

    /// Returns the number of rows affected; 0 means the row vanished between
    /// the ownership read and this write
    pub async fn update(
        pool: &PgPool,
        id: i32,
        input: &ShiftInput,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE shifts
            SET start_time = $1, end_time = $2,
                is_swap_requested = $3, is_given_away = $4, is_absent = $5
            WHERE id = $6
            "#,
        )
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.is_swap_requested)
        .bind(input.is_given_away)
        .bind(input.is_absent)
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

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn missing_times_are_field_errors() {
        let err = ShiftInput::default().validate().unwrap_err();
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("start_time"));
                assert!(fields.contains_key("end_time"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn end_must_follow_start() {
        let input = ShiftInput {
            start_time: Some(at(17)),
            end_time: Some(at(9)),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = ShiftInput {
            start_time: Some(at(9)),
            end_time: Some(at(17)),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }
}
