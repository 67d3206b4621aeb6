use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::ownership::Owned;
use crate::database::manager::DatabaseError;
use crate::database::models::require;
use crate::error::ApiError;

/// A pay stub for one pay period. Total pay is always derived from hours and
/// rate - it is never stored, so the two can never disagree.
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct PayStub {
    pub id: i32,
    pub employee_id: Uuid,
    pub hours_worked: Decimal,
    pub hourly_rate: Decimal,
    pub pay_date: NaiveDate,
}

impl PayStub {
    pub fn total_pay(&self) -> Decimal {
        self.hours_worked * self.hourly_rate
    }
}

// Hand-rolled so the derived total_pay field always appears on the wire
impl Serialize for PayStub {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("PayStub", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("employee_id", &self.employee_id)?;
        state.serialize_field("hours_worked", &self.hours_worked)?;
        state.serialize_field("hourly_rate", &self.hourly_rate)?;
        state.serialize_field("pay_date", &self.pay_date)?;
        state.serialize_field("total_pay", &self.total_pay())?;
        state.end()
    }
}

impl Owned for PayStub {
    fn owner_id(&self) -> Uuid {
        self.employee_id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayStubInput {
    pub id: Option<i32>,
    pub hours_worked: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub pay_date: Option<NaiveDate>,
}

impl PayStubInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require(&mut errors, "hours_worked", &self.hours_worked);
        require(&mut errors, "hourly_rate", &self.hourly_rate);
        require(&mut errors, "pay_date", &self.pay_date);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid pay stub", Some(errors)))
        }
    }
}

impl PayStub {
    pub async fn insert(
        pool: &PgPool,
        owner_id: Uuid,
        input: &PayStubInput,
    ) -> Result<PayStub, DatabaseError> {
        let pay_stub = sqlx::query_as::<_, PayStub>(
            r#"
            INSERT INTO pay_stubs (employee_id, hours_worked, hourly_rate, pay_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(input.hours_worked)
        .bind(input.hourly_rate)
        .bind(input.pay_date)
        .fetch_one(pool)
        .await?;
        Ok(pay_stub)
    }

    pub async fn update(
        pool: &PgPool,
        id: i32,
        input: &PayStubInput,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE pay_stubs
            SET hours_worked = $1, hourly_rate = $2, pay_date = $3
            WHERE id = $4
            "#,
        )
        .bind(input.hours_worked)
        .bind(input.hourly_rate)
        .bind(input.pay_date)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
