use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// An account in the identity store. Password-less rows belong to employees
/// who only ever signed in through an external provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub provider: Option<String>,
    #[serde(skip_serializing)]
    pub failed_login_count: i32,
    #[serde(skip_serializing)]
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(employee)
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Employee>, DatabaseError> {
        let employee =
            sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(pool)
                .await?;
        Ok(employee)
    }

    /// Create a password-based account
    pub async fn insert_local(
        pool: &PgPool,
        email: &str,
        display_name: Option<&str>,
        password_hash: &str,
    ) -> Result<Employee, DatabaseError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (email, display_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(employee)
    }

    /// Create an account backed by an external sign-in provider
    pub async fn insert_external(
        pool: &PgPool,
        email: &str,
        display_name: Option<&str>,
        provider: &str,
    ) -> Result<Employee, DatabaseError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (email, display_name, provider)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(provider)
        .fetch_one(pool)
        .await?;
        Ok(employee)
    }

    /// Bump the failed-login counter, locking the account once the configured
    /// threshold is reached
    pub async fn record_failed_login(
        pool: &PgPool,
        id: Uuid,
        max_failed_logins: u32,
        lockout_minutes: u64,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE employees
            SET failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2
                    THEN now() + make_interval(mins => $3)
                    ELSE locked_until
                END,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(max_failed_logins as i32)
        .bind(lockout_minutes as i32)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Successful login clears the counter and any lockout
    pub async fn reset_login_state(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE employees
            SET failed_login_count = 0, locked_until = NULL, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove the account; owned records go with it via the FK cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn employee(locked_until: Option<DateTime<Utc>>) -> Employee {
        Employee {
            id: Uuid::nil(),
            email: "worker@example.com".to_string(),
            display_name: None,
            password_hash: None,
            provider: None,
            failed_login_count: 0,
            locked_until,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn lockout_expires() {
        let now = Utc::now();
        assert!(employee(Some(now + Duration::minutes(5))).is_locked(now));
        assert!(!employee(Some(now - Duration::minutes(5))).is_locked(now));
        assert!(!employee(None).is_locked(now));
    }

    #[test]
    fn password_hash_never_serialized() {
        let mut e = employee(None);
        e.password_hash = Some("$argon2id$secret".to_string());
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("locked_until").is_none());
    }
}
