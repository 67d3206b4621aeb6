use sqlx::{self, postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;

/// Typed access to one record table. The four schedule entities share the
/// same surrogate-key shape, so listing, lookup and removal are generic;
/// inserts and updates are typed per entity on the model itself.
pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self { table_name, pool, _phantom: std::marker::PhantomData }
    }

    pub async fn list_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", self.table_name);
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn find(&self, id: i32) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", self.table_name);
        Ok(sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    /// Like `find`, but maps an absent row to `DatabaseError::NotFound`
    pub async fn find_404(&self, id: i32) -> Result<T, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Record not found".to_string()))
    }

    pub async fn exists(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.find(id).await?.is_some())
    }

    /// Remove one row; returns the number of rows affected (0 when the row
    /// was already gone)
    pub async fn delete(&self, id: i32) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table_name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
