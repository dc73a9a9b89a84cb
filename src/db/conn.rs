use crate::sql::{row_to_json, PgBindValue, Row};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::query::Query;
use sqlx::Postgres;
use std::time::Duration;

/// The three database operations the services use. Dropping the returned
/// future abandons the statement, which is how a disconnected client or an
/// elapsed request deadline cancels in-flight work.
#[async_trait]
pub trait DbConn: Send + Sync {
    /// Run a statement and collect every row.
    async fn query(&self, sql: &str, params: &[PgBindValue]) -> Result<Vec<Row>, sqlx::Error>;

    /// Run a statement and return its first row, or `None` when it produced none.
    async fn query_one(&self, sql: &str, params: &[PgBindValue])
        -> Result<Option<Row>, sqlx::Error>;

    /// Run a statement and return the number of rows it affected.
    async fn execute(&self, sql: &str, params: &[PgBindValue]) -> Result<u64, sqlx::Error>;
}

fn bind_all<'q>(sql: &'q str, params: &[PgBindValue]) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql);
    for p in params {
        query = query.bind(p.clone());
    }
    query
}

#[async_trait]
impl DbConn for PgPool {
    async fn query(&self, sql: &str, params: &[PgBindValue]) -> Result<Vec<Row>, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let rows = bind_all(sql, params).fetch_all(self).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn query_one(
        &self,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<Option<Row>, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?params, "query_one");
        let row = bind_all(sql, params).fetch_optional(self).await?;
        Ok(row.as_ref().map(row_to_json))
    }

    async fn execute(&self, sql: &str, params: &[PgBindValue]) -> Result<u64, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?params, "execute");
        let done = bind_all(sql, params).execute(self).await?;
        Ok(done.rows_affected())
    }
}

/// Open the pool. Both the first connection and later acquires give up after `timeout`.
pub async fn connect(
    options: PgConnectOptions,
    max_connections: u32,
    timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    let pending = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(timeout)
        .connect_with(options);
    match tokio::time::timeout(timeout, pending).await {
        Ok(pool) => pool,
        Err(_) => Err(sqlx::Error::PoolTimedOut),
    }
}
