use super::{decode, decode_all};
use crate::db::DbConn;
use crate::error::AppError;
use crate::models::Tunnel;
use crate::sql::PgBindValue;

const SELECT_TUNNELS: &str = "SELECT id, name, is_active, created_at FROM tunnels";

pub struct TunnelService;

impl TunnelService {
    /// All tunnels in table order. Empty table gives an empty vec.
    pub async fn list(conn: &dyn DbConn) -> Result<Vec<Tunnel>, AppError> {
        let rows = conn.query(SELECT_TUNNELS, &[]).await.map_err(|e| {
            tracing::error!(error = %e, "loading tunnels failed");
            e
        })?;
        decode_all(rows)
    }

    pub async fn get(conn: &dyn DbConn, id: i32) -> Result<Option<Tunnel>, AppError> {
        let sql = format!("{} WHERE id = $1", SELECT_TUNNELS);
        let row = conn
            .query_one(&sql, &[PgBindValue::from(id)])
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "loading tunnel failed");
                e
            })?;
        match row {
            Some(row) => Ok(Some(decode(row)?)),
            None => {
                tracing::info!(id, "no tunnel with this id");
                Ok(None)
            }
        }
    }
}
