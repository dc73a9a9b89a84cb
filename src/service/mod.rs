//! Persistence operations, one service per table. Every statement is a single
//! autocommit call on the shared `DbConn`.

mod coaches;
mod reservations;
mod tunnels;

pub use coaches::CoachService;
pub use reservations::ReservationService;
pub use tunnels::TunnelService;

use crate::error::AppError;
use crate::sql::Row;
use serde::de::DeserializeOwned;
use uuid::Uuid;

fn decode<T: DeserializeOwned>(row: Row) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::Object(row)).map_err(|e| {
        tracing::error!(error = %e, "row does not match record shape");
        AppError::Decode(e)
    })
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, AppError> {
    rows.into_iter().map(decode).collect()
}

/// Ids arrive as raw path segments; anything that is not a UUID cannot match a row.
fn parse_uuid(table: &str, id: &str) -> Option<Uuid> {
    match Uuid::parse_str(id) {
        Ok(u) => Some(u),
        Err(_) => {
            tracing::info!(table, id, "id is not a uuid; no row can match");
            None
        }
    }
}
