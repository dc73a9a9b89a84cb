use super::{decode, decode_all, parse_uuid};
use crate::db::DbConn;
use crate::error::AppError;
use crate::models::{specialty_labels, Coach, CoachUpdates, NewCoach};
use crate::sql::PgBindValue;

/// Column list shared by SELECT and RETURNING. The enum array comes back as text[].
const COACH_COLUMNS: &str = "id, first_name, last_name, email, phone, is_active, \
    specialties::text[] AS specialties, created_at, updated_at";

pub struct CoachService;

impl CoachService {
    pub async fn list(conn: &dyn DbConn) -> Result<Vec<Coach>, AppError> {
        let sql = format!("SELECT {} FROM coaches", COACH_COLUMNS);
        let rows = conn.query(&sql, &[]).await.map_err(|e| {
            tracing::error!(error = %e, "loading coaches failed");
            e
        })?;
        decode_all(rows)
    }

    pub async fn get(conn: &dyn DbConn, id: &str) -> Result<Option<Coach>, AppError> {
        let Some(uuid) = parse_uuid("coaches", id) else {
            return Ok(None);
        };
        let sql = format!("SELECT {} FROM coaches WHERE id = $1", COACH_COLUMNS);
        let row = conn
            .query_one(&sql, &[PgBindValue::from(uuid)])
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "loading coach failed");
                e
            })?;
        match row {
            Some(row) => Ok(Some(decode(row)?)),
            None => {
                tracing::info!(id, "no coach with this id");
                Ok(None)
            }
        }
    }

    /// Insert and return the stored row with its generated id and timestamps.
    pub async fn create(conn: &dyn DbConn, coach: &NewCoach) -> Result<Coach, AppError> {
        let sql = format!(
            "INSERT INTO coaches (first_name, last_name, phone, email, specialties) \
             VALUES ($1, $2, $3, $4, $5::coach_specialty[]) \
             RETURNING {}",
            COACH_COLUMNS
        );
        let params = [
            PgBindValue::from(coach.first_name.clone()),
            PgBindValue::from(coach.last_name.clone()),
            PgBindValue::from(coach.phone.clone()),
            PgBindValue::from(coach.email.clone()),
            PgBindValue::from(specialty_labels(&coach.specialties)),
        ];
        let row = conn.query_one(&sql, &params).await.map_err(|e| {
            tracing::error!(error = %e, "inserting coach failed");
            e
        })?;
        let row = row.ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        decode(row)
    }

    /// Partial update: null fields keep the current column. `Ok(None)` when the id has no row.
    pub async fn update(
        conn: &dyn DbConn,
        id: &str,
        updates: &CoachUpdates,
    ) -> Result<Option<Coach>, AppError> {
        let Some(uuid) = parse_uuid("coaches", id) else {
            return Ok(None);
        };
        let sql = format!(
            "UPDATE coaches SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                phone = COALESCE($4, phone), \
                email = COALESCE($5, email), \
                is_active = COALESCE($6, is_active), \
                specialties = COALESCE($7::coach_specialty[], specialties), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {}",
            COACH_COLUMNS
        );
        let params = [
            PgBindValue::from(uuid),
            PgBindValue::from(updates.first_name.clone()),
            PgBindValue::from(updates.last_name.clone()),
            PgBindValue::from(updates.phone.clone()),
            PgBindValue::from(updates.email.clone()),
            PgBindValue::from(updates.is_active),
            PgBindValue::from(updates.specialties.as_deref().map(specialty_labels)),
        ];
        let row = conn.query_one(&sql, &params).await.map_err(|e| {
            tracing::error!(error = %e, id, "updating coach failed");
            e
        })?;
        match row {
            Some(row) => Ok(Some(decode(row)?)),
            None => {
                tracing::info!(id, "cannot update coach; no row with this id");
                Ok(None)
            }
        }
    }

    /// Rows removed: 0 or 1. A missing id is not an error.
    pub async fn delete(conn: &dyn DbConn, id: &str) -> Result<u64, AppError> {
        let Some(uuid) = parse_uuid("coaches", id) else {
            return Ok(0);
        };
        let affected = conn
            .execute("DELETE FROM coaches WHERE id = $1", &[PgBindValue::from(uuid)])
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "deleting coach failed");
                e
            })?;
        Ok(affected)
    }
}
