use super::{decode, decode_all, parse_uuid};
use crate::db::DbConn;
use crate::error::AppError;
use crate::models::{NewReservation, Reservation, ReservationUpdates, SearchWindow};
use crate::sql::PgBindValue;

/// Column list shared by SELECT and RETURNING. Enum columns come back as text;
/// `reservation_kind` is exposed as `kind`.
const RESERVATION_COLUMNS: &str = "id, reservation_kind::text AS kind, tunnel_id, coach_id, \
    customer_first_name, customer_last_name, customer_phone, customer_email, \
    start_time, end_time, duration_minutes, status::text AS status, notes, \
    created_at, updated_at";

pub struct ReservationService;

impl ReservationService {
    pub async fn list(conn: &dyn DbConn) -> Result<Vec<Reservation>, AppError> {
        let sql = format!("SELECT {} FROM reservations", RESERVATION_COLUMNS);
        let rows = conn.query(&sql, &[]).await.map_err(|e| {
            tracing::error!(error = %e, "loading reservations failed");
            e
        })?;
        decode_all(rows)
    }

    pub async fn get(conn: &dyn DbConn, id: &str) -> Result<Option<Reservation>, AppError> {
        let Some(uuid) = parse_uuid("reservations", id) else {
            return Ok(None);
        };
        let sql = format!("SELECT {} FROM reservations WHERE id = $1", RESERVATION_COLUMNS);
        let row = conn
            .query_one(&sql, &[PgBindValue::from(uuid)])
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "loading reservation failed");
                e
            })?;
        match row {
            Some(row) => Ok(Some(decode(row)?)),
            None => {
                tracing::info!(id, "no reservation with this id");
                Ok(None)
            }
        }
    }

    pub async fn create(
        conn: &dyn DbConn,
        r: &NewReservation,
    ) -> Result<Reservation, AppError> {
        let sql = format!(
            "INSERT INTO reservations ( \
                reservation_kind, tunnel_id, coach_id, \
                customer_first_name, customer_last_name, customer_phone, customer_email, \
                start_time, duration_minutes, end_time, status, notes \
             ) VALUES ( \
                $1::reservation_kind, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
                $11::reservation_status, $12 \
             ) \
             RETURNING {}",
            RESERVATION_COLUMNS
        );
        let params = [
            PgBindValue::from(r.kind.as_str()),
            PgBindValue::from(r.tunnel_id),
            PgBindValue::from(r.coach_id),
            PgBindValue::from(r.customer_first_name.clone()),
            PgBindValue::from(r.customer_last_name.clone()),
            PgBindValue::from(r.customer_phone.clone()),
            PgBindValue::from(r.customer_email.clone()),
            PgBindValue::from(r.start_time),
            PgBindValue::from(r.duration_minutes),
            PgBindValue::from(r.end_time),
            PgBindValue::from(r.status.as_str()),
            PgBindValue::from(r.notes.clone()),
        ];
        let row = conn.query_one(&sql, &params).await.map_err(|e| {
            tracing::error!(error = %e, "inserting reservation failed");
            e
        })?;
        let row = row.ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        decode(row)
    }

    /// Partial update: null fields keep the current column. `Ok(None)` when the id has no row.
    pub async fn update(
        conn: &dyn DbConn,
        id: &str,
        u: &ReservationUpdates,
    ) -> Result<Option<Reservation>, AppError> {
        let Some(uuid) = parse_uuid("reservations", id) else {
            return Ok(None);
        };
        let sql = format!(
            "UPDATE reservations SET \
                reservation_kind = COALESCE($2::reservation_kind, reservation_kind), \
                tunnel_id = COALESCE($3, tunnel_id), \
                coach_id = COALESCE($4, coach_id), \
                customer_first_name = COALESCE($5, customer_first_name), \
                customer_last_name = COALESCE($6, customer_last_name), \
                customer_phone = COALESCE($7, customer_phone), \
                customer_email = COALESCE($8, customer_email), \
                start_time = COALESCE($9, start_time), \
                duration_minutes = COALESCE($10, duration_minutes), \
                end_time = COALESCE($11, end_time), \
                status = COALESCE($12::reservation_status, status), \
                notes = COALESCE($13, notes), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {}",
            RESERVATION_COLUMNS
        );
        let params = [
            PgBindValue::from(uuid),
            PgBindValue::from(u.kind.map(|k| k.as_str().to_string())),
            PgBindValue::from(u.tunnel_id),
            PgBindValue::from(u.coach_id),
            PgBindValue::from(u.customer_first_name.clone()),
            PgBindValue::from(u.customer_last_name.clone()),
            PgBindValue::from(u.customer_phone.clone()),
            PgBindValue::from(u.customer_email.clone()),
            PgBindValue::from(u.start_time),
            PgBindValue::from(u.duration_minutes),
            PgBindValue::from(u.end_time),
            PgBindValue::from(u.status.map(|s| s.as_str().to_string())),
            PgBindValue::from(u.notes.clone()),
        ];
        let row = conn.query_one(&sql, &params).await.map_err(|e| {
            tracing::error!(error = %e, id, "updating reservation failed");
            e
        })?;
        match row {
            Some(row) => Ok(Some(decode(row)?)),
            None => {
                tracing::info!(id, "cannot update reservation; no row with this id");
                Ok(None)
            }
        }
    }

    /// Rows removed: 0 or 1. A missing id is not an error.
    pub async fn delete(conn: &dyn DbConn, id: &str) -> Result<u64, AppError> {
        let Some(uuid) = parse_uuid("reservations", id) else {
            return Ok(0);
        };
        let affected = conn
            .execute("DELETE FROM reservations WHERE id = $1", &[PgBindValue::from(uuid)])
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "deleting reservation failed");
                e
            })?;
        Ok(affected)
    }

    /// Reservations starting in `[from, to)`, earliest first, optionally on one tunnel.
    pub async fn search(
        conn: &dyn DbConn,
        window: &SearchWindow,
    ) -> Result<Vec<Reservation>, AppError> {
        let (sql, params) = match window.tunnel_id {
            None => (
                format!(
                    "SELECT {} FROM reservations \
                     WHERE start_time >= $1 AND start_time < $2 \
                     ORDER BY start_time ASC",
                    RESERVATION_COLUMNS
                ),
                vec![PgBindValue::from(window.from), PgBindValue::from(window.to)],
            ),
            Some(tunnel_id) => (
                format!(
                    "SELECT {} FROM reservations \
                     WHERE tunnel_id = $1 AND start_time >= $2 AND start_time < $3 \
                     ORDER BY start_time ASC",
                    RESERVATION_COLUMNS
                ),
                vec![
                    PgBindValue::from(tunnel_id),
                    PgBindValue::from(window.from),
                    PgBindValue::from(window.to),
                ],
            ),
        };
        let rows = conn.query(&sql, &params).await.map_err(|e| {
            tracing::error!(error = %e, "searching reservations failed");
            e
        })?;
        if rows.is_empty() {
            tracing::info!(
                from = %window.from.to_rfc3339(),
                to = %window.to.to_rfc3339(),
                tunnel_id = ?window.tunnel_id,
                "no reservations matched the search window"
            );
        }
        decode_all(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Expect, MockConn};
    use crate::models::{ReservationKind, ReservationStatus};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn reservation_row(id: Uuid, tunnel_id: i32, start: &str, end: &str) -> serde_json::Value {
        json!({
            "id": id,
            "kind": "tunnel",
            "tunnel_id": tunnel_id,
            "coach_id": null,
            "customer_first_name": "John",
            "customer_last_name": "Doe",
            "customer_phone": "1112223333",
            "customer_email": null,
            "start_time": start,
            "end_time": end,
            "duration_minutes": 60,
            "status": "confirmed",
            "notes": null,
            "created_at": "2025-08-01T00:00:00+00:00",
            "updated_at": "2025-08-01T00:00:00+00:00"
        })
    }

    fn new_reservation() -> NewReservation {
        NewReservation {
            kind: ReservationKind::Tunnel,
            tunnel_id: Some(1),
            coach_id: None,
            customer_first_name: "John".into(),
            customer_last_name: "Doe".into(),
            customer_phone: "1112223333".into(),
            customer_email: None,
            start_time: Utc.with_ymd_and_hms(2025, 8, 9, 12, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 8, 9, 13, 0, 0).unwrap(),
            duration_minutes: 60,
            status: ReservationStatus::Confirmed,
            notes: None,
        }
    }

    #[tokio::test]
    async fn list_returns_every_row() {
        let mock = MockConn::new();
        mock.expect(Expect::query("FROM reservations").returning_rows(vec![
            reservation_row(Uuid::new_v4(), 1, "2025-08-09T12:00:00+00:00", "2025-08-09T13:00:00+00:00"),
            reservation_row(Uuid::new_v4(), 2, "2025-08-09T14:00:00+00:00", "2025-08-09T15:00:00+00:00"),
        ]));

        let reservations = ReservationService::list(&mock).await.unwrap();

        assert_eq!(reservations.len(), 2);
        assert_eq!(reservations[0].kind, ReservationKind::Tunnel);
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn list_surfaces_db_error() {
        let mock = MockConn::new();
        mock.expect(Expect::query("FROM reservations").returning_error("test error"));

        assert!(ReservationService::list(&mock).await.is_err());
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn get_by_id() {
        let id = Uuid::new_v4();
        let mock = MockConn::new();
        mock.expect(
            Expect::query_one("FROM reservations WHERE id = $1")
                .with_args(vec![PgBindValue::from(id)])
                .returning_row(reservation_row(
                    id,
                    1,
                    "2025-08-09T12:00:00+00:00",
                    "2025-08-09T13:00:00+00:00",
                )),
        );

        let found = ReservationService::get(&mock, &id.to_string()).await.unwrap();

        assert_eq!(found.map(|r| r.id), Some(id));
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn get_missing_is_none_and_error_is_error() {
        let mock = MockConn::new();
        mock.expect(Expect::query_one("FROM reservations WHERE id = $1"))
            .expect(Expect::query_one("FROM reservations WHERE id = $1").returning_error("test error"));

        let missing = ReservationService::get(&mock, &Uuid::new_v4().to_string()).await;
        let failed = ReservationService::get(&mock, &Uuid::new_v4().to_string()).await;

        assert!(matches!(missing, Ok(None)));
        assert!(matches!(failed, Err(AppError::Db(_))));
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn create_binds_enums_as_labels() {
        let id = Uuid::new_v4();
        let r = new_reservation();
        let mock = MockConn::new();
        mock.expect(
            Expect::query_one("INSERT INTO reservations")
                .with_args(vec![
                    PgBindValue::from("tunnel"),
                    PgBindValue::from(1),
                    PgBindValue::Uuid(None),
                    PgBindValue::from("John"),
                    PgBindValue::from("Doe"),
                    PgBindValue::from("1112223333"),
                    PgBindValue::Text(None),
                    PgBindValue::from(r.start_time),
                    PgBindValue::from(60),
                    PgBindValue::from(r.end_time),
                    PgBindValue::from("confirmed"),
                    PgBindValue::Text(None),
                ])
                .returning_row(reservation_row(
                    id,
                    1,
                    "2025-08-09T12:00:00+00:00",
                    "2025-08-09T13:00:00+00:00",
                )),
        );

        let stored = ReservationService::create(&mock, &r).await.unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.start_time, r.start_time);
        assert_eq!(stored.status, ReservationStatus::Confirmed);
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn create_surfaces_db_error() {
        let mock = MockConn::new();
        mock.expect(Expect::query_one("INSERT INTO reservations").returning_error("test error"));

        assert!(ReservationService::create(&mock, &new_reservation()).await.is_err());
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn update_keeps_absent_fields_null() {
        let id = Uuid::new_v4();
        let mock = MockConn::new();
        mock.expect(
            Expect::query_one("status = COALESCE($12::reservation_status, status)")
                .with_args(vec![
                    PgBindValue::from(id),
                    PgBindValue::Text(None),
                    PgBindValue::Int(None),
                    PgBindValue::Uuid(None),
                    PgBindValue::Text(None),
                    PgBindValue::Text(None),
                    PgBindValue::Text(None),
                    PgBindValue::Text(None),
                    PgBindValue::Timestamp(None),
                    PgBindValue::Int(None),
                    PgBindValue::Timestamp(None),
                    PgBindValue::from("cancelled"),
                    PgBindValue::from("called to cancel"),
                ])
                .returning_row(reservation_row(
                    id,
                    1,
                    "2025-08-09T12:00:00+00:00",
                    "2025-08-09T13:00:00+00:00",
                )),
        );
        let updates = ReservationUpdates {
            status: Some(ReservationStatus::Cancelled),
            notes: Some("called to cancel".into()),
            ..Default::default()
        };

        let updated = ReservationService::update(&mock, &id.to_string(), &updates)
            .await
            .unwrap();

        assert!(updated.is_some());
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn update_missing_row_is_none() {
        let mock = MockConn::new();
        mock.expect(Expect::query_one("UPDATE reservations"));

        let updated = ReservationService::update(
            &mock,
            &Uuid::new_v4().to_string(),
            &ReservationUpdates::default(),
        )
        .await
        .unwrap();

        assert!(updated.is_none());
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn update_surfaces_db_error() {
        let mock = MockConn::new();
        mock.expect(Expect::query_one("UPDATE reservations").returning_error("test error"));

        let result = ReservationService::update(
            &mock,
            &Uuid::new_v4().to_string(),
            &ReservationUpdates::default(),
        )
        .await;

        assert!(result.is_err());
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn delete_counts_rows() {
        let id = Uuid::new_v4();
        let mock = MockConn::new();
        mock.expect(
            Expect::execute("DELETE FROM reservations WHERE id = $1")
                .with_args(vec![PgBindValue::from(id)])
                .returning_affected(1),
        )
        .expect(Expect::execute("DELETE FROM reservations").returning_error("test error"));

        assert_eq!(ReservationService::delete(&mock, &id.to_string()).await.unwrap(), 1);
        assert!(ReservationService::delete(&mock, &id.to_string()).await.is_err());
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn search_without_tunnel() {
        let from = Utc.with_ymd_and_hms(2025, 8, 9, 11, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 8, 9, 13, 0, 0).unwrap();
        let mock = MockConn::new();
        mock.expect(
            Expect::query("WHERE start_time >= $1 AND start_time < $2 ORDER BY start_time ASC")
                .with_args(vec![PgBindValue::from(from), PgBindValue::from(to)])
                .returning_rows(vec![
                    reservation_row(Uuid::new_v4(), 1, "2025-08-09T12:00:00+00:00", "2025-08-09T13:00:00+00:00"),
                    reservation_row(Uuid::new_v4(), 2, "2025-08-09T12:30:00+00:00", "2025-08-09T13:30:00+00:00"),
                ]),
        );
        let window = SearchWindow { from, to, tunnel_id: None };

        let found = ReservationService::search(&mock, &window).await.unwrap();

        assert_eq!(found.len(), 2);
        assert!(found[0].start_time <= found[1].start_time);
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn search_with_tunnel_and_no_matches() {
        let from = Utc.with_ymd_and_hms(2025, 8, 9, 11, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 8, 9, 13, 0, 0).unwrap();
        let mock = MockConn::new();
        mock.expect(
            Expect::query("WHERE tunnel_id = $1 AND start_time >= $2 AND start_time < $3")
                .with_args(vec![
                    PgBindValue::from(4),
                    PgBindValue::from(from),
                    PgBindValue::from(to),
                ]),
        );
        let window = SearchWindow { from, to, tunnel_id: Some(4) };

        let found = ReservationService::search(&mock, &window).await.unwrap();

        assert!(found.is_empty());
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn search_surfaces_db_error() {
        let now = Utc::now();
        let mock = MockConn::new();
        mock.expect(Expect::query("FROM reservations").returning_error("test error"));
        let window = SearchWindow { from: now, to: now, tunnel_id: None };

        assert!(ReservationService::search(&mock, &window).await.is_err());
        mock.expectations_were_met().unwrap();
    }
}
