//! Resource routes under `/api`.
//! `/reservations/search` is declared before `/reservations/:id`; the router
//! prefers the static segment either way.

use crate::handlers::{coaches, reservations, tunnels};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/tunnels", get(tunnels::list))
        .route("/tunnels/:id", get(tunnels::read))
        .route(
            "/reservations",
            get(reservations::list).post(reservations::create),
        )
        .route("/reservations/search", get(reservations::search))
        .route(
            "/reservations/:id",
            get(reservations::read)
                .put(reservations::update)
                .delete(reservations::delete),
        )
        .route("/coaches", get(coaches::list).post(coaches::create))
        .route(
            "/coaches/:id",
            get(coaches::read)
                .put(coaches::update)
                .delete(coaches::delete),
        )
}
