//! Diamond scheduler: HTTP+JSON backend for batting-cage tunnels, coaches and reservations.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use config::AppConfig;
pub use db::{DbConn, Expect, MockConn};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, Cors};
pub use service::{CoachService, ReservationService, TunnelService};
pub use state::AppState;
