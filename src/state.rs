//! Shared application state for all routes.

use crate::db::DbConn;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// One pool shared by every in-flight request; tests swap in `MockConn`.
    pub db: Arc<dyn DbConn>,
}

impl AppState {
    pub fn new(db: Arc<dyn DbConn>) -> Self {
        AppState { db }
    }
}
