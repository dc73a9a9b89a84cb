//! HTTP handlers, one module per resource.

pub mod coaches;
pub mod health;
pub mod reservations;
pub mod tunnels;
