use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A practice lane. Rows come from the seed migration and are read-only over HTTP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tunnel {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
