use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Member of the `coach_specialty` database enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Hitting,
    Pitching,
    Fielding,
    Catching,
}

impl Specialty {
    pub const ALL: [Specialty; 4] = [
        Specialty::Hitting,
        Specialty::Pitching,
        Specialty::Fielding,
        Specialty::Catching,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Specialty::Hitting => "hitting",
            Specialty::Pitching => "pitching",
            Specialty::Fielding => "fielding",
            Specialty::Catching => "catching",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialty::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown coach specialty '{}'", s))
    }
}

/// Text array bound as `$n::coach_specialty[]`. Duplicates are dropped, first occurrence wins.
pub fn specialty_labels(specialties: &[Specialty]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(specialties.len());
    for s in specialties {
        let label = s.as_str();
        if !out.iter().any(|seen| seen == label) {
            out.push(label.to_string());
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub is_active: bool,
    #[serde(default)]
    pub specialties: Vec<Specialty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST body. Server-owned fields (id, is_active, timestamps) are not accepted.
#[derive(Clone, Debug, Deserialize)]
pub struct NewCoach {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialties: Vec<Specialty>,
}

/// PUT body. Absent and `null` both mean "keep the stored value".
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CoachUpdates {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub specialties: Option<Vec<Specialty>>,
}
