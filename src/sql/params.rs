//! Positional query parameters that carry their PostgreSQL type even when null.

use chrono::{DateTime, Utc};
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};
use uuid::Uuid;

/// A value bound to `$n`. Each variant keeps its type so `NULL` parameters are
/// still typed on the wire (`COALESCE($2, first_name)` needs that).
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Bool(Option<bool>),
    Int(Option<i32>),
    Text(Option<String>),
    Uuid(Option<Uuid>),
    Timestamp(Option<DateTime<Utc>>),
    TextArray(Option<Vec<String>>),
}

impl PgBindValue {
    pub fn is_null(&self) -> bool {
        match self {
            PgBindValue::Bool(v) => v.is_none(),
            PgBindValue::Int(v) => v.is_none(),
            PgBindValue::Text(v) => v.is_none(),
            PgBindValue::Uuid(v) => v.is_none(),
            PgBindValue::Timestamp(v) => v.is_none(),
            PgBindValue::TextArray(v) => v.is_none(),
        }
    }
}

impl From<bool> for PgBindValue {
    fn from(v: bool) -> Self {
        PgBindValue::Bool(Some(v))
    }
}

impl From<Option<bool>> for PgBindValue {
    fn from(v: Option<bool>) -> Self {
        PgBindValue::Bool(v)
    }
}

impl From<i32> for PgBindValue {
    fn from(v: i32) -> Self {
        PgBindValue::Int(Some(v))
    }
}

impl From<Option<i32>> for PgBindValue {
    fn from(v: Option<i32>) -> Self {
        PgBindValue::Int(v)
    }
}

impl From<&str> for PgBindValue {
    fn from(v: &str) -> Self {
        PgBindValue::Text(Some(v.to_string()))
    }
}

impl From<String> for PgBindValue {
    fn from(v: String) -> Self {
        PgBindValue::Text(Some(v))
    }
}

impl From<Option<String>> for PgBindValue {
    fn from(v: Option<String>) -> Self {
        PgBindValue::Text(v)
    }
}

impl From<Uuid> for PgBindValue {
    fn from(v: Uuid) -> Self {
        PgBindValue::Uuid(Some(v))
    }
}

impl From<Option<Uuid>> for PgBindValue {
    fn from(v: Option<Uuid>) -> Self {
        PgBindValue::Uuid(v)
    }
}

impl From<DateTime<Utc>> for PgBindValue {
    fn from(v: DateTime<Utc>) -> Self {
        PgBindValue::Timestamp(Some(v))
    }
}

impl From<Option<DateTime<Utc>>> for PgBindValue {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        PgBindValue::Timestamp(v)
    }
}

impl From<Vec<String>> for PgBindValue {
    fn from(v: Vec<String>) -> Self {
        PgBindValue::TextArray(Some(v))
    }
}

impl From<Option<Vec<String>>> for PgBindValue {
    fn from(v: Option<Vec<String>>) -> Self {
        PgBindValue::TextArray(v)
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            PgBindValue::Bool(v) => <Option<bool> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::Int(v) => <Option<i32> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::Text(v) => <Option<String> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::Uuid(v) => <Option<Uuid> as Encode<Postgres>>::encode_by_ref(v, buf),
            PgBindValue::Timestamp(v) => {
                <Option<DateTime<Utc>> as Encode<Postgres>>::encode_by_ref(v, buf)
            }
            PgBindValue::TextArray(v) => {
                <Option<Vec<String>> as Encode<Postgres>>::encode_by_ref(v, buf)
            }
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::Int(_) => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::Text(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Uuid(_) => <Uuid as Type<Postgres>>::type_info(),
            PgBindValue::Timestamp(_) => <DateTime<Utc> as Type<Postgres>>::type_info(),
            PgBindValue::TextArray(_) => <Vec<String> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
