//! Load `AppConfig` from the process environment (after `.env`, if any).

use crate::error::ConfigError;
use axum::http::HeaderValue;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DB_HOST: &str = "db";
pub const DB_PORT: u16 = 5432;
pub const DB_NAME: &str = "the-diamond-scheduler";

const DEFAULT_MIGRATIONS_DIR: &str = "db/migrations";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origin: HeaderValue,
    pub postgres_user: String,
    pub postgres_password: String,
    pub migrations_dir: PathBuf,
    pub db_max_connections: u32,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = parse::<u16>("PORT", &required("PORT")?)?;
        let cors_origin = required("CORS_ORIGIN")?;
        let cors_origin = HeaderValue::from_str(&cors_origin).map_err(|e| ConfigError::Invalid {
            var: "CORS_ORIGIN",
            reason: e.to_string(),
        })?;
        let postgres_user = required("POSTGRES_USER")?;
        let postgres_password = required("POSTGRES_PASSWORD")?;

        let migrations_dir = get("MIGRATIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MIGRATIONS_DIR));
        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => parse::<u32>("DB_MAX_CONNECTIONS", &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse::<u64>("REQUEST_TIMEOUT_SECS", &v)?),
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(AppConfig {
            port,
            cors_origin,
            postgres_user,
            postgres_password,
            migrations_dir,
            db_max_connections,
            request_timeout,
        })
    }

    /// `postgres://{user}:{password}@db:5432/the-diamond-scheduler?sslmode=disable`
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(DB_HOST)
            .port(DB_PORT)
            .username(&self.postgres_user)
            .password(&self.postgres_password)
            .database(DB_NAME)
            .ssl_mode(PgSslMode::Disable)
    }

    /// Connection target for logs, password elided.
    pub fn database_target(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}?sslmode=disable",
            self.postgres_user, DB_HOST, DB_PORT, DB_NAME
        )
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: format!("'{}': {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("PORT", "8080"),
        ("CORS_ORIGIN", "http://localhost:5173"),
        ("POSTGRES_USER", "diamond"),
        ("POSTGRES_PASSWORD", "s3cret"),
    ];

    #[test]
    fn loads_required_values_and_defaults() {
        let cfg = AppConfig::from_lookup(env(&REQUIRED)).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.cors_origin, "http://localhost:5173");
        assert_eq!(cfg.migrations_dir, PathBuf::from("db/migrations"));
        assert_eq!(cfg.db_max_connections, 5);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(
            cfg.database_target(),
            "postgres://diamond:***@db:5432/the-diamond-scheduler?sslmode=disable"
        );
    }

    #[test]
    fn names_the_missing_variable() {
        for (skip, _) in REQUIRED {
            let pairs: Vec<(&str, &str)> =
                REQUIRED.iter().copied().filter(|(k, _)| *k != skip).collect();
            match AppConfig::from_lookup(env(&pairs)) {
                Err(ConfigError::Missing(var)) => assert_eq!(var, skip),
                other => panic!("expected Missing({}), got {:?}", skip, other),
            }
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("CORS_ORIGIN", "  ");
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(ConfigError::Missing("CORS_ORIGIN"))
        ));
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("PORT", "eighty");
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("REQUEST_TIMEOUT_SECS", "-1"));
        assert!(matches!(
            AppConfig::from_lookup(env(&pairs)),
            Err(ConfigError::Invalid { var: "REQUEST_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn optional_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MIGRATIONS_DIR", "/srv/migrations"));
        pairs.push(("DB_MAX_CONNECTIONS", "12"));
        pairs.push(("REQUEST_TIMEOUT_SECS", "5"));
        let cfg = AppConfig::from_lookup(env(&pairs)).unwrap();
        assert_eq!(cfg.migrations_dir, PathBuf::from("/srv/migrations"));
        assert_eq!(cfg.db_max_connections, 12);
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
    }
}
