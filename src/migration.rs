//! Forward-only schema migrations from versioned `.sql` files.
//! Applied versions are recorded in `_sqlx_migrations`, so reruns only apply new files.

use crate::error::AppError;
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use std::path::Path;

/// Apply every pending migration in `dir` (e.g. `db/migrations`), in version order.
pub async fn apply_migrations(pool: &PgPool, dir: &Path) -> Result<(), AppError> {
    let migrator = Migrator::new(dir).await.map_err(|e| {
        tracing::error!(dir = %dir.display(), error = %e, "could not read migrations");
        e
    })?;
    let known = migrator.iter().count();
    migrator.run(pool).await.map_err(|e| {
        tracing::error!(dir = %dir.display(), error = %e, "running migrations failed");
        e
    })?;
    tracing::info!(dir = %dir.display(), migrations = known, "migrations are up to date");
    Ok(())
}
