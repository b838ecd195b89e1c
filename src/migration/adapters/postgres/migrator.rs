//! Pool-backed migration entry point for `PostgreSQL`.

use crate::migration::{
    error::{MigrationError, MigrationResult},
    services::{MigrationInfo, MigrationReport, MigrationRunner},
};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// `PostgreSQL` connection pool type used by migration adapters.
pub type MigrationPgPool = Pool<ConnectionManager<PgConnection>>;

/// Advisory lock key held while a runner works on a database.
const MIGRATION_LOCK_KEY: i64 = 0x636f_6e66_6967_6462;

/// Runs migrations on a pooled connection.
///
/// Runners sharing a database are serialised through a session-level
/// advisory lock, released whether the run succeeds or fails.
pub struct PostgresMigrator<C>
where
    C: Clock + Send + Sync + 'static,
{
    pool: MigrationPgPool,
    runner: Arc<MigrationRunner<C>>,
}

impl<C> PostgresMigrator<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a migrator from a pool and a configured runner.
    #[must_use]
    pub fn new(pool: MigrationPgPool, runner: MigrationRunner<C>) -> Self {
        Self {
            pool,
            runner: Arc::new(runner),
        }
    }

    /// Applies every pending migration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Database`] when no connection can be
    /// obtained, and any error raised by [`MigrationRunner::migrate`].
    pub async fn migrate(&self) -> MigrationResult<MigrationReport> {
        self.run_blocking(|connection, runner| runner.migrate(connection))
            .await
    }

    /// Reports the state of every known migration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Database`] when the history cannot be read.
    pub async fn info(&self) -> MigrationResult<Vec<MigrationInfo>> {
        self.run_blocking(|connection, runner| runner.info(connection))
            .await
    }

    /// Validates the recorded history against the registry.
    ///
    /// # Errors
    ///
    /// Returns any error raised by [`MigrationRunner::validate`].
    pub async fn validate(&self) -> MigrationResult<()> {
        self.run_blocking(|connection, runner| runner.validate(connection))
            .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> MigrationResult<T>
    where
        F: FnOnce(&mut PgConnection, &MigrationRunner<C>) -> MigrationResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        let runner = Arc::clone(&self.runner);
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MigrationError::database)?;
            with_migration_lock(&mut connection, |locked| f(locked, runner.as_ref()))
        })
        .await
        .map_err(MigrationError::database)?
    }
}

fn with_migration_lock<T>(
    connection: &mut PgConnection,
    f: impl FnOnce(&mut PgConnection) -> MigrationResult<T>,
) -> MigrationResult<T> {
    diesel::sql_query("SELECT pg_advisory_lock($1)")
        .bind::<diesel::sql_types::BigInt, _>(MIGRATION_LOCK_KEY)
        .execute(connection)?;
    debug!("acquired migration lock");

    let result = f(connection);
    let released = diesel::sql_query("SELECT pg_advisory_unlock($1)")
        .bind::<diesel::sql_types::BigInt, _>(MIGRATION_LOCK_KEY)
        .execute(connection);

    let value = result?;
    released?;
    Ok(value)
}
