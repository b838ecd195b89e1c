//! Shared test helpers for `PostgreSQL` integration tests.

use configdb::{
    configs::config_migrations,
    migration::{adapters::postgres::PostgresMigrator, services::MigrationRunner},
};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Boxed error used by fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Pool type used by migrators and repositories under test.
pub type TestPool = Pool<ConnectionManager<PgConnection>>;

/// Database every test database is cloned from.
const EMPTY_TEMPLATE: &str = "template1";

/// Creates a tokio runtime for async operations in tests.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Empty database dropped when the guard goes out of scope.
///
/// Pools and connections opened against the database must be dropped before
/// the guard, so declare the guard first.
pub struct TestDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl TestDatabase {
    /// Creates an empty database named after `prefix`.
    pub fn create(cluster: &'static TestCluster, prefix: &str) -> Result<Self, BoxError> {
        let name = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), EMPTY_TEMPLATE)
            .map_err(|e| Box::new(e) as BoxError)?;
        Ok(Self { cluster, name })
    }

    /// Returns the connection URL of the database.
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }

    /// Opens a dedicated connection.
    pub fn connect(&self) -> Result<PgConnection, BoxError> {
        PgConnection::establish(&self.url()).map_err(|e| Box::new(e) as BoxError)
    }

    /// Builds a single-connection pool.
    pub fn pool(&self) -> Result<TestPool, BoxError> {
        let manager = ConnectionManager::<PgConnection>::new(self.url());
        Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| Box::new(e) as BoxError)
    }

    /// Builds a migrator running the configuration migrations.
    pub fn migrator(&self) -> Result<PostgresMigrator<DefaultClock>, BoxError> {
        let registry = config_migrations().map_err(|e| Box::new(e) as BoxError)?;
        let runner = MigrationRunner::new(Arc::new(registry), Arc::new(DefaultClock));
        Ok(PostgresMigrator::new(self.pool()?, runner))
    }

    /// Applies the configuration migrations.
    pub fn migrate(&self) -> Result<(), BoxError> {
        let migrator = self.migrator()?;
        test_runtime()
            .block_on(migrator.migrate())
            .map_err(|e| Box::new(e) as BoxError)?;
        Ok(())
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.name);
        }
    }
}

/// Returns whether `table` exists in the current schema.
pub fn table_exists(connection: &mut PgConnection, table: &str) -> bool {
    #[derive(QueryableByName)]
    struct Found {
        #[diesel(sql_type = diesel::sql_types::Bool)]
        found: bool,
    }

    diesel::sql_query(concat!(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables ",
        "WHERE table_schema = current_schema() AND table_name = $1) AS found",
    ))
    .bind::<diesel::sql_types::Text, _>(table)
    .get_result::<Found>(connection)
    .map(|row| row.found)
    .expect("table lookup")
}
