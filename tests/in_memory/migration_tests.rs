//! Configuration migrations applied to the in-memory schema catalog.

use configdb::{
    configs::{
        config_migrations,
        declarative_manifest::{ACTIVE_DECLARATIVE_MANIFEST_TABLE, DECLARATIVE_MANIFEST_TABLE},
    },
    migration::{
        adapters::memory::InMemorySchemaCatalog,
        error::MigrationError,
        services::{MigrationRunner, MigrationState},
    },
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn runner() -> MigrationRunner<DefaultClock> {
    let registry = config_migrations().expect("registry");
    MigrationRunner::new(Arc::new(registry), Arc::new(DefaultClock))
}

#[rstest]
fn configuration_migrations_create_both_tables(runner: MigrationRunner<DefaultClock>) {
    let mut catalog = InMemorySchemaCatalog::new();

    let report = runner.migrate(&mut catalog).expect("migrate");

    assert_eq!(
        catalog.created_tables(),
        [DECLARATIVE_MANIFEST_TABLE, ACTIVE_DECLARATIVE_MANIFEST_TABLE]
    );
    assert_eq!(report.applied.len(), 1);
    let record = catalog.history().first().expect("history record");
    assert_eq!(record.version.as_str(), "0.41.00.002");
    assert_eq!(record.description, "Add declarative manifest tables");
}

#[rstest]
fn rerunning_configuration_migrations_is_a_noop(runner: MigrationRunner<DefaultClock>) {
    let mut catalog = InMemorySchemaCatalog::new();
    runner.migrate(&mut catalog).expect("first run");

    let report = runner.migrate(&mut catalog).expect("second run");
    let info = runner.info(&mut catalog).expect("info");

    assert!(report.is_noop());
    assert_eq!(catalog.created_tables().len(), 2);
    assert!(info.iter().all(|entry| entry.state == MigrationState::Applied));
}

#[rstest]
fn failing_migration_leaves_no_trace(runner: MigrationRunner<DefaultClock>) {
    let mut catalog =
        InMemorySchemaCatalog::new().failing_on_create(ACTIVE_DECLARATIVE_MANIFEST_TABLE);

    let result = runner.migrate(&mut catalog);

    assert!(
        matches!(result, Err(MigrationError::Failed { .. })),
        "unexpected result: {result:?}"
    );
    assert!(catalog.history().is_empty());
    assert!(catalog.table(DECLARATIVE_MANIFEST_TABLE).is_none());
}
