//! Constraint enforcement tests for the declarative manifest tables.

use crate::postgres::helpers::TestDatabase;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use uuid::Uuid;

fn insert_manifest(
    connection: &mut PgConnection,
    actor_definition_id: Uuid,
    version: i64,
) -> QueryResult<usize> {
    diesel::sql_query(concat!(
        "INSERT INTO declarative_manifest ",
        "(actor_definition_id, description, manifest, spec, version) ",
        "VALUES ($1, 'd', '{}'::jsonb, '{}'::jsonb, $2)",
    ))
    .bind::<diesel::sql_types::Uuid, _>(actor_definition_id)
    .bind::<diesel::sql_types::BigInt, _>(version)
    .execute(connection)
}

fn insert_active(
    connection: &mut PgConnection,
    id: Uuid,
    actor_definition_id: Uuid,
    version: i64,
) -> QueryResult<usize> {
    diesel::sql_query(
        "INSERT INTO active_declarative_manifest (id, actor_definition_id, version) \
         VALUES ($1, $2, $3)",
    )
    .bind::<diesel::sql_types::Uuid, _>(id)
    .bind::<diesel::sql_types::Uuid, _>(actor_definition_id)
    .bind::<diesel::sql_types::BigInt, _>(version)
    .execute(connection)
}

fn violation_kind(result: QueryResult<usize>) -> Option<DatabaseErrorKind> {
    match result {
        Err(DieselError::DatabaseError(kind, _)) => Some(kind),
        _ => None,
    }
}

fn migrated_connection(cluster: &'static TestCluster, prefix: &str) -> (TestDatabase, PgConnection) {
    let db = TestDatabase::create(cluster, prefix).expect("database");
    db.migrate().expect("migrate");
    let connection = db.connect().expect("connection");
    (db, connection)
}

#[rstest]
fn active_row_referencing_manifest_is_accepted(shared_test_cluster: &'static TestCluster) {
    let (_db, mut connection) = migrated_connection(shared_test_cluster, "fk_accept");
    let actor = Uuid::new_v4();

    insert_manifest(&mut connection, actor, 1).expect("insert manifest");
    insert_active(&mut connection, Uuid::new_v4(), actor, 1).expect("insert active");
}

#[rstest]
fn active_row_without_manifest_is_rejected(shared_test_cluster: &'static TestCluster) {
    let (_db, mut connection) = migrated_connection(shared_test_cluster, "fk_reject");
    let actor = Uuid::new_v4();
    insert_manifest(&mut connection, actor, 1).expect("insert manifest");

    let result = insert_active(&mut connection, Uuid::new_v4(), actor, 2);

    assert!(matches!(
        violation_kind(result),
        Some(DatabaseErrorKind::ForeignKeyViolation)
    ));
}

#[rstest]
fn second_active_row_for_actor_is_rejected(shared_test_cluster: &'static TestCluster) {
    let (_db, mut connection) = migrated_connection(shared_test_cluster, "unique_actor");
    let actor = Uuid::new_v4();
    insert_manifest(&mut connection, actor, 1).expect("insert manifest 1");
    insert_manifest(&mut connection, actor, 2).expect("insert manifest 2");
    insert_active(&mut connection, Uuid::new_v4(), actor, 1).expect("insert active");

    let result = insert_active(&mut connection, Uuid::new_v4(), actor, 2);

    assert!(matches!(
        violation_kind(result),
        Some(DatabaseErrorKind::UniqueViolation)
    ));
}

#[rstest]
fn second_active_row_for_same_version_is_rejected(shared_test_cluster: &'static TestCluster) {
    let (_db, mut connection) = migrated_connection(shared_test_cluster, "unique_same_version");
    let actor = Uuid::new_v4();
    insert_manifest(&mut connection, actor, 1).expect("insert manifest");
    insert_active(&mut connection, Uuid::new_v4(), actor, 1).expect("insert active");

    let result = insert_active(&mut connection, Uuid::new_v4(), actor, 1);

    assert!(matches!(
        violation_kind(result),
        Some(DatabaseErrorKind::UniqueViolation)
    ));
}

#[rstest]
fn manifest_versions_are_unique_per_actor(shared_test_cluster: &'static TestCluster) {
    let (_db, mut connection) = migrated_connection(shared_test_cluster, "manifest_pk");
    let actor = Uuid::new_v4();
    insert_manifest(&mut connection, actor, 1).expect("insert manifest");

    let duplicate = insert_manifest(&mut connection, actor, 1);
    insert_manifest(&mut connection, actor, 2).expect("next version");
    insert_manifest(&mut connection, Uuid::new_v4(), 1).expect("other actor");

    assert!(matches!(
        violation_kind(duplicate),
        Some(DatabaseErrorKind::UniqueViolation)
    ));
}
