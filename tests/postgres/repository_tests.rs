//! `PostgreSQL` manifest repository tests.

use crate::postgres::helpers::{TestDatabase, test_runtime};
use configdb::manifest::{
    adapters::postgres::PostgresManifestRepository,
    domain::{
        ActiveDeclarativeManifest, ActiveManifestId, ActorDefinitionId, DeclarativeManifest,
        ManifestContent, ManifestDescription, ManifestVersion,
    },
    ports::{DeclarativeManifestRepository, ManifestRepositoryError},
};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use serde_json::json;

fn setup(cluster: &'static TestCluster, prefix: &str) -> (TestDatabase, PostgresManifestRepository) {
    let db = TestDatabase::create(cluster, prefix).expect("database");
    db.migrate().expect("migrate");
    let repository = PostgresManifestRepository::new(db.pool().expect("pool"));
    (db, repository)
}

fn version(value: u64) -> ManifestVersion {
    ManifestVersion::new(value).expect("valid version")
}

fn manifest(actor: ActorDefinitionId, value: u64) -> DeclarativeManifest {
    DeclarativeManifest::new(
        actor,
        version(value),
        ManifestDescription::new(format!("version {value}")).expect("valid description"),
        ManifestContent::new(
            json!({"version": "0.29.0", "streams": [{"name": "users"}]}),
            json!({"connection_specification": {"type": "object"}}),
        )
        .expect("valid content"),
        &DefaultClock,
    )
}

#[rstest]
fn manifest_round_trips_through_postgres(shared_test_cluster: &'static TestCluster) {
    let (_db, repository) = setup(shared_test_cluster, "repo_round_trip");
    let rt = test_runtime();
    let stored = manifest(ActorDefinitionId::new(), 1);

    rt.block_on(repository.store_manifest(&stored))
        .expect("store manifest");
    let fetched = rt
        .block_on(repository.find_manifest(stored.key()))
        .expect("find manifest");

    assert_eq!(fetched, Some(stored));
}

#[rstest]
fn duplicate_manifest_maps_to_domain_error(shared_test_cluster: &'static TestCluster) {
    let (_db, repository) = setup(shared_test_cluster, "repo_duplicate");
    let rt = test_runtime();
    let actor = ActorDefinitionId::new();
    rt.block_on(repository.store_manifest(&manifest(actor, 1)))
        .expect("store manifest");

    let result = rt.block_on(repository.store_manifest(&manifest(actor, 1)));

    assert!(
        matches!(result, Err(ManifestRepositoryError::DuplicateManifestVersion(_))),
        "unexpected result: {result:?}"
    );
}

#[rstest]
fn versions_are_listed_in_ascending_order(shared_test_cluster: &'static TestCluster) {
    let (_db, repository) = setup(shared_test_cluster, "repo_versions");
    let rt = test_runtime();
    let actor = ActorDefinitionId::new();
    for value in [2, 10, 1] {
        rt.block_on(repository.store_manifest(&manifest(actor, value)))
            .expect("store manifest");
    }

    let versions = rt
        .block_on(repository.list_versions(actor))
        .expect("list versions");

    assert_eq!(versions, [version(1), version(2), version(10)]);
}

#[rstest]
fn active_manifest_constraints_map_to_domain_errors(shared_test_cluster: &'static TestCluster) {
    let (_db, repository) = setup(shared_test_cluster, "repo_active");
    let rt = test_runtime();
    let actor = ActorDefinitionId::new();
    let other_actor = ActorDefinitionId::new();
    for (owner, value) in [(actor, 1), (actor, 2), (other_actor, 1)] {
        rt.block_on(repository.store_manifest(&manifest(owner, value)))
            .expect("store manifest");
    }

    let missing = ActiveDeclarativeManifest::new(actor, version(3), &DefaultClock);
    let missing_result = rt.block_on(repository.store_active(&missing));
    assert!(
        matches!(missing_result, Err(ManifestRepositoryError::ManifestNotFound(key)) if key == missing.key()),
        "unexpected result: {missing_result:?}"
    );

    let id = ActiveManifestId::new();
    let active = ActiveDeclarativeManifest::with_id(id, actor, version(1), &DefaultClock);
    rt.block_on(repository.store_active(&active))
        .expect("store active");

    let second = ActiveDeclarativeManifest::new(actor, version(2), &DefaultClock);
    let second_result = rt.block_on(repository.store_active(&second));
    assert!(
        matches!(second_result, Err(ManifestRepositoryError::ActiveManifestExists(owner)) if owner == actor),
        "unexpected result: {second_result:?}"
    );

    let reused = ActiveDeclarativeManifest::with_id(id, other_actor, version(1), &DefaultClock);
    let reused_result = rt.block_on(repository.store_active(&reused));
    assert!(
        matches!(reused_result, Err(ManifestRepositoryError::DuplicateActiveId(duplicate)) if duplicate == id),
        "unexpected result: {reused_result:?}"
    );

    let found = rt
        .block_on(repository.find_active(actor))
        .expect("find active");
    assert_eq!(found, Some(active));
    assert_eq!(
        rt.block_on(repository.find_active(other_actor))
            .expect("find active"),
        None
    );
}
