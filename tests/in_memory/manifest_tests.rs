//! Publishing and activating manifest versions with the in-memory repository.

use configdb::manifest::{
    adapters::memory::InMemoryManifestRepository,
    domain::{
        ActiveDeclarativeManifest, ActorDefinitionId, DeclarativeManifest, ManifestContent,
        ManifestDescription, ManifestVersion,
    },
    ports::{DeclarativeManifestRepository, ManifestRepositoryError},
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

fn version(value: u64) -> ManifestVersion {
    ManifestVersion::new(value).expect("valid version")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publish_then_activate_version() {
    let repository = InMemoryManifestRepository::new();
    let actor = ActorDefinitionId::new();
    let manifest = DeclarativeManifest::new(
        actor,
        version(1),
        ManifestDescription::new("d").expect("valid description"),
        ManifestContent::new(json!({}), json!({})).expect("valid content"),
        &DefaultClock,
    );
    repository
        .store_manifest(&manifest)
        .await
        .expect("store manifest");

    let active = ActiveDeclarativeManifest::new(actor, version(1), &DefaultClock);
    repository
        .store_active(&active)
        .await
        .expect("store active");

    let again = ActiveDeclarativeManifest::new(actor, version(1), &DefaultClock);
    let result = repository.store_active(&again).await;

    assert!(matches!(
        result,
        Err(ManifestRepositoryError::ActiveManifestExists(owner)) if owner == actor
    ));
    let found = repository.find_active(actor).await.expect("find active");
    assert_eq!(found.map(|row| row.id()), Some(active.id()));
}
