//! Given steps for declarative manifest BDD scenarios.

use super::world::{ManifestWorld, run_async};
use configdb::{
    manifest::{
        domain::{DeclarativeManifest, ManifestContent, ManifestDescription, ManifestVersion},
        ports::DeclarativeManifestRepository,
    },
    migration::adapters::memory::InMemorySchemaCatalog,
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use serde_json::json;

#[given("an empty configuration database")]
fn empty_database(world: &mut ManifestWorld) {
    world.catalog = InMemorySchemaCatalog::new();
}

#[given(r#"manifest version {version:u64} is published for actor definition "{actor}""#)]
fn manifest_published(
    world: &mut ManifestWorld,
    version: u64,
    actor: String,
) -> Result<(), eyre::Report> {
    let actor_definition_id = world.actor(&actor);
    let manifest = DeclarativeManifest::new(
        actor_definition_id,
        ManifestVersion::new(version).wrap_err("construct manifest version")?,
        ManifestDescription::new("d").wrap_err("construct description")?,
        ManifestContent::new(json!({}), json!({})).wrap_err("construct content")?,
        &DefaultClock,
    );
    run_async(world.repository.store_manifest(&manifest)).wrap_err("publish manifest")?;
    Ok(())
}
