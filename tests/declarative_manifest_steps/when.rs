//! When steps for declarative manifest BDD scenarios.

use super::world::{ManifestWorld, run_async};
use configdb::manifest::{
    domain::{ActiveDeclarativeManifest, ManifestVersion},
    ports::DeclarativeManifestRepository,
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::when;

#[when("the configuration migrations run twice")]
fn migrations_run_twice(world: &mut ManifestWorld) -> Result<(), eyre::Report> {
    let first = world.migrate().wrap_err("first migration run")?;
    let second = world.migrate().wrap_err("second migration run")?;
    if (first, second) != (1, 0) {
        return Err(eyre::eyre!(
            "expected one then zero applied migrations, got {first} then {second}"
        ));
    }
    Ok(())
}

#[when(r#"version {version:u64} is activated for actor definition "{actor}""#)]
fn version_activated(
    world: &mut ManifestWorld,
    version: u64,
    actor: String,
) -> Result<(), eyre::Report> {
    let actor_definition_id = world.actor(&actor);
    let active = ActiveDeclarativeManifest::new(
        actor_definition_id,
        ManifestVersion::new(version).wrap_err("construct manifest version")?,
        &DefaultClock,
    );
    let result = run_async(world.repository.store_active(&active));
    world.activations.push(result);
    Ok(())
}
