//! Then steps for declarative manifest BDD scenarios.

use super::world::ManifestWorld;
use configdb::{
    configs::declarative_manifest::{
        ACTIVE_DECLARATIVE_MANIFEST_TABLE, DECLARATIVE_MANIFEST_TABLE, VERSION,
    },
    manifest::ports::ManifestRepositoryError,
};
use rstest_bdd_macros::then;

fn activation(
    world: &ManifestWorld,
    ordinal: usize,
) -> Result<&Result<(), ManifestRepositoryError>, eyre::Report> {
    ordinal
        .checked_sub(1)
        .and_then(|index| world.activations.get(index))
        .ok_or_else(|| eyre::eyre!("missing activation {ordinal} in scenario world"))
}

#[then("the declarative manifest tables exist")]
fn tables_exist(world: &ManifestWorld) -> Result<(), eyre::Report> {
    for table in [DECLARATIVE_MANIFEST_TABLE, ACTIVE_DECLARATIVE_MANIFEST_TABLE] {
        if world.catalog.table(table).is_none() {
            return Err(eyre::eyre!("expected table {table} to exist"));
        }
    }
    Ok(())
}

#[then("the declarative manifest migration is recorded once")]
fn migration_recorded_once(world: &ManifestWorld) -> Result<(), eyre::Report> {
    let recorded = world
        .catalog
        .history()
        .iter()
        .filter(|record| record.version.as_str() == VERSION)
        .count();
    if recorded != 1 {
        return Err(eyre::eyre!("expected one history record, found {recorded}"));
    }
    Ok(())
}

#[then("activation {ordinal:usize} succeeds")]
fn activation_succeeds(world: &ManifestWorld, ordinal: usize) -> Result<(), eyre::Report> {
    activation(world, ordinal)?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected activation failure: {err}"))?;
    Ok(())
}

#[then("activation {ordinal:usize} fails because an active manifest already exists")]
fn activation_conflicts(world: &ManifestWorld, ordinal: usize) -> Result<(), eyre::Report> {
    let result = activation(world, ordinal)?;
    if !matches!(result, Err(ManifestRepositoryError::ActiveManifestExists(_))) {
        return Err(eyre::eyre!(
            "expected active manifest conflict, got {result:?}"
        ));
    }
    Ok(())
}

#[then("activation {ordinal:usize} fails because the manifest does not exist")]
fn activation_missing_manifest(world: &ManifestWorld, ordinal: usize) -> Result<(), eyre::Report> {
    let result = activation(world, ordinal)?;
    if !matches!(result, Err(ManifestRepositoryError::ManifestNotFound(_))) {
        return Err(eyre::eyre!(
            "expected missing manifest error, got {result:?}"
        ));
    }
    Ok(())
}
