//! Schema migrations of the configuration database.
//!
//! [`config_migrations`] returns the registry applied to a configuration
//! database, in version order.

pub mod declarative_manifest;

use crate::migration::{error::MigrationResult, services::MigrationRegistry};
use declarative_manifest::AddDeclarativeManifestTables;

/// Returns every configuration database migration.
///
/// # Errors
///
/// Returns an error if a migration fails to construct or two migrations
/// share a version.
pub fn config_migrations() -> MigrationResult<MigrationRegistry> {
    let mut registry = MigrationRegistry::new();
    registry.register(AddDeclarativeManifestTables::new()?)?;
    Ok(registry)
}
