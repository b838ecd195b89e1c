//! Ordered registry of versioned schema migrations.

use crate::migration::{
    domain::MigrationVersion,
    error::{MigrationError, MigrationResult},
    ports::Migration,
};
use std::sync::Arc;

/// Migrations known to the application, kept in ascending version order.
#[derive(Clone, Default)]
pub struct MigrationRegistry {
    migrations: Vec<Arc<dyn Migration>>,
}

impl MigrationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a migration at the position given by its version.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::DuplicateVersion`] when a migration with an
    /// equal version is already registered.
    pub fn register(&mut self, migration: impl Migration + 'static) -> MigrationResult<()> {
        self.register_shared(Arc::new(migration))
    }

    /// Registers a shared migration handle.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::DuplicateVersion`] when a migration with an
    /// equal version is already registered.
    pub fn register_shared(&mut self, migration: Arc<dyn Migration>) -> MigrationResult<()> {
        let position = self
            .migrations
            .binary_search_by(|existing| existing.version().cmp(migration.version()));
        match position {
            Ok(_) => Err(MigrationError::DuplicateVersion(
                migration.version().clone(),
            )),
            Err(index) => {
                self.migrations.insert(index, migration);
                Ok(())
            }
        }
    }

    /// Returns the migration registered under `version`.
    #[must_use]
    pub fn get(&self, version: &MigrationVersion) -> Option<&Arc<dyn Migration>> {
        self.migrations
            .binary_search_by(|existing| existing.version().cmp(version))
            .ok()
            .and_then(|index| self.migrations.get(index))
    }

    /// Iterates migrations in ascending version order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Migration>> {
        self.migrations.iter()
    }

    /// Returns the highest registered version.
    #[must_use]
    pub fn latest_version(&self) -> Option<&MigrationVersion> {
        self.migrations.last().map(|migration| migration.version())
    }

    /// Returns the number of registered migrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Returns `true` when no migration is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

impl std::fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.migrations.iter().map(|migration| migration.version()))
            .finish()
    }
}
