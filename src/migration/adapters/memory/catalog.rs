//! In-memory schema catalog for migration tests.

use crate::migration::{
    domain::{AppliedMigration, TableDefinition, TableShape},
    error::{MigrationError, MigrationResult},
    ports::{SchemaConnection, TransactionWork},
};
use std::collections::{BTreeMap, HashSet};
use std::io;

/// Schema catalog held in memory.
///
/// Mirrors the `PostgreSQL` behaviour the migration runner depends on:
/// create-if-absent leaves existing tables untouched, foreign keys require
/// their referenced table, history versions are unique, and a failed
/// transaction restores the previous catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaCatalog {
    state: CatalogState,
    failing_tables: HashSet<String>,
    disconnected: bool,
}

#[derive(Debug, Clone, Default)]
struct CatalogState {
    tables: BTreeMap<String, TableShape>,
    history: Option<Vec<AppliedMigration>>,
    created: Vec<String>,
}

impl InMemorySchemaCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a pre-existing table.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, shape: TableShape) -> Self {
        self.state.tables.insert(name.into(), shape);
        self
    }

    /// Seeds history records, creating the history table.
    #[must_use]
    pub fn with_history(mut self, records: impl IntoIterator<Item = AppliedMigration>) -> Self {
        let history = self.state.history.get_or_insert_with(Vec::new);
        history.extend(records);
        history.sort_by(|left, right| left.version.cmp(&right.version));
        self
    }

    /// Makes creation of `table` fail with a database error.
    #[must_use]
    pub fn failing_on_create(mut self, table: impl Into<String>) -> Self {
        self.failing_tables.insert(table.into());
        self
    }

    /// Makes every operation fail as if the connection were lost.
    #[must_use]
    pub const fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    /// Returns the shape of a table, if present.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableShape> {
        self.state.tables.get(name)
    }

    /// Returns the names of tables in the catalog.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.state.tables.keys().map(String::as_str)
    }

    /// Returns the tables created through this catalog, in creation order.
    #[must_use]
    pub fn created_tables(&self) -> &[String] {
        &self.state.created
    }

    /// Returns the recorded history in ascending version order, or an empty
    /// slice when the history table does not exist.
    #[must_use]
    pub fn history(&self) -> &[AppliedMigration] {
        self.state.history.as_deref().unwrap_or_default()
    }

    /// Returns whether the history table has been created.
    #[must_use]
    pub const fn has_history(&self) -> bool {
        self.state.history.is_some()
    }

    fn check_connected(&self) -> MigrationResult<()> {
        if self.disconnected {
            return Err(MigrationError::database(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection closed",
            )));
        }
        Ok(())
    }
}

impl SchemaConnection for InMemorySchemaCatalog {
    fn create_table_if_not_exists(&mut self, table: &TableDefinition) -> MigrationResult<()> {
        self.check_connected()?;
        if self.state.tables.contains_key(table.name()) {
            return Ok(());
        }
        if self.failing_tables.contains(table.name()) {
            return Err(MigrationError::database(io::Error::other(format!(
                "permission denied to create table \"{}\"",
                table.name()
            ))));
        }
        if let Some(missing) = table
            .foreign_keys()
            .map(|foreign_key| foreign_key.referenced_table())
            .find(|referenced| {
                *referenced != table.name() && !self.state.tables.contains_key(*referenced)
            })
        {
            return Err(MigrationError::database(io::Error::other(format!(
                "relation \"{missing}\" does not exist"
            ))));
        }

        self.state
            .tables
            .insert(table.name().to_owned(), table.shape());
        self.state.created.push(table.name().to_owned());
        Ok(())
    }

    fn describe_table(&mut self, name: &str) -> MigrationResult<Option<TableShape>> {
        self.check_connected()?;
        Ok(self.state.tables.get(name).cloned())
    }

    fn ensure_history_table(&mut self) -> MigrationResult<()> {
        self.check_connected()?;
        self.state.history.get_or_insert_with(Vec::new);
        Ok(())
    }

    fn has_history_table(&mut self) -> MigrationResult<bool> {
        self.check_connected()?;
        Ok(self.state.history.is_some())
    }

    fn applied_migrations(&mut self) -> MigrationResult<Vec<AppliedMigration>> {
        self.check_connected()?;
        self.state.history.clone().ok_or_else(|| {
            MigrationError::database(io::Error::other(
                "relation \"schema_migration_history\" does not exist",
            ))
        })
    }

    fn record_applied(&mut self, applied: &AppliedMigration) -> MigrationResult<()> {
        self.check_connected()?;
        let history = self.state.history.as_mut().ok_or_else(|| {
            MigrationError::database(io::Error::other(
                "relation \"schema_migration_history\" does not exist",
            ))
        })?;
        if history.iter().any(|record| record.version == applied.version) {
            return Err(MigrationError::database(io::Error::other(format!(
                "duplicate key value violates unique constraint: version {}",
                applied.version
            ))));
        }
        let position = history.partition_point(|record| record.version < applied.version);
        history.insert(position, applied.clone());
        Ok(())
    }

    fn run_in_transaction(&mut self, work: &mut TransactionWork<'_>) -> MigrationResult<()> {
        self.check_connected()?;
        let snapshot = self.state.clone();
        let connection: &mut dyn SchemaConnection = self;
        let result = work(connection);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }
}
