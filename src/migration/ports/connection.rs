//! Port for executing schema work against a database.

use crate::migration::{
    domain::{AppliedMigration, TableDefinition, TableShape},
    error::MigrationResult,
};

/// Unit of work passed to [`SchemaConnection::run_in_transaction`].
pub type TransactionWork<'a> = dyn FnMut(&mut dyn SchemaConnection) -> MigrationResult<()> + 'a;

/// Database operations needed by migration steps and the runner.
///
/// Implementations are driven from a single thread. A connection is borrowed
/// for the duration of a run and stays owned by the caller.
pub trait SchemaConnection {
    /// Creates the table unless a table with the same name already exists.
    ///
    /// An existing table is left untouched, whatever its definition.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Database`](crate::migration::error::MigrationError::Database)
    /// when the statement is rejected, including when a referenced table does
    /// not exist.
    fn create_table_if_not_exists(&mut self, table: &TableDefinition) -> MigrationResult<()>;

    /// Describes a table from the live catalog.
    ///
    /// Returns `None` when the table does not exist.
    fn describe_table(&mut self, name: &str) -> MigrationResult<Option<TableShape>>;

    /// Creates the migration history table if it is missing.
    fn ensure_history_table(&mut self) -> MigrationResult<()>;

    /// Returns whether the migration history table exists.
    fn has_history_table(&mut self) -> MigrationResult<bool>;

    /// Returns every recorded migration, in ascending version order.
    fn applied_migrations(&mut self) -> MigrationResult<Vec<AppliedMigration>>;

    /// Records a successfully applied migration.
    fn record_applied(&mut self, applied: &AppliedMigration) -> MigrationResult<()>;

    /// Runs `work` in a transaction.
    ///
    /// The transaction commits when `work` returns `Ok` and rolls back
    /// otherwise, leaving no partial schema or history changes behind.
    fn run_in_transaction(&mut self, work: &mut TransactionWork<'_>) -> MigrationResult<()>;
}
