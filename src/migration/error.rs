//! Error types for applying schema migrations.

use crate::migration::domain::{MigrationDomainError, MigrationVersion};
use std::sync::Arc;
use thiserror::Error;

/// Result type for migration operations.
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Errors raised while applying or validating schema migrations.
#[derive(Debug, Clone, Error)]
pub enum MigrationError {
    /// A domain value could not be constructed.
    #[error(transparent)]
    Domain(#[from] MigrationDomainError),

    /// The database rejected a statement or the connection failed.
    #[error("database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),

    /// A table exists with a definition incompatible with the expected one.
    #[error("table '{table}' conflicts with the expected definition: {reason}")]
    SchemaConflict {
        /// Conflicting table.
        table: String,
        /// Description of the incompatibility.
        reason: String,
    },

    /// A table was created before the table its foreign key references.
    #[error("table '{table}' references table '{referenced}', which does not exist")]
    ForeignKeyTargetMissing {
        /// Table declaring the foreign key.
        table: String,
        /// Missing referenced table.
        referenced: String,
    },

    /// Two registered migrations share a version.
    #[error("duplicate migration version: {0}")]
    DuplicateVersion(MigrationVersion),

    /// A pending migration is older than the latest applied one.
    #[error("migration {version} is pending but older than applied migration {latest}")]
    OutOfOrder {
        /// Pending migration version.
        version: MigrationVersion,
        /// Latest applied version.
        latest: MigrationVersion,
    },

    /// The history records a migration that is not registered.
    #[error("applied migration {0} is not registered")]
    UnknownAppliedMigration(MigrationVersion),

    /// The recorded checksum differs from the registered migration.
    #[error("checksum mismatch for migration {version}: recorded {recorded}, registered {registered}")]
    ChecksumMismatch {
        /// Migration version.
        version: MigrationVersion,
        /// Checksum stored in the history table.
        recorded: String,
        /// Checksum of the registered migration.
        registered: String,
    },

    /// A migration failed and its transaction was rolled back.
    #[error("migration {version} ({description}) failed: {source}")]
    Failed {
        /// Version of the failed migration.
        version: MigrationVersion,
        /// Description of the failed migration.
        description: String,
        /// Underlying failure.
        #[source]
        source: Box<MigrationError>,
    },
}

impl MigrationError {
    /// Wraps a database-layer error.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }
}
