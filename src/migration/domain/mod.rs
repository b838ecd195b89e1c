//! Domain model for versioned schema migrations.
//!
//! Migration domain types describe what a step creates and how versions are
//! ordered, without touching any database.

mod applied;
mod checksum;
mod error;
mod table;
mod version;

pub use applied::AppliedMigration;
pub use checksum::checksum_tables;
pub use error::MigrationDomainError;
pub use table::{
    ColumnDefault, ColumnDefinition, ColumnShape, ColumnType, ForeignKey, ForeignKeyShape,
    TableConstraint, TableDefinition, TableDefinitionBuilder, TableShape,
};
pub use version::MigrationVersion;
