//! Schema step adding the declarative manifest tables.
//!
//! `declarative_manifest` stores every published version of a connector's
//! declarative manifest, keyed by `(actor_definition_id, version)`.
//! `active_declarative_manifest` points each actor definition at the single
//! version currently in use, through a composite foreign key and a unique
//! `actor_definition_id`.

use crate::migration::{
    domain::{
        ColumnDefault, ColumnDefinition, ColumnType, MigrationDomainError, MigrationVersion,
        TableDefinition, checksum_tables,
    },
    error::MigrationResult,
    ports::{Migration, SchemaConnection},
    services::ensure_table,
};

/// Table holding versioned declarative manifests.
pub const DECLARATIVE_MANIFEST_TABLE: &str = "declarative_manifest";

/// Table pointing each actor definition at its active manifest version.
pub const ACTIVE_DECLARATIVE_MANIFEST_TABLE: &str = "active_declarative_manifest";

/// Version tag of this schema step.
pub const VERSION: &str = "0.41.00.002";

/// Maximum length of a manifest description.
pub const DESCRIPTION_MAX_LENGTH: u32 = 256;

/// Returns the definition of `declarative_manifest`.
///
/// # Errors
///
/// Returns [`MigrationDomainError::InvalidTableDefinition`] if the
/// definition fails validation.
pub fn declarative_manifest_table() -> Result<TableDefinition, MigrationDomainError> {
    TableDefinition::builder(DECLARATIVE_MANIFEST_TABLE)
        .column(ColumnDefinition::required(
            "actor_definition_id",
            ColumnType::Uuid,
        ))
        .column(ColumnDefinition::required(
            "description",
            ColumnType::Varchar(DESCRIPTION_MAX_LENGTH),
        ))
        .column(ColumnDefinition::required("manifest", ColumnType::Jsonb))
        .column(ColumnDefinition::required("spec", ColumnType::Jsonb))
        .column(ColumnDefinition::required("version", ColumnType::BigInt))
        .column(
            ColumnDefinition::required("created_at", ColumnType::TimestampTz)
                .with_default(ColumnDefault::CurrentTimestamp),
        )
        .primary_key(["actor_definition_id", "version"])
        .build()
}

/// Returns the definition of `active_declarative_manifest`.
///
/// # Errors
///
/// Returns [`MigrationDomainError::InvalidTableDefinition`] if the
/// definition fails validation.
pub fn active_declarative_manifest_table() -> Result<TableDefinition, MigrationDomainError> {
    TableDefinition::builder(ACTIVE_DECLARATIVE_MANIFEST_TABLE)
        .column(ColumnDefinition::required("id", ColumnType::Uuid))
        .column(ColumnDefinition::required(
            "actor_definition_id",
            ColumnType::Uuid,
        ))
        .column(ColumnDefinition::required("version", ColumnType::BigInt))
        .column(
            ColumnDefinition::required("created_at", ColumnType::TimestampTz)
                .with_default(ColumnDefault::CurrentTimestamp),
        )
        .column(
            ColumnDefinition::required("updated_at", ColumnType::TimestampTz)
                .with_default(ColumnDefault::CurrentTimestamp),
        )
        .primary_key(["id"])
        .foreign_key(
            ["actor_definition_id", "version"],
            DECLARATIVE_MANIFEST_TABLE,
            ["actor_definition_id", "version"],
        )
        .unique(["actor_definition_id"])
        .build()
}

/// Ensures `declarative_manifest` exists.
///
/// # Errors
///
/// Returns [`MigrationError::SchemaConflict`](crate::migration::error::MigrationError::SchemaConflict)
/// when an incompatible table already exists, and connection errors
/// unchanged.
pub fn ensure_declarative_manifest_table(
    connection: &mut dyn SchemaConnection,
) -> MigrationResult<()> {
    ensure_table(connection, &declarative_manifest_table()?)
}

/// Ensures `active_declarative_manifest` exists.
///
/// Must run after [`ensure_declarative_manifest_table`].
///
/// # Errors
///
/// Returns [`MigrationError::ForeignKeyTargetMissing`](crate::migration::error::MigrationError::ForeignKeyTargetMissing)
/// when `declarative_manifest` does not exist yet, plus the errors of
/// [`ensure_declarative_manifest_table`].
pub fn ensure_active_declarative_manifest_table(
    connection: &mut dyn SchemaConnection,
) -> MigrationResult<()> {
    ensure_table(connection, &active_declarative_manifest_table()?)
}

/// Ensures both tables exist, in dependency order, in one transaction.
///
/// # Errors
///
/// Returns the first error raised by either table; the transaction is then
/// rolled back.
pub fn apply_schema_upgrade(connection: &mut dyn SchemaConnection) -> MigrationResult<()> {
    connection.run_in_transaction(&mut |transaction| {
        ensure_declarative_manifest_table(transaction)?;
        ensure_active_declarative_manifest_table(transaction)
    })
}

/// Registered migration adding the declarative manifest tables.
#[derive(Debug, Clone)]
pub struct AddDeclarativeManifestTables {
    version: MigrationVersion,
    tables: [TableDefinition; 2],
}

impl AddDeclarativeManifestTables {
    /// Creates the migration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationDomainError`] if the version or a table definition
    /// fails validation.
    pub fn new() -> Result<Self, MigrationDomainError> {
        Ok(Self {
            version: MigrationVersion::parse(VERSION)?,
            tables: [
                declarative_manifest_table()?,
                active_declarative_manifest_table()?,
            ],
        })
    }

    /// Returns the table definitions in creation order.
    #[must_use]
    pub const fn tables(&self) -> &[TableDefinition; 2] {
        &self.tables
    }
}

impl Migration for AddDeclarativeManifestTables {
    fn version(&self) -> &MigrationVersion {
        &self.version
    }

    fn description(&self) -> &str {
        "Add declarative manifest tables"
    }

    fn checksum(&self) -> Option<String> {
        Some(checksum_tables(&self.tables))
    }

    fn apply(&self, connection: &mut dyn SchemaConnection) -> MigrationResult<()> {
        for table in &self.tables {
            ensure_table(connection, table)?;
        }
        Ok(())
    }
}
