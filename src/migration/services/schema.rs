//! Create-if-absent helpers shared by schema steps.

use crate::migration::{
    domain::TableDefinition,
    error::{MigrationError, MigrationResult},
    ports::SchemaConnection,
};
use tracing::{debug, info};

/// Ensures `table` exists and is compatible with its definition.
///
/// Every table referenced by a foreign key must already exist. A missing
/// table is created; an existing table is left unchanged and checked against
/// the definition.
///
/// # Errors
///
/// Returns [`MigrationError::ForeignKeyTargetMissing`] when a referenced
/// table does not exist, [`MigrationError::SchemaConflict`] when an existing
/// table is incompatible, and any connection error unchanged.
pub fn ensure_table(
    connection: &mut dyn SchemaConnection,
    table: &TableDefinition,
) -> MigrationResult<()> {
    for foreign_key in table.foreign_keys() {
        let referenced = foreign_key.referenced_table();
        if referenced != table.name() && connection.describe_table(referenced)?.is_none() {
            return Err(MigrationError::ForeignKeyTargetMissing {
                table: table.name().to_owned(),
                referenced: referenced.to_owned(),
            });
        }
    }

    let existed = connection.describe_table(table.name())?.is_some();
    connection.create_table_if_not_exists(table)?;
    if existed {
        debug!(table = table.name(), "table already exists, checking definition");
    } else {
        info!(table = table.name(), "created table");
    }

    let live = connection
        .describe_table(table.name())?
        .ok_or_else(|| MigrationError::SchemaConflict {
            table: table.name().to_owned(),
            reason: "table is not visible after creation".to_owned(),
        })?;
    table
        .check_compatible(&live)
        .map_err(|reason| MigrationError::SchemaConflict {
            table: table.name().to_owned(),
            reason,
        })
}
