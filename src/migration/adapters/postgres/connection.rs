//! [`SchemaConnection`] implementation for Diesel's `PgConnection`.

use super::{
    ddl::render_create_table,
    models::{
        CatalogColumnRow, ForeignKeyColumnRow, HistoryRow, KeyColumnRow, NewHistoryRow,
        group_foreign_keys, group_key_columns,
    },
    schema::schema_migration_history,
};
use crate::migration::{
    domain::{
        AppliedMigration, ColumnDefault, ColumnDefinition, ColumnType, TableDefinition, TableShape,
    },
    error::{MigrationError, MigrationResult},
    ports::{SchemaConnection, TransactionWork},
};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// Name of the table recording applied migrations.
pub const HISTORY_TABLE: &str = "schema_migration_history";

impl From<diesel::result::Error> for MigrationError {
    fn from(err: diesel::result::Error) -> Self {
        Self::database(err)
    }
}

/// Returns the definition of the migration history table.
///
/// # Errors
///
/// Returns [`MigrationError::Domain`] if the definition fails validation.
pub fn history_table() -> MigrationResult<TableDefinition> {
    let table = TableDefinition::builder(HISTORY_TABLE)
        .column(ColumnDefinition::required("version", ColumnType::Varchar(50)))
        .column(ColumnDefinition::required(
            "description",
            ColumnType::Varchar(200),
        ))
        .column(ColumnDefinition::optional("checksum", ColumnType::Varchar(64)))
        .column(
            ColumnDefinition::required("installed_on", ColumnType::TimestampTz)
                .with_default(ColumnDefault::CurrentTimestamp),
        )
        .column(ColumnDefinition::required(
            "execution_time_ms",
            ColumnType::BigInt,
        ))
        .primary_key(["version"])
        .build()?;
    Ok(table)
}

impl SchemaConnection for PgConnection {
    fn create_table_if_not_exists(&mut self, table: &TableDefinition) -> MigrationResult<()> {
        self.batch_execute(&render_create_table(table))?;
        Ok(())
    }

    fn describe_table(&mut self, name: &str) -> MigrationResult<Option<TableShape>> {
        let columns = diesel::sql_query(concat!(
            "SELECT column_name::text AS column_name, data_type::text AS data_type, ",
            "character_maximum_length::integer AS max_length, ",
            "(is_nullable = 'YES') AS nullable, ",
            "(column_default IS NOT NULL) AS has_default ",
            "FROM information_schema.columns ",
            "WHERE table_schema = current_schema() AND table_name = $1 ",
            "ORDER BY ordinal_position",
        ))
        .bind::<diesel::sql_types::Text, _>(name)
        .load::<CatalogColumnRow>(self)?;
        if columns.is_empty() {
            return Ok(None);
        }

        let primary_key = load_key_columns(self, name, "PRIMARY KEY")?;
        let unique = load_key_columns(self, name, "UNIQUE")?;
        let foreign_keys = diesel::sql_query(concat!(
            "SELECT kcu.constraint_name::text AS constraint_name, ",
            "kcu.column_name::text AS column_name, ",
            "rkcu.table_name::text AS referenced_table, ",
            "rkcu.column_name::text AS referenced_column ",
            "FROM information_schema.referential_constraints rc ",
            "JOIN information_schema.key_column_usage kcu ",
            "ON kcu.constraint_schema = rc.constraint_schema ",
            "AND kcu.constraint_name = rc.constraint_name ",
            "JOIN information_schema.key_column_usage rkcu ",
            "ON rkcu.constraint_schema = rc.unique_constraint_schema ",
            "AND rkcu.constraint_name = rc.unique_constraint_name ",
            "AND rkcu.ordinal_position = kcu.position_in_unique_constraint ",
            "WHERE kcu.table_schema = current_schema() AND kcu.table_name = $1 ",
            "ORDER BY kcu.constraint_name, kcu.ordinal_position",
        ))
        .bind::<diesel::sql_types::Text, _>(name)
        .load::<ForeignKeyColumnRow>(self)?;

        Ok(Some(TableShape {
            columns: columns
                .into_iter()
                .map(CatalogColumnRow::into_shape)
                .collect::<MigrationResult<_>>()?,
            primary_key: primary_key.into_iter().flatten().collect(),
            unique,
            foreign_keys: group_foreign_keys(foreign_keys),
        }))
    }

    fn ensure_history_table(&mut self) -> MigrationResult<()> {
        let table = history_table()?;
        self.create_table_if_not_exists(&table)
    }

    fn has_history_table(&mut self) -> MigrationResult<bool> {
        Ok(self.describe_table(HISTORY_TABLE)?.is_some())
    }

    fn applied_migrations(&mut self) -> MigrationResult<Vec<AppliedMigration>> {
        let rows = schema_migration_history::table
            .select(HistoryRow::as_select())
            .load::<HistoryRow>(self)?;
        let mut applied = rows
            .into_iter()
            .map(HistoryRow::into_applied)
            .collect::<MigrationResult<Vec<_>>>()?;
        applied.sort_by(|left, right| left.version.cmp(&right.version));
        Ok(applied)
    }

    fn record_applied(&mut self, applied: &AppliedMigration) -> MigrationResult<()> {
        diesel::insert_into(schema_migration_history::table)
            .values(NewHistoryRow::from(applied))
            .execute(self)?;
        Ok(())
    }

    fn run_in_transaction(&mut self, work: &mut TransactionWork<'_>) -> MigrationResult<()> {
        self.transaction::<_, MigrationError, _>(|connection| {
            let schema: &mut dyn SchemaConnection = connection;
            work(schema)
        })
    }
}

fn load_key_columns(
    connection: &mut PgConnection,
    table: &str,
    constraint_type: &str,
) -> MigrationResult<Vec<Vec<String>>> {
    let rows = diesel::sql_query(concat!(
        "SELECT tc.constraint_name::text AS constraint_name, ",
        "kcu.column_name::text AS column_name ",
        "FROM information_schema.table_constraints tc ",
        "JOIN information_schema.key_column_usage kcu ",
        "ON tc.constraint_name = kcu.constraint_name ",
        "AND tc.table_schema = kcu.table_schema ",
        "AND tc.table_name = kcu.table_name ",
        "WHERE tc.constraint_type = $2 ",
        "AND tc.table_schema = current_schema() AND tc.table_name = $1 ",
        "ORDER BY tc.constraint_name, kcu.ordinal_position",
    ))
    .bind::<diesel::sql_types::Text, _>(table)
    .bind::<diesel::sql_types::Text, _>(constraint_type)
    .load::<KeyColumnRow>(connection)?;
    Ok(group_key_columns(rows))
}
