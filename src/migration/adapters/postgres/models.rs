//! Diesel row models for migration history and catalog queries.

use super::schema::schema_migration_history;
use crate::migration::{
    domain::{AppliedMigration, ColumnShape, ForeignKeyShape, MigrationVersion},
    error::{MigrationError, MigrationResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for the history table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schema_migration_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    pub version: String,
    pub description: String,
    pub checksum: Option<String>,
    pub installed_on: DateTime<Utc>,
    pub execution_time_ms: i64,
}

impl HistoryRow {
    pub fn into_applied(self) -> MigrationResult<AppliedMigration> {
        Ok(AppliedMigration {
            version: MigrationVersion::parse(&self.version)?,
            description: self.description,
            checksum: self.checksum,
            installed_on: self.installed_on,
            execution_time_ms: self.execution_time_ms,
        })
    }
}

/// Insert model for the history table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema_migration_history)]
pub struct NewHistoryRow {
    pub version: String,
    pub description: String,
    pub checksum: Option<String>,
    pub installed_on: DateTime<Utc>,
    pub execution_time_ms: i64,
}

impl From<&AppliedMigration> for NewHistoryRow {
    fn from(applied: &AppliedMigration) -> Self {
        Self {
            version: applied.version.to_string(),
            description: applied.description.clone(),
            checksum: applied.checksum.clone(),
            installed_on: applied.installed_on,
            execution_time_ms: applied.execution_time_ms,
        }
    }
}

/// Column row from `information_schema.columns`.
#[derive(Debug, Clone, QueryableByName)]
pub struct CatalogColumnRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub column_name: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub data_type: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Integer>)]
    pub max_length: Option<i32>,
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub nullable: bool,
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub has_default: bool,
}

impl CatalogColumnRow {
    pub fn into_shape(self) -> MigrationResult<ColumnShape> {
        let max_length = self
            .max_length
            .map(u32::try_from)
            .transpose()
            .map_err(MigrationError::database)?;
        Ok(ColumnShape {
            name: self.column_name,
            data_type: self.data_type,
            max_length,
            nullable: self.nullable,
            has_default: self.has_default,
        })
    }
}

/// Key column row from `information_schema.key_column_usage`.
#[derive(Debug, Clone, QueryableByName)]
pub struct KeyColumnRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub constraint_name: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub column_name: String,
}

/// Foreign-key column pair from `information_schema.referential_constraints`.
#[derive(Debug, Clone, QueryableByName)]
pub struct ForeignKeyColumnRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub constraint_name: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub column_name: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub referenced_table: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub referenced_column: String,
}

/// Groups key columns by constraint, keeping key order.
pub fn group_key_columns(rows: Vec<KeyColumnRow>) -> Vec<Vec<String>> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for row in rows {
        match groups.last_mut() {
            Some((name, columns)) if *name == row.constraint_name => columns.push(row.column_name),
            _ => groups.push((row.constraint_name, vec![row.column_name])),
        }
    }
    groups.into_iter().map(|(_, columns)| columns).collect()
}

/// Groups foreign-key column pairs by constraint, keeping key order.
pub fn group_foreign_keys(rows: Vec<ForeignKeyColumnRow>) -> Vec<ForeignKeyShape> {
    let mut groups: Vec<(String, ForeignKeyShape)> = Vec::new();
    for row in rows {
        match groups.last_mut() {
            Some((name, shape)) if *name == row.constraint_name => {
                shape.columns.push(row.column_name);
                shape.referenced_columns.push(row.referenced_column);
            }
            _ => groups.push((
                row.constraint_name,
                ForeignKeyShape {
                    columns: vec![row.column_name],
                    referenced_table: row.referenced_table,
                    referenced_columns: vec![row.referenced_column],
                },
            )),
        }
    }
    groups.into_iter().map(|(_, shape)| shape).collect()
}
