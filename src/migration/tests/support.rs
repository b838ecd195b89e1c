//! Shared migration test doubles.

use crate::migration::{
    domain::{
        AppliedMigration, ColumnDefinition, ColumnType, MigrationVersion, TableDefinition,
        checksum_tables,
    },
    error::MigrationResult,
    ports::{Migration, SchemaConnection},
    services::ensure_table,
};
use chrono::Utc;
use mockall::mock;

mock! {
    pub Step {}

    impl Migration for Step {
        fn version(&self) -> &MigrationVersion;
        fn description(&self) -> &str;
        fn checksum(&self) -> Option<String>;
        fn apply(&self, connection: &mut dyn SchemaConnection) -> MigrationResult<()>;
    }
}

/// Migration that creates a single-column table.
pub struct TableStep {
    version: MigrationVersion,
    description: String,
    table: TableDefinition,
}

impl TableStep {
    pub fn new(version: &str, table: &str) -> Self {
        Self {
            version: version_of(version),
            description: format!("Create {table}"),
            table: simple_table(table),
        }
    }
}

impl Migration for TableStep {
    fn version(&self) -> &MigrationVersion {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn checksum(&self) -> Option<String> {
        Some(checksum_tables([&self.table]))
    }

    fn apply(&self, connection: &mut dyn SchemaConnection) -> MigrationResult<()> {
        ensure_table(connection, &self.table)
    }
}

pub fn version_of(value: &str) -> MigrationVersion {
    MigrationVersion::parse(value).expect("valid test version")
}

pub fn simple_table(name: &str) -> TableDefinition {
    TableDefinition::builder(name)
        .column(ColumnDefinition::required("id", ColumnType::Uuid))
        .primary_key(["id"])
        .build()
        .expect("valid test table")
}

pub fn applied(version: &str, checksum: Option<&str>) -> AppliedMigration {
    AppliedMigration {
        version: version_of(version),
        description: format!("Applied {version}"),
        checksum: checksum.map(str::to_owned),
        installed_on: Utc::now(),
        execution_time_ms: 1,
    }
}

pub fn mock_step(version: &str) -> MockStep {
    let mut step = MockStep::new();
    step.expect_version().return_const(version_of(version));
    step.expect_description()
        .return_const(format!("Mocked {version}"));
    step.expect_checksum().return_const(None::<String>);
    step
}
